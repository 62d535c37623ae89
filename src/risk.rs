//! Prenatal risk assessment.
//!
//! The score is a plain additive sum: points for each selected risk factor,
//! plus an age band and a parity band. There are no weights or interaction
//! effects between factors, so selecting another factor can never lower the
//! score.
//!
//! Recommendations, monitoring, referrals and warnings are produced by simple
//! membership tests against the selected factors and the resulting band.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::model::{ActivatedFactor, RiskAssessmentResult, RiskInput, RiskLevel};

/// Broad grouping of risk factors.
///
/// Lifestyle and family factors drive referrals as a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorCategory {
    ObstetricHistory,
    MedicalCondition,
    Lifestyle,
    CurrentPregnancy,
    Family,
}

/// One selectable risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskFactor {
    pub id: &'static str,
    pub label: &'static str,
    pub points: u32,
    pub category: FactorCategory,
}

const fn factor(
    id: &'static str,
    label: &'static str,
    points: u32,
    category: FactorCategory,
) -> RiskFactor {
    RiskFactor {
        id,
        label,
        points,
        category,
    }
}

/// All selectable risk factors, in display order.
pub const RISK_FACTORS: &[RiskFactor] = &[
    // Obstetric history
    factor(
        "previous_preterm_birth",
        "Previous preterm birth",
        10,
        FactorCategory::ObstetricHistory,
    ),
    factor(
        "previous_cesarean",
        "Previous cesarean delivery",
        5,
        FactorCategory::ObstetricHistory,
    ),
    factor(
        "recurrent_miscarriage",
        "Two or more previous miscarriages",
        8,
        FactorCategory::ObstetricHistory,
    ),
    factor(
        "previous_stillbirth",
        "Previous stillbirth",
        15,
        FactorCategory::ObstetricHistory,
    ),
    factor(
        "preeclampsia_history",
        "Preeclampsia in a previous pregnancy",
        12,
        FactorCategory::ObstetricHistory,
    ),
    factor(
        "gestational_diabetes_history",
        "Gestational diabetes in a previous pregnancy",
        8,
        FactorCategory::ObstetricHistory,
    ),
    // Medical conditions
    factor(
        "chronic_hypertension",
        "Chronic high blood pressure",
        15,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "pregestational_diabetes",
        "Type 1 or type 2 diabetes",
        15,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "thyroid_disorder",
        "Thyroid disorder",
        5,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "autoimmune_disease",
        "Autoimmune disease (lupus, antiphospholipid syndrome)",
        10,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "kidney_disease",
        "Chronic kidney disease",
        15,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "heart_disease",
        "Heart disease",
        20,
        FactorCategory::MedicalCondition,
    ),
    factor(
        "obesity",
        "Pre-pregnancy BMI of 30 or more",
        8,
        FactorCategory::MedicalCondition,
    ),
    // Lifestyle
    factor("smoking", "Smoking", 10, FactorCategory::Lifestyle),
    factor(
        "alcohol_use",
        "Alcohol use during pregnancy",
        10,
        FactorCategory::Lifestyle,
    ),
    factor(
        "substance_use",
        "Recreational drug use",
        15,
        FactorCategory::Lifestyle,
    ),
    // Current pregnancy
    factor(
        "multiple_gestation",
        "Twins or higher-order multiples",
        15,
        FactorCategory::CurrentPregnancy,
    ),
    factor(
        "ivf_conception",
        "Conceived through IVF",
        5,
        FactorCategory::CurrentPregnancy,
    ),
    factor(
        "placenta_previa",
        "Placenta previa",
        15,
        FactorCategory::CurrentPregnancy,
    ),
    factor(
        "short_interpregnancy_interval",
        "Less than 18 months since last delivery",
        5,
        FactorCategory::CurrentPregnancy,
    ),
    // Family
    factor(
        "family_genetic_history",
        "Family history of genetic disorders",
        5,
        FactorCategory::Family,
    ),
];

/// Look up a risk factor by id.
pub fn find_factor(id: &str) -> Option<&'static RiskFactor> {
    RISK_FACTORS.iter().find(|f| f.id == id)
}

/// Points added for maternal age.
///
/// # Bands
///
/// - under 18: 5
/// - 18-34: 0
/// - 35-39: 5
/// - 40-44: 10
/// - 45 and over: 15
pub fn age_points(age: u32) -> u32 {
    match age {
        0..=17 => 5,
        18..=34 => 0,
        35..=39 => 5,
        40..=44 => 10,
        _ => 15,
    }
}

/// Points added for the number of previous pregnancies.
///
/// Five or more previous pregnancies (grand multiparity) add 5; fewer add nothing.
pub fn parity_points(previous_pregnancies: u32) -> u32 {
    if previous_pregnancies >= 5 { 5 } else { 0 }
}

const HYPERTENSIVE: &[&str] = &["chronic_hypertension", "preeclampsia_history"];
const GLYCEMIC: &[&str] = &[
    "pregestational_diabetes",
    "gestational_diabetes_history",
    "obesity",
];

struct Selection<'a> {
    ids: BTreeSet<&'a str>,
}

impl Selection<'_> {
    fn has(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn any(&self, ids: &[&str]) -> bool {
        ids.iter().any(|id| self.has(id))
    }

    fn any_in(&self, category: FactorCategory) -> bool {
        RISK_FACTORS
            .iter()
            .any(|f| f.category == category && self.has(f.id))
    }
}

/// Score a risk assessment.
///
/// Unknown factor ids are ignored and duplicates count once. Never fails:
/// age and parity ranges are checked by [`crate::validation::validate_risk_input`].
pub fn assess_risk(input: &RiskInput) -> RiskAssessmentResult {
    let mut ids = BTreeSet::new();
    for id in &input.factors {
        if find_factor(id).is_some() {
            ids.insert(id.as_str());
        } else {
            warn!(factor = %id, "Ignoring unknown risk factor");
        }
    }
    let selection = Selection { ids };

    // Table order keeps the output stable regardless of selection order.
    let mut activated_factors: Vec<ActivatedFactor> = RISK_FACTORS
        .iter()
        .filter(|f| selection.has(f.id))
        .map(|f| ActivatedFactor {
            id: f.id.to_string(),
            label: f.label.to_string(),
            points: f.points,
        })
        .collect();

    let age = age_points(input.age);
    if age > 0 {
        activated_factors.push(ActivatedFactor {
            id: "maternal_age".to_string(),
            label: format!("Maternal age {}", input.age),
            points: age,
        });
    }

    let parity = parity_points(input.previous_pregnancies);
    if parity > 0 {
        activated_factors.push(ActivatedFactor {
            id: "grand_multiparity".to_string(),
            label: format!("{} previous pregnancies", input.previous_pregnancies),
            points: parity,
        });
    }

    let total_score: u32 = activated_factors.iter().map(|f| f.points).sum();
    let risk_level = RiskLevel::from_score(total_score);

    debug!(
        total_score,
        risk_level = %risk_level,
        factor_count = activated_factors.len(),
        "Risk assessed"
    );

    RiskAssessmentResult {
        total_score,
        risk_level,
        recommendations: recommendations(&selection, input.age),
        monitoring_plan: monitoring_plan(&selection, risk_level),
        specialist_referrals: specialist_referrals(&selection, input.age, risk_level),
        emergency_warnings: emergency_warnings(&selection, risk_level),
        activated_factors,
    }
}

fn recommendations(selection: &Selection<'_>, age: u32) -> Vec<String> {
    let mut out = vec![
        "Take a daily prenatal vitamin with at least 400 mcg of folic acid".to_string(),
        "Keep all scheduled prenatal appointments".to_string(),
    ];

    if selection.any(HYPERTENSIVE) {
        out.push("Discuss low-dose aspirin starting after 12 weeks".to_string());
        out.push("Check blood pressure at home and keep a log".to_string());
    }
    if selection.any(GLYCEMIC) {
        out.push("Early glucose tolerance testing".to_string());
        out.push("Meet with a dietitian for a pregnancy meal plan".to_string());
    }
    if selection.has("smoking") {
        out.push("Enroll in a smoking cessation program".to_string());
    }
    if selection.any(&["alcohol_use", "substance_use"]) {
        out.push(
            "Stop alcohol and recreational drug use; confidential support is available".to_string(),
        );
    }
    if selection.has("previous_preterm_birth") {
        out.push("Discuss progesterone therapy and cervical length screening".to_string());
    }
    if selection.has("previous_cesarean") {
        out.push("Review delivery options, including trial of labor after cesarean".to_string());
    }
    if selection.has("thyroid_disorder") {
        out.push("Check thyroid function each trimester".to_string());
    }
    if selection.has("short_interpregnancy_interval") {
        out.push("Screen for iron deficiency and replenish nutrient stores".to_string());
    }
    if age >= 35 || selection.has("family_genetic_history") {
        out.push("Consider cell-free DNA or other genetic screening".to_string());
    }

    out
}

fn monitoring_plan(selection: &Selection<'_>, level: RiskLevel) -> Vec<String> {
    let mut out = match level {
        RiskLevel::Low => vec![
            "Routine prenatal visits every 4 weeks until 28 weeks".to_string(),
            "Visits every 2 weeks from 28 to 36 weeks, then weekly".to_string(),
        ],
        RiskLevel::Moderate => vec![
            "Prenatal visits every 3 weeks until 28 weeks".to_string(),
            "Additional growth ultrasound in the third trimester".to_string(),
        ],
        RiskLevel::High => vec![
            "Prenatal visits every 2 weeks".to_string(),
            "Serial growth ultrasounds every 4 weeks from 24 weeks".to_string(),
            "Non-stress testing from 32 weeks".to_string(),
        ],
        RiskLevel::VeryHigh => vec![
            "Co-management with maternal-fetal medicine".to_string(),
            "Prenatal visits every 1-2 weeks".to_string(),
            "Serial growth ultrasounds every 3-4 weeks from 20 weeks".to_string(),
            "Twice-weekly fetal testing from 32 weeks".to_string(),
        ],
    };

    if selection.any(HYPERTENSIVE) {
        out.push("Urine protein and blood pressure check at every visit".to_string());
    }
    if selection.any(GLYCEMIC) {
        out.push("Blood glucose self-monitoring".to_string());
    }
    if selection.has("multiple_gestation") {
        out.push("Ultrasound every 2-4 weeks to track each baby's growth".to_string());
    }
    if selection.has("previous_preterm_birth") {
        out.push("Cervical length ultrasound between 16 and 24 weeks".to_string());
    }

    out
}

fn specialist_referrals(selection: &Selection<'_>, age: u32, level: RiskLevel) -> Vec<String> {
    let mut out = Vec::new();

    if matches!(level, RiskLevel::High | RiskLevel::VeryHigh) {
        out.push("Maternal-Fetal Medicine".to_string());
    }
    if selection.has("heart_disease") {
        out.push("Cardiology".to_string());
    }
    if selection.any(&["pregestational_diabetes", "thyroid_disorder"]) {
        out.push("Endocrinology".to_string());
    }
    if selection.has("kidney_disease") {
        out.push("Nephrology".to_string());
    }
    if selection.has("autoimmune_disease") {
        out.push("Rheumatology".to_string());
    }
    if age >= 35 || selection.any_in(FactorCategory::Family) {
        out.push("Genetic Counseling".to_string());
    }
    if selection.any_in(FactorCategory::Lifestyle) {
        out.push("Addiction Medicine".to_string());
    }

    out
}

fn emergency_warnings(selection: &Selection<'_>, level: RiskLevel) -> Vec<String> {
    let mut out = Vec::new();

    if matches!(level, RiskLevel::High | RiskLevel::VeryHigh) {
        out.push(
            "Call your provider right away for heavy bleeding, fluid leaking, or severe abdominal pain".to_string(),
        );
        out.push("Seek care if your baby's movements slow down or stop".to_string());
    }
    if selection.any(HYPERTENSIVE) {
        out.push(
            "Severe headache, vision changes, or sudden swelling can signal preeclampsia".to_string(),
        );
    }
    if selection.has("placenta_previa") {
        out.push("Any vaginal bleeding needs immediate evaluation".to_string());
    }
    if selection.has("previous_preterm_birth") {
        out.push("Regular contractions before 37 weeks need immediate evaluation".to_string());
    }

    out
}
