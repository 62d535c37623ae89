//! Data models for the calculators.
//!
//! Every type here is an immutable value record. Inputs are what a form
//! submits once its date strings have been parsed; results are what the
//! calculators hand back for rendering. Nothing outlives a single call.
//!
//! Field names serialize in camelCase and dates as `YYYY-MM-DD`, which is the
//! shape the calculator pages consume.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared categories
// ============================================================================

/// One of the three fixed pregnancy-week bands.
///
/// Serialized as the bare number `1`, `2` or `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Bucket a completed gestational week.
    ///
    /// # Thresholds
    ///
    /// - weeks 0-13: first
    /// - weeks 14-27: second
    /// - week 28 onwards: third
    pub fn from_week(week: u32) -> Self {
        match week {
            0..=13 => Trimester::First,
            14..=27 => Trimester::Second,
            _ => Trimester::Third,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

impl From<Trimester> for u8 {
    fn from(trimester: Trimester) -> Self {
        trimester.number()
    }
}

impl TryFrom<u8> for Trimester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Trimester::First),
            2 => Ok(Trimester::Second),
            3 => Ok(Trimester::Third),
            other => Err(format!("trimester must be 1, 2 or 3, got {other}")),
        }
    }
}

impl fmt::Display for Trimester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trimester::First => write!(f, "First Trimester"),
            Trimester::Second => write!(f, "Second Trimester"),
            Trimester::Third => write!(f, "Third Trimester"),
        }
    }
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise.
    Sedentary,
    /// Light exercise 1-3 days a week.
    Light,
    /// Moderate exercise 3-5 days a week.
    Moderate,
    /// Hard exercise 6-7 days a week.
    VeryActive,
    /// Physical job or training twice a day.
    ExtraActive,
}

/// Climate the person mostly lives in, for fluid needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    #[default]
    Temperate,
    Hot,
    Humid,
    Cold,
}

/// Adult BMI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal Weight")]
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value.
    ///
    /// # Thresholds
    ///
    /// - `underweight`: bmi < 18.5
    /// - `normal`: 18.5 <= bmi < 25
    /// - `overweight`: 25 <= bmi < 30
    /// - `obese`: bmi >= 30
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Round to one decimal place, the precision of every reported kg, g and BMI value.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A closed range of numbers, e.g. a recommended gain in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// A closed range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ============================================================================
// Pregnancy dates
// ============================================================================

/// Due date and progress computed from a last menstrual period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyResult {
    /// Estimated due date, 280 days after the LMP.
    pub due_date: NaiveDate,

    /// Completed weeks since the LMP.
    pub current_week: u32,

    pub trimester: Trimester,

    /// Days from today until the due date, never negative.
    pub days_remaining: u32,

    /// Gestational age as completed weeks and days, e.g. `"12w 3d"`.
    pub gestational_age: String,

    /// Estimated conception, 14 days after the LMP.
    pub conception_date: NaiveDate,
}

/// Week-by-week progress view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyWeekResult {
    pub week: u32,
    pub trimester: Trimester,
    pub days_into_week: u32,
    pub remaining_days: u32,

    /// Milestones tabulated for exactly this week; empty for most weeks.
    pub milestones: Vec<String>,
}

// ============================================================================
// Fertility
// ============================================================================

/// Conception estimate from either an LMP or a due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptionResult {
    /// The LMP the estimate is anchored on. Equal to the input when it was an
    /// LMP, otherwise the due date minus 280 days.
    pub implied_lmp: NaiveDate,

    pub estimated_conception: NaiveDate,

    pub conception_range: ConceptionRange,

    pub fertility_window: DateSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptionRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Where in the menstrual cycle a given day falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub fn label(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Menstrual Phase",
            CyclePhase::Follicular => "Follicular Phase",
            CyclePhase::Ovulation => "Ovulation Phase",
            CyclePhase::Luteal => "Luteal Phase",
        }
    }
}

/// Ovulation estimate for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvulationResult {
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub next_period_date: NaiveDate,

    /// Days from today until ovulation; zero once ovulation has passed.
    pub days_until_ovulation: u32,

    pub current_phase: CyclePhase,
}

/// How likely conception is on a given day relative to ovulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FertilityLevel {
    Low,
    Medium,
    High,
    Peak,
}

/// A single day of the fertile window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertileDay {
    pub date: NaiveDate,

    /// 1-based day of the cycle, day 1 being the LMP.
    pub day_in_cycle: u32,

    pub fertility_level: FertilityLevel,

    /// Conception probability in percent.
    pub probability: u8,
}

/// The seven days around ovulation, in date order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertileWindowResult {
    pub ovulation_date: NaiveDate,
    pub days: Vec<FertileDay>,
}

// ============================================================================
// Risk assessment
// ============================================================================

/// Input to the prenatal risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub age: u32,

    #[serde(default)]
    pub previous_pregnancies: u32,

    /// Selected risk-factor ids, see [`crate::risk::RISK_FACTORS`].
    #[serde(default)]
    pub factors: Vec<String>,
}

/// Risk band derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Band a total risk score.
    ///
    /// # Thresholds
    ///
    /// - `low`: score <= 15
    /// - `moderate`: 16..=30
    /// - `high`: 31..=50
    /// - `very high`: above 50
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=15 => RiskLevel::Low,
            16..=30 => RiskLevel::Moderate,
            31..=50 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A risk factor that contributed to the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedFactor {
    pub id: String,
    pub label: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentResult {
    pub total_score: u32,
    pub risk_level: RiskLevel,

    /// Selected factors plus any age or parity band that scored, in table order.
    pub activated_factors: Vec<ActivatedFactor>,

    pub recommendations: Vec<String>,
    pub monitoring_plan: Vec<String>,
    pub specialist_referrals: Vec<String>,
    pub emergency_warnings: Vec<String>,
}

// ============================================================================
// Nutrition
// ============================================================================

/// Input to the calorie needs calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieInput {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,

    /// Current trimester, if pregnant.
    #[serde(default)]
    pub trimester: Option<Trimester>,

    #[serde(default)]
    pub breastfeeding: bool,
}

/// Daily macronutrient targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieResult {
    /// Basal metabolic rate in kcal/day.
    pub bmr: f64,
    pub activity_multiplier: f64,
    /// BMR scaled by activity, before pregnancy or lactation additions.
    pub maintenance_calories: f64,
    pub pregnancy_addition: f64,
    pub breastfeeding_addition: f64,
    pub total_calories: f64,
    pub macros: Macros,
}

/// Input to the water intake calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntakeInput {
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,

    #[serde(default)]
    pub climate: Climate,

    #[serde(default)]
    pub pregnant: bool,

    #[serde(default)]
    pub breastfeeding: bool,
}

/// Daily fluid target in millilitres, broken down by contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntakeResult {
    pub base_ml: u32,
    pub pregnancy_ml: u32,
    pub breastfeeding_ml: u32,
    pub activity_ml: u32,
    pub climate_ml: u32,
    pub total_ml: u32,

    /// Number of 250 ml glasses, rounded up.
    pub glasses: u32,
}

/// Life stage the nutrient table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionStage {
    FirstTrimester,
    SecondTrimester,
    ThirdTrimester,
    Lactation,
}

impl From<Trimester> for NutritionStage {
    fn from(trimester: Trimester) -> Self {
        match trimester {
            Trimester::First => NutritionStage::FirstTrimester,
            Trimester::Second => NutritionStage::SecondTrimester,
            Trimester::Third => NutritionStage::ThirdTrimester,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietPattern {
    #[default]
    Omnivore,
    Vegetarian,
}

/// Recommended daily amount of one nutrient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRequirement {
    pub nutrient: String,
    pub label: String,
    pub amount: f64,
    pub unit: String,
    pub food_sources: Vec<String>,
}

// ============================================================================
// Body measurements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    /// BMI rounded to one decimal.
    pub bmi: f64,
    pub category: BmiCategory,

    /// Weight range in kg that puts this height in the normal BMI band.
    pub healthy_weight_range_kg: Range,
}

/// Input to the pregnancy weight gain calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightGainInput {
    pub height_cm: f64,
    pub pre_pregnancy_weight_kg: f64,
    pub current_weight_kg: f64,
    pub gestational_week: u32,

    #[serde(default)]
    pub twins: bool,
}

/// Gain so far compared to the expected range for this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainStatus {
    Below,
    Within,
    Above,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightGainResult {
    pub pre_pregnancy_bmi: f64,
    pub category: BmiCategory,
    pub recommended_total_kg: Range,
    pub expected_gain_to_date_kg: Range,
    pub actual_gain_kg: f64,
    pub status: GainStatus,
}
