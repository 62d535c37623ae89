//! Calorie, water and nutrient requirements.
//!
//! Each requirement is a base value from one closed-form formula or table,
//! plus additions looked up by category (activity, trimester, breastfeeding,
//! climate).
//!
//! # References
//!
//! - Roza, A.M. & Shizgal, H.M. (1984). The Harris Benedict equation
//!   reevaluated. *American Journal of Clinical Nutrition*, 40(1), 168-182.
//! - ACOG Committee Opinion 548, weight gain and energy needs in pregnancy.
//! - Institute of Medicine Dietary Reference Intakes for pregnancy and lactation.

use tracing::debug;

use crate::model::{
    ActivityLevel, CalorieInput, CalorieResult, Climate, DietPattern, Macros, NutrientRequirement,
    NutritionStage, Trimester, WaterIntakeInput, WaterIntakeResult, round1,
};

/// Extra kcal/day while breastfeeding.
const BREASTFEEDING_KCAL: f64 = 500.0;

/// Share of calories from each macronutrient.
const PROTEIN_SHARE: f64 = 0.20;
const CARB_SHARE: f64 = 0.50;
const FAT_SHARE: f64 = 0.30;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Baseline fluid need per kilogram of body weight.
const WATER_ML_PER_KG: f64 = 35.0;
const PREGNANCY_WATER_ML: u32 = 300;
const BREASTFEEDING_WATER_ML: u32 = 700;
const GLASS_ML: u32 = 250;

/// Iron absorption from plant sources is lower, so vegetarians need 1.8x.
const VEGETARIAN_IRON_FACTOR: f64 = 1.8;

impl ActivityLevel {
    /// TDEE multiplier applied to the BMR.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Extra fluid in ml/day to cover sweat losses.
    pub fn water_ml(&self) -> u32 {
        match self {
            ActivityLevel::Sedentary => 0,
            ActivityLevel::Light => 250,
            ActivityLevel::Moderate => 500,
            ActivityLevel::VeryActive => 750,
            ActivityLevel::ExtraActive => 1000,
        }
    }
}

impl Climate {
    pub fn water_ml(&self) -> u32 {
        match self {
            Climate::Temperate | Climate::Cold => 0,
            Climate::Humid => 400,
            Climate::Hot => 500,
        }
    }
}

impl Trimester {
    /// Extra kcal/day needed in this trimester.
    pub fn extra_kcal(&self) -> f64 {
        match self {
            Trimester::First => 0.0,
            Trimester::Second => 340.0,
            Trimester::Third => 452.0,
        }
    }
}

/// Revised Harris-Benedict BMR for women, in kcal/day.
pub fn harris_benedict_bmr(weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * f64::from(age)
}

/// Daily calorie needs, with pregnancy and lactation additions.
pub fn calculate_calories(input: &CalorieInput) -> CalorieResult {
    let bmr = harris_benedict_bmr(input.weight_kg, input.height_cm, input.age);
    let activity_multiplier = input.activity_level.multiplier();
    let maintenance = bmr * activity_multiplier;

    let pregnancy_addition = input.trimester.map(|t| t.extra_kcal()).unwrap_or(0.0);
    let breastfeeding_addition = if input.breastfeeding {
        BREASTFEEDING_KCAL
    } else {
        0.0
    };

    let total = (maintenance + pregnancy_addition + breastfeeding_addition).round();

    let result = CalorieResult {
        bmr: bmr.round(),
        activity_multiplier,
        maintenance_calories: maintenance.round(),
        pregnancy_addition,
        breastfeeding_addition,
        total_calories: total,
        macros: Macros {
            protein_g: round1(total * PROTEIN_SHARE / KCAL_PER_G_PROTEIN),
            carbs_g: round1(total * CARB_SHARE / KCAL_PER_G_CARB),
            fat_g: round1(total * FAT_SHARE / KCAL_PER_G_FAT),
        },
    };

    debug!(total = result.total_calories, "Calorie needs calculated");

    result
}

/// Daily fluid target.
///
/// Never fails: an absurd weight saturates at `u32::MAX` ml instead of
/// overflowing.
pub fn calculate_water_intake(input: &WaterIntakeInput) -> WaterIntakeResult {
    let base_ml = (input.weight_kg * WATER_ML_PER_KG).round().max(0.0) as u32;
    let pregnancy_ml = if input.pregnant { PREGNANCY_WATER_ML } else { 0 };
    let breastfeeding_ml = if input.breastfeeding {
        BREASTFEEDING_WATER_ML
    } else {
        0
    };
    let activity_ml = input.activity_level.water_ml();
    let climate_ml = input.climate.water_ml();

    let total_ml = base_ml
        .saturating_add(pregnancy_ml)
        .saturating_add(breastfeeding_ml)
        .saturating_add(activity_ml)
        .saturating_add(climate_ml);

    WaterIntakeResult {
        base_ml,
        pregnancy_ml,
        breastfeeding_ml,
        activity_ml,
        climate_ml,
        total_ml,
        glasses: total_ml.div_ceil(GLASS_ML),
    }
}

/// One row of the RDA table: amounts for trimesters 1/2/3 and lactation.
struct NutrientRow {
    id: &'static str,
    label: &'static str,
    unit: &'static str,
    amounts: [f64; 4],
    food_sources: &'static [&'static str],
}

const NUTRIENTS: &[NutrientRow] = &[
    NutrientRow {
        id: "folate",
        label: "Folate",
        unit: "mcg DFE",
        amounts: [600.0, 600.0, 600.0, 500.0],
        food_sources: &["Leafy greens", "Fortified cereals", "Lentils", "Citrus fruit"],
    },
    NutrientRow {
        id: "iron",
        label: "Iron",
        unit: "mg",
        amounts: [27.0, 27.0, 27.0, 9.0],
        food_sources: &["Lean red meat", "Beans", "Spinach", "Fortified cereals"],
    },
    NutrientRow {
        id: "calcium",
        label: "Calcium",
        unit: "mg",
        amounts: [1000.0, 1000.0, 1000.0, 1000.0],
        food_sources: &["Milk", "Yogurt", "Cheese", "Fortified plant milks"],
    },
    NutrientRow {
        id: "vitamin_d",
        label: "Vitamin D",
        unit: "IU",
        amounts: [600.0, 600.0, 600.0, 600.0],
        food_sources: &["Fatty fish", "Fortified milk", "Egg yolks"],
    },
    NutrientRow {
        id: "protein",
        label: "Protein",
        unit: "g",
        amounts: [46.0, 71.0, 71.0, 71.0],
        food_sources: &["Poultry", "Fish", "Eggs", "Legumes", "Tofu"],
    },
    NutrientRow {
        id: "dha",
        label: "DHA (omega-3)",
        unit: "mg",
        amounts: [200.0, 200.0, 200.0, 200.0],
        food_sources: &["Salmon", "Sardines", "Algae oil"],
    },
    NutrientRow {
        id: "choline",
        label: "Choline",
        unit: "mg",
        amounts: [450.0, 450.0, 450.0, 550.0],
        food_sources: &["Eggs", "Beef", "Soybeans", "Broccoli"],
    },
    NutrientRow {
        id: "iodine",
        label: "Iodine",
        unit: "mcg",
        amounts: [220.0, 220.0, 220.0, 290.0],
        food_sources: &["Iodized salt", "Dairy", "Seafood"],
    },
    NutrientRow {
        id: "vitamin_b12",
        label: "Vitamin B12",
        unit: "mcg",
        amounts: [2.6, 2.6, 2.6, 2.8],
        food_sources: &["Meat", "Fish", "Dairy", "Fortified nutritional yeast"],
    },
    NutrientRow {
        id: "vitamin_c",
        label: "Vitamin C",
        unit: "mg",
        amounts: [85.0, 85.0, 85.0, 120.0],
        food_sources: &["Citrus fruit", "Bell peppers", "Strawberries"],
    },
];

fn stage_column(stage: NutritionStage) -> usize {
    match stage {
        NutritionStage::FirstTrimester => 0,
        NutritionStage::SecondTrimester => 1,
        NutritionStage::ThirdTrimester => 2,
        NutritionStage::Lactation => 3,
    }
}

/// Recommended daily amounts for every tracked nutrient at `stage`.
pub fn nutrient_requirements(stage: NutritionStage, diet: DietPattern) -> Vec<NutrientRequirement> {
    let column = stage_column(stage);

    NUTRIENTS
        .iter()
        .map(|row| {
            let mut amount = row.amounts[column];
            if row.id == "iron" && diet == DietPattern::Vegetarian {
                amount = round1(amount * VEGETARIAN_IRON_FACTOR);
            }
            NutrientRequirement {
                nutrient: row.id.to_string(),
                label: row.label.to_string(),
                amount,
                unit: row.unit.to_string(),
                food_sources: row.food_sources.iter().map(|s| s.to_string()).collect(),
            }
        })
        .collect()
}
