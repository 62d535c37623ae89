//! BMI and pregnancy weight gain.
//!
//! Weight gain targets follow the 2009 Institute of Medicine guidelines,
//! keyed by pre-pregnancy BMI category.

use tracing::debug;

use crate::model::{
    BmiCategory, BmiResult, GainStatus, Range, WeightGainInput, WeightGainResult, round1,
};

const HEALTHY_BMI_MIN: f64 = 18.5;
const HEALTHY_BMI_MAX: f64 = 24.9;

/// Gain expected by the end of the first trimester, in kg.
const FIRST_TRIMESTER_GAIN: Range = Range { min: 0.5, max: 2.0 };
const FIRST_TRIMESTER_END_WEEK: u32 = 13;
const TERM_WEEK: u32 = 40;

fn raw_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    debug_assert!(height_cm > 0.0, "height must be positive, got {height_cm}");
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Body mass index rounded to one decimal, with category and healthy range.
///
/// `height_cm` must be positive. Callers check it with
/// [`crate::validation::validate_bmi_input`] first; a zero height would give
/// an infinite BMI.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> BmiResult {
    let bmi = round1(raw_bmi(height_cm, weight_kg));
    let height_m2 = (height_cm / 100.0).powi(2);

    BmiResult {
        bmi,
        category: BmiCategory::from_bmi(bmi),
        healthy_weight_range_kg: Range {
            min: round1(HEALTHY_BMI_MIN * height_m2),
            max: round1(HEALTHY_BMI_MAX * height_m2),
        },
    }
}

/// Recommended total gain for a full-term pregnancy.
pub fn recommended_total_gain(category: BmiCategory, twins: bool) -> Range {
    match (category, twins) {
        (BmiCategory::Underweight, false) => Range { min: 12.5, max: 18.0 },
        (BmiCategory::Normal, false) => Range { min: 11.5, max: 16.0 },
        (BmiCategory::Overweight, false) => Range { min: 7.0, max: 11.5 },
        (BmiCategory::Obese, false) => Range { min: 5.0, max: 9.0 },
        // No twin guideline exists for underweight; the normal range applies.
        (BmiCategory::Underweight | BmiCategory::Normal, true) => Range { min: 17.0, max: 25.0 },
        (BmiCategory::Overweight, true) => Range { min: 14.0, max: 23.0 },
        (BmiCategory::Obese, true) => Range { min: 11.0, max: 19.0 },
    }
}

/// Gain expected by `week`, interpolated linearly: the first-trimester gain
/// over weeks 0-13, then the rest of the total spread evenly to week 40.
pub fn expected_gain_to_date(total: Range, week: u32) -> Range {
    let week = week.min(TERM_WEEK);

    let interpolate = |first: f64, full: f64| {
        if week <= FIRST_TRIMESTER_END_WEEK {
            first * f64::from(week) / f64::from(FIRST_TRIMESTER_END_WEEK)
        } else {
            let progress = f64::from(week - FIRST_TRIMESTER_END_WEEK)
                / f64::from(TERM_WEEK - FIRST_TRIMESTER_END_WEEK);
            first + progress * (full - first)
        }
    };

    Range {
        min: round1(interpolate(FIRST_TRIMESTER_GAIN.min, total.min)),
        max: round1(interpolate(FIRST_TRIMESTER_GAIN.max, total.max)),
    }
}

/// Compare the gain so far against the guideline for this week.
pub fn calculate_weight_gain(input: &WeightGainInput) -> WeightGainResult {
    let pre_pregnancy_bmi = round1(raw_bmi(input.height_cm, input.pre_pregnancy_weight_kg));
    let category = BmiCategory::from_bmi(pre_pregnancy_bmi);
    let recommended_total_kg = recommended_total_gain(category, input.twins);
    let expected = expected_gain_to_date(recommended_total_kg, input.gestational_week);
    let actual_gain_kg = round1(input.current_weight_kg - input.pre_pregnancy_weight_kg);

    let status = if actual_gain_kg < expected.min {
        GainStatus::Below
    } else if actual_gain_kg > expected.max {
        GainStatus::Above
    } else {
        GainStatus::Within
    };

    debug!(
        category = %category,
        week = input.gestational_week,
        status = ?status,
        "Weight gain assessed"
    );

    WeightGainResult {
        pre_pregnancy_bmi,
        category,
        recommended_total_kg,
        expected_gain_to_date_kg: expected,
        actual_gain_kg,
        status,
    }
}
