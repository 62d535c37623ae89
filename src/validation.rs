//! Input validation for every calculator.
//!
//! Fields are checked independently and all failures are collected, keyed by
//! the camelCase field name the form uses. Any error blocks the calculation.
//! Warnings are advisory and never block.
//!
//! Date validators return the narrower [`DateValidation`] shape with a single
//! message, which the form shows under the date picker.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{
    LMP_LOOKBACK_MONTHS, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH, add_days, months_before,
};
use crate::model::{CalorieInput, RiskInput, WaterIntakeInput, WeightGainInput};

pub const MIN_AGE: u32 = 15;
pub const MAX_AGE: u32 = 65;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;
pub const MAX_PREVIOUS_PREGNANCIES: u32 = 20;
pub const MAX_GESTATIONAL_WEEK: u32 = 42;

/// How far a due date may already have passed.
const DUE_DATE_GRACE_DAYS: i64 = 14;

/// How far ahead a due date may lie.
const DUE_DATE_MAX_AHEAD_DAYS: i64 = 42 * 7;

/// How far back a period date for cycle tracking may lie.
const PERIOD_LOOKBACK_MONTHS: u32 = 3;

/// Plausible change from pre-pregnancy weight, in kg.
const MIN_PLAUSIBLE_CHANGE_KG: f64 = -10.0;
const MAX_PLAUSIBLE_CHANGE_KG: f64 = 30.0;

/// Outcome of validating a single date field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateValidation {
    pub is_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DateValidation {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub warnings: BTreeMap<String, String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
            warnings: BTreeMap::new(),
        }
    }
}

impl ValidationReport {
    /// Record an error for `field`. The first error per field wins.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Fold a date check into the report under `field`.
    pub fn merge_date(&mut self, field: &str, check: DateValidation) {
        if let Some(error) = check.error {
            self.reject(field, error);
        }
    }

    fn check_u32(&mut self, field: &str, label: &str, value: u32, min: u32, max: u32) {
        if !(min..=max).contains(&value) {
            self.reject(field, format!("{label} must be between {min} and {max}"));
        }
    }

    fn check_f64(&mut self, field: &str, label: &str, value: f64, min: f64, max: f64, unit: &str) {
        if !value.is_finite() || value < min || value > max {
            self.reject(
                field,
                format!("{label} must be between {min} and {max} {unit}"),
            );
        }
    }

    fn check_age(&mut self, age: u32) {
        self.check_u32("age", "Age", age, MIN_AGE, MAX_AGE);
    }

    fn check_height(&mut self, field: &str, height_cm: f64) {
        self.check_f64(field, "Height", height_cm, MIN_HEIGHT_CM, MAX_HEIGHT_CM, "cm");
    }

    fn check_weight(&mut self, field: &str, label: &str, weight_kg: f64) {
        self.check_f64(field, label, weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "kg");
    }
}

// ============================================================================
// Date validators
// ============================================================================

/// An LMP must not be in the future or more than ten months ago.
pub fn validate_lmp(date: NaiveDate, today: NaiveDate) -> DateValidation {
    if date > today {
        DateValidation::fail("Last menstrual period cannot be in the future")
    } else if date < months_before(today, LMP_LOOKBACK_MONTHS) {
        DateValidation::fail(format!(
            "Last menstrual period must be within the last {LMP_LOOKBACK_MONTHS} months"
        ))
    } else {
        DateValidation::ok()
    }
}

/// A due date may be up to two weeks past and up to 42 weeks ahead.
pub fn validate_due_date(date: NaiveDate, today: NaiveDate) -> DateValidation {
    if date < add_days(today, -DUE_DATE_GRACE_DAYS) {
        DateValidation::fail("Due date cannot be more than 2 weeks in the past")
    } else if date > add_days(today, DUE_DATE_MAX_AHEAD_DAYS) {
        DateValidation::fail("Due date cannot be more than 42 weeks away")
    } else {
        DateValidation::ok()
    }
}

/// A period date for cycle tracking must be within the last three months.
pub fn validate_period_date(date: NaiveDate, today: NaiveDate) -> DateValidation {
    if date > today {
        DateValidation::fail("Period date cannot be in the future")
    } else if date < months_before(today, PERIOD_LOOKBACK_MONTHS) {
        DateValidation::fail(format!(
            "Period date must be within the last {PERIOD_LOOKBACK_MONTHS} months"
        ))
    } else {
        DateValidation::ok()
    }
}

pub fn validate_cycle_length(days: u32) -> DateValidation {
    if (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&days) {
        DateValidation::ok()
    } else {
        DateValidation::fail(format!(
            "Cycle length must be between {MIN_CYCLE_LENGTH} and {MAX_CYCLE_LENGTH} days"
        ))
    }
}

// ============================================================================
// Form validators
// ============================================================================

pub fn validate_ovulation_input(
    last_period: NaiveDate,
    cycle_length: u32,
    today: NaiveDate,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.merge_date("lastPeriodDate", validate_period_date(last_period, today));
    report.merge_date("cycleLength", validate_cycle_length(cycle_length));
    report
}

/// The reference date is checked as an LMP or as a due date depending on `is_lmp`.
pub fn validate_conception_input(
    reference: NaiveDate,
    is_lmp: bool,
    today: NaiveDate,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    if is_lmp {
        report.merge_date("lmp", validate_lmp(reference, today));
    } else {
        report.merge_date("dueDate", validate_due_date(reference, today));
    }
    report
}

pub fn validate_bmi_input(height_cm: f64, weight_kg: f64) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check_height("heightCm", height_cm);
    report.check_weight("weightKg", "Weight", weight_kg);
    report
}

pub fn validate_calorie_input(input: &CalorieInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check_age(input.age);
    report.check_height("heightCm", input.height_cm);
    report.check_weight("weightKg", "Weight", input.weight_kg);
    report
}

pub fn validate_water_input(input: &WaterIntakeInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check_weight("weightKg", "Weight", input.weight_kg);
    report
}

pub fn validate_risk_input(input: &RiskInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check_age(input.age);
    report.check_u32(
        "previousPregnancies",
        "Previous pregnancies",
        input.previous_pregnancies,
        0,
        MAX_PREVIOUS_PREGNANCIES,
    );
    report
}

/// Range checks plus a soft plausibility check between the two weights.
pub fn validate_weight_gain_input(input: &WeightGainInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check_height("heightCm", input.height_cm);
    report.check_weight(
        "prePregnancyWeightKg",
        "Pre-pregnancy weight",
        input.pre_pregnancy_weight_kg,
    );
    report.check_weight("currentWeightKg", "Current weight", input.current_weight_kg);
    report.check_u32(
        "gestationalWeek",
        "Gestational week",
        input.gestational_week,
        0,
        MAX_GESTATIONAL_WEEK,
    );

    let change = input.current_weight_kg - input.pre_pregnancy_weight_kg;
    if report.is_valid && !(MIN_PLAUSIBLE_CHANGE_KG..=MAX_PLAUSIBLE_CHANGE_KG).contains(&change) {
        report.warn(
            "currentWeightKg",
            "This is an unusual change from your pre-pregnancy weight. Please double-check both values",
        );
    }

    report
}
