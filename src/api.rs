//! Request dispatch for the calculators.
//!
//! Calculator pages submit one JSON document tagged with the calculator name:
//!
//! ```json
//! { "calculator": "due_date", "lmp": "2024-01-01" }
//! ```
//!
//! Every handler runs the same pipeline: parse dates, validate, calculate.
//! A single invalid field rejects the whole request with a
//! [`CalcError::Validation`] listing every failing field.
//!
//! # Logging
//!
//! Handlers log the calculator name and outcome at `info`. Health values
//! (ages, weights, dates) are never logged above `debug`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::body::{calculate_bmi, calculate_weight_gain};
use crate::dates::parse_date;
use crate::error::CalcError;
use crate::fertility::{calculate_conception_date, calculate_fertile_window, calculate_ovulation};
use crate::model::{
    BmiResult, CalorieInput, CalorieResult, ConceptionResult, DietPattern, FertileWindowResult,
    NutrientRequirement, NutritionStage, OvulationResult, PregnancyResult, PregnancyWeekResult,
    RiskAssessmentResult, RiskInput, WaterIntakeInput, WaterIntakeResult, WeightGainInput,
    WeightGainResult,
};
use crate::nutrition::{calculate_calories, calculate_water_intake, nutrient_requirements};
use crate::pregnancy::{calculate_due_date, calculate_pregnancy_week};
use crate::risk::assess_risk;
use crate::validation::{
    ValidationReport, validate_bmi_input, validate_calorie_input, validate_conception_input,
    validate_lmp, validate_ovulation_input, validate_risk_input, validate_water_input,
    validate_weight_gain_input,
};

/// Cycle length assumed when the form leaves it blank.
const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Request body for calculators keyed by a last menstrual period.
#[derive(Debug, Clone, Deserialize)]
pub struct LmpRequest {
    pub lmp: String,
}

/// Request body for the conception calculator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptionRequest {
    /// An LMP or a due date, see `is_lmp`.
    pub reference_date: String,

    #[serde(default = "default_is_lmp")]
    pub is_lmp: bool,
}

fn default_is_lmp() -> bool {
    true
}

/// Request body for the ovulation and fertile-window calculators.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    pub last_period_date: String,

    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
}

fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRequest {
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutrientRequest {
    pub stage: NutritionStage,

    #[serde(default)]
    pub diet: DietPattern,
}

/// One calculator invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    DueDate(LmpRequest),
    PregnancyWeek(LmpRequest),
    Conception(ConceptionRequest),
    Ovulation(CycleRequest),
    FertileWindow(CycleRequest),
    Risk(RiskInput),
    Calories(CalorieInput),
    WaterIntake(WaterIntakeInput),
    Nutrients(NutrientRequest),
    Bmi(BmiRequest),
    WeightGain(WeightGainInput),
}

impl CalculatorRequest {
    /// The wire name of the calculator.
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorRequest::DueDate(_) => "due_date",
            CalculatorRequest::PregnancyWeek(_) => "pregnancy_week",
            CalculatorRequest::Conception(_) => "conception",
            CalculatorRequest::Ovulation(_) => "ovulation",
            CalculatorRequest::FertileWindow(_) => "fertile_window",
            CalculatorRequest::Risk(_) => "risk",
            CalculatorRequest::Calories(_) => "calories",
            CalculatorRequest::WaterIntake(_) => "water_intake",
            CalculatorRequest::Nutrients(_) => "nutrients",
            CalculatorRequest::Bmi(_) => "bmi",
            CalculatorRequest::WeightGain(_) => "weight_gain",
        }
    }
}

/// Response envelope for every calculator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResponse {
    pub calculator: &'static str,

    /// The reference date the result was computed against.
    pub today: NaiveDate,

    pub result: Value,

    /// Advisory messages that did not block the calculation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub warnings: BTreeMap<String, String>,
}

/// Decode a JSON request body and run it.
pub fn handle_json(body: &str, today: NaiveDate) -> Result<CalculatorResponse, CalcError> {
    let request: CalculatorRequest = serde_json::from_str(body)?;
    handle_request(request, today)
}

/// Validate and run one calculator request against `today`.
#[instrument(skip(request), fields(calculator = request.name()))]
pub fn handle_request(
    request: CalculatorRequest,
    today: NaiveDate,
) -> Result<CalculatorResponse, CalcError> {
    let calculator = request.name();

    let outcome = match request {
        CalculatorRequest::DueDate(req) => due_date(&req, today).and_then(plain),
        CalculatorRequest::PregnancyWeek(req) => pregnancy_week(&req, today).and_then(plain),
        CalculatorRequest::Conception(req) => conception(&req, today).and_then(plain),
        CalculatorRequest::Ovulation(req) => ovulation(&req, today).and_then(plain),
        CalculatorRequest::FertileWindow(req) => fertile_window(&req, today).and_then(plain),
        CalculatorRequest::Risk(req) => risk(&req).and_then(plain),
        CalculatorRequest::Calories(req) => calories(&req).and_then(plain),
        CalculatorRequest::WaterIntake(req) => water_intake(&req).and_then(plain),
        CalculatorRequest::Nutrients(req) => plain(nutrients(&req)),
        CalculatorRequest::Bmi(req) => bmi(&req).and_then(plain),
        CalculatorRequest::WeightGain(req) => weight_gain(&req).and_then(|(result, warnings)| {
            plain(result).map(|(value, _)| (value, warnings))
        }),
    };

    match outcome {
        Ok((result, warnings)) => {
            info!(
                calculator,
                warning_count = warnings.len(),
                "Calculation completed"
            );
            Ok(CalculatorResponse {
                calculator,
                today,
                result,
                warnings,
            })
        }
        Err(e) => {
            match &e {
                CalcError::Validation(report) => warn!(
                    calculator,
                    fields = ?report.errors.keys().collect::<Vec<_>>(),
                    "Rejected invalid input"
                ),
                other => warn!(calculator, error = %other, "Calculation failed"),
            }
            Err(e)
        }
    }
}

fn plain<T: Serialize>(result: T) -> Result<(Value, BTreeMap<String, String>), CalcError> {
    Ok((serde_json::to_value(result)?, BTreeMap::new()))
}

/// Turn a failed report into an error; pass a clean one through.
fn ensure_valid(report: ValidationReport) -> Result<ValidationReport, CalcError> {
    if report.is_valid {
        Ok(report)
    } else {
        Err(CalcError::Validation(report))
    }
}

/// Parse a date field, reporting a malformed value as a field error.
fn parse_field(field: &'static str, input: &str) -> Result<NaiveDate, CalcError> {
    parse_date(field, input).map_err(|_| {
        let mut report = ValidationReport::default();
        report.reject(field, "Please enter a valid date (YYYY-MM-DD)");
        CalcError::Validation(report)
    })
}

pub fn due_date(req: &LmpRequest, today: NaiveDate) -> Result<PregnancyResult, CalcError> {
    let lmp = parse_field("lmp", &req.lmp)?;
    let mut report = ValidationReport::default();
    report.merge_date("lmp", validate_lmp(lmp, today));
    ensure_valid(report)?;

    calculate_due_date(lmp, today)
}

pub fn pregnancy_week(
    req: &LmpRequest,
    today: NaiveDate,
) -> Result<PregnancyWeekResult, CalcError> {
    let lmp = parse_field("lmp", &req.lmp)?;
    let mut report = ValidationReport::default();
    report.merge_date("lmp", validate_lmp(lmp, today));
    ensure_valid(report)?;

    calculate_pregnancy_week(lmp, today)
}

pub fn conception(
    req: &ConceptionRequest,
    today: NaiveDate,
) -> Result<ConceptionResult, CalcError> {
    let reference = parse_field("referenceDate", &req.reference_date)?;
    ensure_valid(validate_conception_input(reference, req.is_lmp, today))?;

    Ok(calculate_conception_date(reference, req.is_lmp))
}

pub fn ovulation(req: &CycleRequest, today: NaiveDate) -> Result<OvulationResult, CalcError> {
    let last_period = parse_field("lastPeriodDate", &req.last_period_date)?;
    ensure_valid(validate_ovulation_input(last_period, req.cycle_length, today))?;

    calculate_ovulation(last_period, req.cycle_length, today)
}

pub fn fertile_window(
    req: &CycleRequest,
    today: NaiveDate,
) -> Result<FertileWindowResult, CalcError> {
    let last_period = parse_field("lastPeriodDate", &req.last_period_date)?;
    ensure_valid(validate_ovulation_input(last_period, req.cycle_length, today))?;

    calculate_fertile_window(last_period, req.cycle_length)
}

pub fn risk(req: &RiskInput) -> Result<RiskAssessmentResult, CalcError> {
    ensure_valid(validate_risk_input(req))?;
    Ok(assess_risk(req))
}

pub fn calories(req: &CalorieInput) -> Result<CalorieResult, CalcError> {
    ensure_valid(validate_calorie_input(req))?;
    Ok(calculate_calories(req))
}

pub fn water_intake(req: &WaterIntakeInput) -> Result<WaterIntakeResult, CalcError> {
    ensure_valid(validate_water_input(req))?;
    Ok(calculate_water_intake(req))
}

pub fn nutrients(req: &NutrientRequest) -> Vec<NutrientRequirement> {
    nutrient_requirements(req.stage, req.diet)
}

pub fn bmi(req: &BmiRequest) -> Result<BmiResult, CalcError> {
    ensure_valid(validate_bmi_input(req.height_cm, req.weight_kg))?;
    Ok(calculate_bmi(req.height_cm, req.weight_kg))
}

/// Weight gain keeps the plausibility warnings from validation.
pub fn weight_gain(
    req: &WeightGainInput,
) -> Result<(WeightGainResult, BTreeMap<String, String>), CalcError> {
    let report = ensure_valid(validate_weight_gain_input(req))?;
    Ok((calculate_weight_gain(req), report.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn run(body: Value) -> Result<CalculatorResponse, CalcError> {
        handle_json(&body.to_string(), today())
    }

    #[test]
    fn test_due_date_request() {
        let response = run(json!({ "calculator": "due_date", "lmp": "2024-01-01" })).unwrap();

        assert_eq!(response.calculator, "due_date");
        assert_eq!(response.result["dueDate"], "2024-10-07");
        assert_eq!(response.result["conceptionDate"], "2024-01-15");
        assert_eq!(response.result["trimester"], 1);
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn test_malformed_date_is_a_field_error() {
        let err = run(json!({ "calculator": "due_date", "lmp": "next tuesday" })).unwrap_err();

        match err {
            CalcError::Validation(report) => {
                assert!(report.errors.contains_key("lmp"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_future_lmp_is_rejected_before_calculation() {
        let err = run(json!({ "calculator": "pregnancy_week", "lmp": "2024-04-01" })).unwrap_err();
        assert!(matches!(err, CalcError::Validation(_)));
    }

    #[test]
    fn test_cycle_length_defaults_to_28() {
        let response = run(json!({
            "calculator": "ovulation",
            "lastPeriodDate": "2024-02-20"
        }))
        .unwrap();

        assert_eq!(response.result["ovulationDate"], "2024-03-05");
        assert_eq!(response.result["daysUntilOvulation"], 4);
    }

    #[test]
    fn test_nutrients_request() {
        let response = run(json!({
            "calculator": "nutrients",
            "stage": "lactation",
            "diet": "vegetarian"
        }))
        .unwrap();

        let iron = response
            .result
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["nutrient"] == "iron")
            .unwrap();
        assert_eq!(iron["amount"], 16.2);
    }

    #[test]
    fn test_weight_gain_carries_warnings() {
        let response = run(json!({
            "calculator": "weight_gain",
            "heightCm": 165.0,
            "prePregnancyWeightKg": 60.0,
            "currentWeightKg": 95.0,
            "gestationalWeek": 30
        }))
        .unwrap();

        assert!(response.warnings.contains_key("currentWeightKg"));
        assert_eq!(response.result["status"], "above");
    }

    #[test]
    fn test_unknown_calculator_is_a_json_error() {
        let err = run(json!({ "calculator": "horoscope" })).unwrap_err();
        assert!(matches!(err, CalcError::Json(_)));
        assert!(!err.is_input_error());
    }
}
