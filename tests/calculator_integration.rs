//! Integration tests for the calculator request pipeline.
//!
//! These tests verify the full request/response cycle through the JSON API.

use chrono::NaiveDate;
use serde_json::{Value, json};

use prenatal_calc::CalcError;
use prenatal_calc::api::handle_json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn post(body: Value) -> Value {
    let response = handle_json(&body.to_string(), today()).unwrap();
    serde_json::to_value(response).unwrap()
}

fn reject(body: Value) -> CalcError {
    handle_json(&body.to_string(), today()).unwrap_err()
}

#[test]
fn test_due_date_endpoint() {
    let body = post(json!({ "calculator": "due_date", "lmp": "2024-01-01" }));

    assert_eq!(body["calculator"], "due_date");
    assert_eq!(body["today"], "2024-03-01");
    assert_eq!(body["result"]["dueDate"], "2024-10-07");
    assert_eq!(body["result"]["conceptionDate"], "2024-01-15");
    assert_eq!(body["result"]["currentWeek"], 8);
    assert_eq!(body["result"]["gestationalAge"], "8w 4d");
    assert_eq!(body["result"]["daysRemaining"], 220);
    assert!(body.get("warnings").is_none());
}

#[test]
fn test_pregnancy_week_endpoint() {
    let body = post(json!({ "calculator": "pregnancy_week", "lmp": "2023-12-01" }));

    // 91 days: exactly 13 weeks
    assert_eq!(body["result"]["week"], 13);
    assert_eq!(body["result"]["daysIntoWeek"], 0);
    assert_eq!(body["result"]["trimester"], 1);
    assert_eq!(body["result"]["remainingDays"], 189);
    assert!(body["result"]["milestones"].as_array().unwrap().is_empty());
}

#[test]
fn test_conception_endpoint_round_trip() {
    let from_lmp = post(json!({
        "calculator": "conception",
        "referenceDate": "2024-01-01",
        "isLmp": true
    }));
    let from_due = post(json!({
        "calculator": "conception",
        "referenceDate": "2024-10-07",
        "isLmp": false
    }));

    assert_eq!(from_lmp["result"]["estimatedConception"], "2024-01-15");
    assert_eq!(from_lmp["result"], from_due["result"]);
}

#[test]
fn test_ovulation_endpoint() {
    let body = post(json!({
        "calculator": "ovulation",
        "lastPeriodDate": "2024-02-15",
        "cycleLength": 30
    }));

    assert_eq!(body["result"]["ovulationDate"], "2024-03-02");
    assert_eq!(body["result"]["fertileWindowStart"], "2024-02-26");
    assert_eq!(body["result"]["fertileWindowEnd"], "2024-03-03");
    assert_eq!(body["result"]["nextPeriodDate"], "2024-03-16");
    assert_eq!(body["result"]["currentPhase"], "ovulation");
}

#[test]
fn test_fertile_window_endpoint() {
    let body = post(json!({
        "calculator": "fertile_window",
        "lastPeriodDate": "2024-02-15"
    }));

    let days = body["result"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[5]["fertilityLevel"], "peak");
    assert_eq!(days[5]["date"], "2024-02-29");
    assert_eq!(days[5]["probability"], 95);
}

#[test]
fn test_risk_endpoint_defaults() {
    let body = post(json!({ "calculator": "risk", "age": 28, "previousPregnancies": 1 }));

    assert_eq!(body["result"]["totalScore"], 0);
    assert_eq!(body["result"]["riskLevel"], "Low");
}

#[test]
fn test_risk_endpoint_with_factors() {
    let body = post(json!({
        "calculator": "risk",
        "age": 38,
        "previousPregnancies": 2,
        "factors": ["chronic_hypertension", "multiple_gestation", "ivf_conception"]
    }));

    // 15 + 15 + 5 + age 5
    assert_eq!(body["result"]["totalScore"], 40);
    assert_eq!(body["result"]["riskLevel"], "High");
    let referrals = body["result"]["specialistReferrals"].as_array().unwrap();
    assert!(referrals.contains(&json!("Maternal-Fetal Medicine")));
    assert!(referrals.contains(&json!("Genetic Counseling")));
}

#[test]
fn test_calories_endpoint() {
    let body = post(json!({
        "calculator": "calories",
        "age": 30,
        "heightCm": 165,
        "weightKg": 65,
        "activityLevel": "very_active",
        "trimester": 3
    }));

    assert_eq!(body["result"]["activityMultiplier"], 1.725);
    assert_eq!(body["result"]["pregnancyAddition"], 452.0);
    assert_eq!(body["result"]["breastfeedingAddition"], 0.0);
}

#[test]
fn test_water_intake_endpoint() {
    let body = post(json!({
        "calculator": "water_intake",
        "weightKg": 70,
        "activityLevel": "moderate",
        "climate": "humid",
        "breastfeeding": true
    }));

    // 2450 + 700 + 500 + 400
    assert_eq!(body["result"]["totalMl"], 4050);
    assert_eq!(body["result"]["glasses"], 17);
}

#[test]
fn test_bmi_endpoint() {
    let body = post(json!({ "calculator": "bmi", "heightCm": 165, "weightKg": 65 }));

    assert_eq!(body["result"]["bmi"], 23.9);
    assert_eq!(body["result"]["category"], "Normal Weight");
}

#[test]
fn test_validation_errors_list_every_field() {
    let err = reject(json!({
        "calculator": "calories",
        "age": 12,
        "heightCm": 300,
        "weightKg": 65,
        "activityLevel": "light"
    }));

    match err {
        CalcError::Validation(report) => {
            assert!(!report.is_valid);
            let fields: Vec<_> = report.errors.keys().map(String::as_str).collect();
            assert_eq!(fields, vec!["age", "heightCm"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_stale_lmp_is_rejected() {
    let err = reject(json!({ "calculator": "due_date", "lmp": "2023-01-01" }));
    assert!(matches!(err, CalcError::Validation(_)));
}

#[test]
fn test_bad_enum_value_is_malformed() {
    let err = reject(json!({
        "calculator": "water_intake",
        "weightKg": 70,
        "activityLevel": "couch"
    }));
    assert!(matches!(err, CalcError::Json(_)));
}

#[test]
fn test_identical_requests_give_identical_responses() {
    let request = json!({
        "calculator": "weight_gain",
        "heightCm": 170,
        "prePregnancyWeightKg": 75,
        "currentWeightKg": 80,
        "gestationalWeek": 24,
        "twins": true
    });

    assert_eq!(post(request.clone()), post(request));
}
