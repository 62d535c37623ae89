//! Error types for the calculators.
//!
//! Two kinds of failure exist. Input validation failures are collected into a
//! [`ValidationReport`] and block the whole request. Precondition failures are
//! raised by a calculator that was handed a value outside the window it
//! accepts (for example a last menstrual period in the future).
//!
//! Nothing here is transient or retryable: the caller corrects the input.

use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors returned by the calculation core.
#[derive(Debug, Error)]
pub enum CalcError {
    /// A date falls outside the window a calculator accepts.
    #[error("invalid date: {reason}")]
    InvalidDate { reason: String },

    /// A numeric argument falls outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("{field}: '{input}' is not a valid YYYY-MM-DD date")]
    Parse { field: &'static str, input: String },

    /// One or more request fields failed validation.
    #[error("validation failed for {} field(s)", .0.errors.len())]
    Validation(ValidationReport),

    /// A request or response could not be (de)serialized.
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub(crate) fn invalid_date(reason: impl Into<String>) -> Self {
        CalcError::InvalidDate {
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this by correcting the submitted form.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, CalcError::Json(_))
    }
}
