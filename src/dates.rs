//! Calendar helpers and fixed medical constants.
//!
//! All dates are [`NaiveDate`]s: the calculators care about calendar days,
//! never about time of day or time zone.

use chrono::{Days, Months, NaiveDate};

use crate::error::CalcError;

/// Length of a full-term pregnancy measured from the LMP.
pub const GESTATION_DAYS: i64 = 280;

/// Days from the LMP to ovulation in a textbook 28-day cycle.
pub const OVULATION_OFFSET_DAYS: i64 = 14;

/// Length of the luteal phase, used to place ovulation in cycles of other lengths.
pub const LUTEAL_PHASE_DAYS: u32 = 14;

/// How far back an LMP may lie and still describe a current pregnancy.
pub const LMP_LOOKBACK_MONTHS: u32 = 10;

pub const MIN_CYCLE_LENGTH: u32 = 21;
pub const MAX_CYCLE_LENGTH: u32 = 35;

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate, CalcError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| CalcError::Parse {
        field,
        input: input.to_string(),
    })
}

/// Shift a date by a signed number of days.
///
/// Dates are clamped to chrono's supported range, which is far outside any
/// value a calculator can produce from validated input.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The earliest date still within `months` calendar months before `today`.
pub fn months_before(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Format a span of days as completed weeks and days, e.g. `"12w 3d"`.
pub fn format_weeks_days(days: i64) -> String {
    let days = days.max(0);
    format!("{}w {}d", days / 7, days % 7)
}

/// Fail with [`CalcError::InvalidDate`] unless `lmp` lies within the
/// LMP look-back window ending at `today`.
pub(crate) fn ensure_lmp_window(lmp: NaiveDate, today: NaiveDate) -> Result<(), CalcError> {
    if lmp > today {
        return Err(CalcError::invalid_date(format!(
            "last menstrual period {lmp} is in the future"
        )));
    }
    let earliest = months_before(today, LMP_LOOKBACK_MONTHS);
    if lmp < earliest {
        return Err(CalcError::invalid_date(format!(
            "last menstrual period {lmp} is more than {LMP_LOOKBACK_MONTHS} months ago"
        )));
    }
    Ok(())
}
