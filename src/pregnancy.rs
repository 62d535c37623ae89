//! Pregnancy date engine.
//!
//! Due date, gestational age and week-by-week progress, all measured from the
//! first day of the last menstrual period (LMP). The reference "today" is
//! always passed in so results are reproducible.

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{
    GESTATION_DAYS, OVULATION_OFFSET_DAYS, add_days, days_between, ensure_lmp_window,
    format_weeks_days,
};
use crate::error::CalcError;
use crate::model::{PregnancyResult, PregnancyWeekResult, Trimester};

/// Milestones keyed by exact gestational week.
const MILESTONES: &[(u32, &[&str])] = &[
    (
        4,
        &[
            "Implantation is complete",
            "A home pregnancy test can detect hCG",
        ],
    ),
    (6, &["The heart begins to beat", "Neural tube is closing"]),
    (
        8,
        &[
            "All major organs have begun forming",
            "First prenatal visit is usually scheduled",
        ],
    ),
    (
        12,
        &[
            "Risk of miscarriage drops significantly",
            "Nuchal translucency screening window",
        ],
    ),
    (
        16,
        &[
            "Baby can make sucking motions",
            "Quad screen blood test window",
        ],
    ),
    (20, &["Halfway point", "Anatomy scan ultrasound"]),
    (
        24,
        &[
            "Viability milestone",
            "Glucose screening test window opens",
        ],
    ),
    (
        28,
        &[
            "Third trimester begins",
            "Rh immunoglobulin if Rh-negative",
        ],
    ),
    (
        32,
        &[
            "Baby practices breathing movements",
            "Prenatal visits every two weeks",
        ],
    ),
    (
        36,
        &[
            "Group B strep screening",
            "Baby is settling into birth position",
        ],
    ),
    (40, &["Due date", "Baby is full term"]),
];

/// Milestones tabulated for exactly `week`.
///
/// Weeks without an entry yield an empty list; there is no interpolation
/// between tabulated weeks.
pub fn pregnancy_milestones(week: u32) -> Vec<String> {
    MILESTONES
        .iter()
        .find(|(w, _)| *w == week)
        .map(|(_, items)| items.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// Estimate the due date and current progress from an LMP.
///
/// # Errors
///
/// [`CalcError::InvalidDate`] when `lmp` is after `today` or more than ten
/// months before it.
pub fn calculate_due_date(lmp: NaiveDate, today: NaiveDate) -> Result<PregnancyResult, CalcError> {
    ensure_lmp_window(lmp, today)?;

    let days_since = days_between(lmp, today);
    let due_date = add_days(lmp, GESTATION_DAYS);
    let current_week = (days_since / 7) as u32;
    let days_remaining = days_between(today, due_date).max(0) as u32;

    let result = PregnancyResult {
        due_date,
        current_week,
        trimester: Trimester::from_week(current_week),
        days_remaining,
        gestational_age: format_weeks_days(days_since),
        conception_date: add_days(lmp, OVULATION_OFFSET_DAYS),
    };

    debug!(
        due_date = %result.due_date,
        week = result.current_week,
        trimester = result.trimester.number(),
        "Due date calculated"
    );

    Ok(result)
}

/// Week-by-week progress for the pregnancy tracker.
///
/// # Errors
///
/// Same date window as [`calculate_due_date`].
pub fn calculate_pregnancy_week(
    lmp: NaiveDate,
    today: NaiveDate,
) -> Result<PregnancyWeekResult, CalcError> {
    ensure_lmp_window(lmp, today)?;

    let days_since = days_between(lmp, today);
    let week = (days_since / 7) as u32;

    Ok(PregnancyWeekResult {
        week,
        trimester: Trimester::from_week(week),
        days_into_week: (days_since % 7) as u32,
        remaining_days: (GESTATION_DAYS - days_since).max(0) as u32,
        milestones: pregnancy_milestones(week),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_due_date_boundary_scenario() {
        let lmp = d(2024, 1, 1);
        let result = calculate_due_date(lmp, d(2024, 3, 1)).unwrap();

        assert_eq!(result.due_date, d(2024, 10, 7));
        assert_eq!(result.conception_date, d(2024, 1, 15));
        // 60 days: 8 weeks 4 days
        assert_eq!(result.current_week, 8);
        assert_eq!(result.gestational_age, "8w 4d");
        assert_eq!(result.trimester, Trimester::First);
        assert_eq!(result.days_remaining, 220);
    }

    #[test]
    fn test_due_date_on_lmp_day() {
        let lmp = d(2024, 5, 10);
        let result = calculate_due_date(lmp, lmp).unwrap();

        assert_eq!(result.current_week, 0);
        assert_eq!(result.gestational_age, "0w 0d");
        assert_eq!(result.days_remaining, 280);
    }

    #[test]
    fn test_due_date_past_due_has_no_days_remaining() {
        let lmp = d(2024, 1, 1);
        let result = calculate_due_date(lmp, d(2024, 10, 20)).unwrap();

        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.trimester, Trimester::Third);
        assert_eq!(result.current_week, 41);
    }

    #[test]
    fn test_due_date_rejects_future_lmp() {
        let err = calculate_due_date(d(2024, 3, 2), d(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDate { .. }));
    }

    #[test]
    fn test_due_date_rejects_stale_lmp() {
        let err = calculate_due_date(d(2023, 1, 1), d(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDate { .. }));
    }

    #[test]
    fn test_pregnancy_week() {
        let result = calculate_pregnancy_week(d(2024, 1, 1), d(2024, 5, 20)).unwrap();

        // 140 days
        assert_eq!(result.week, 20);
        assert_eq!(result.days_into_week, 0);
        assert_eq!(result.remaining_days, 140);
        assert_eq!(result.trimester, Trimester::Second);
        assert_eq!(result.milestones.len(), 2);
        assert!(result.milestones.iter().any(|m| m.contains("Anatomy scan")));
    }

    #[test]
    fn test_pregnancy_week_rejects_future_lmp() {
        let err = calculate_pregnancy_week(d(2024, 3, 2), d(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDate { .. }));
    }

    #[test]
    fn test_pregnancy_week_rejects_stale_lmp() {
        let err = calculate_pregnancy_week(d(2023, 1, 1), d(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDate { .. }));

        // Exactly ten months back is still accepted.
        assert!(calculate_pregnancy_week(d(2023, 5, 1), d(2024, 3, 1)).is_ok());
    }

    #[test]
    fn test_milestones_only_on_tabulated_weeks() {
        for week in [4, 6, 8, 12, 16, 20, 24, 28, 32, 36, 40] {
            assert!(!pregnancy_milestones(week).is_empty(), "week {week}");
        }
        for week in [0, 5, 13, 21, 39, 41] {
            assert!(pregnancy_milestones(week).is_empty(), "week {week}");
        }
    }

    proptest! {
        #[test]
        fn due_date_is_280_days_after_lmp(days_ago in 0i64..290) {
            let today = d(2024, 6, 1);
            let lmp = add_days(today, -days_ago);
            let result = calculate_due_date(lmp, today).unwrap();
            prop_assert_eq!(days_between(lmp, result.due_date), 280);
        }

        #[test]
        fn trimester_is_monotonic(week in 0u32..45) {
            prop_assert!(Trimester::from_week(week) <= Trimester::from_week(week + 1));
        }

        #[test]
        fn due_date_is_idempotent(days_ago in 0i64..290) {
            let today = d(2024, 6, 1);
            let lmp = add_days(today, -days_ago);
            prop_assert_eq!(
                calculate_due_date(lmp, today).unwrap(),
                calculate_due_date(lmp, today).unwrap()
            );
        }
    }
}
