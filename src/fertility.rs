//! Ovulation, conception and fertile-window estimates.
//!
//! Ovulation is placed a fixed luteal phase (14 days) before the next period,
//! so for a cycle of `n` days it falls on LMP + (n - 14). The fertile window
//! runs from five days before ovulation to the day after it.

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{
    GESTATION_DAYS, LUTEAL_PHASE_DAYS, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH, OVULATION_OFFSET_DAYS,
    add_days, days_between,
};
use crate::error::CalcError;
use crate::model::{
    ConceptionRange, ConceptionResult, CyclePhase, DateSpan, FertileDay, FertileWindowResult,
    FertilityLevel, OvulationResult,
};

/// Days of the fertile window before ovulation.
const FERTILE_DAYS_BEFORE: i64 = 5;

/// Days of the fertile window after ovulation.
const FERTILE_DAYS_AFTER: i64 = 1;

/// Length of the menstrual phase at the start of each cycle.
const MENSTRUAL_DAYS: i64 = 5;

/// Conception range relative to the LMP, in days.
const CONCEPTION_EARLIEST_DAYS: i64 = 9;
const CONCEPTION_LATEST_DAYS: i64 = 15;

/// Fertility level and conception probability (percent) for a day at
/// `offset` days from ovulation.
///
/// # Table
///
/// - `-1`, `0`: peak, 95%
/// - `-2`, `+1`: high, 75%
/// - `-5..=-3`: medium, 45%
/// - anything else: low, 5%
pub fn fertility_level_for_offset(offset: i64) -> (FertilityLevel, u8) {
    match offset {
        -1 | 0 => (FertilityLevel::Peak, 95),
        -2 | 1 => (FertilityLevel::High, 75),
        -5..=-3 => (FertilityLevel::Medium, 45),
        _ => (FertilityLevel::Low, 5),
    }
}

fn ensure_cycle_length(cycle_length: u32) -> Result<(), CalcError> {
    if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&cycle_length) {
        return Err(CalcError::OutOfRange {
            field: "cycleLength",
            value: f64::from(cycle_length),
            min: f64::from(MIN_CYCLE_LENGTH),
            max: f64::from(MAX_CYCLE_LENGTH),
        });
    }
    Ok(())
}

fn ovulation_offset(cycle_length: u32) -> i64 {
    i64::from(cycle_length.saturating_sub(LUTEAL_PHASE_DAYS))
}

/// Phase of the cycle `offset` days after the LMP.
///
/// Offsets past the end of the cycle stay luteal: the next period is late,
/// not a new cycle.
pub fn cycle_phase(offset: i64, cycle_length: u32) -> CyclePhase {
    let ovulation = ovulation_offset(cycle_length);

    if offset < MENSTRUAL_DAYS {
        CyclePhase::Menstrual
    } else if offset < ovulation - 1 {
        CyclePhase::Follicular
    } else if offset <= ovulation + 1 {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

/// Estimate ovulation and the fertile window for the cycle starting at `lmp`.
///
/// # Errors
///
/// - [`CalcError::OutOfRange`] when `cycle_length` is outside 21..=35 days
/// - [`CalcError::InvalidDate`] when `lmp` is after `today`
pub fn calculate_ovulation(
    lmp: NaiveDate,
    cycle_length: u32,
    today: NaiveDate,
) -> Result<OvulationResult, CalcError> {
    ensure_cycle_length(cycle_length)?;
    if lmp > today {
        return Err(CalcError::invalid_date(format!(
            "last period {lmp} is in the future"
        )));
    }

    let ovulation_date = add_days(lmp, ovulation_offset(cycle_length));
    let offset_today = days_between(lmp, today);

    let result = OvulationResult {
        ovulation_date,
        fertile_window_start: add_days(ovulation_date, -FERTILE_DAYS_BEFORE),
        fertile_window_end: add_days(ovulation_date, FERTILE_DAYS_AFTER),
        next_period_date: add_days(lmp, i64::from(cycle_length)),
        days_until_ovulation: days_between(today, ovulation_date).max(0) as u32,
        current_phase: cycle_phase(offset_today, cycle_length),
    };

    debug!(
        ovulation = %result.ovulation_date,
        phase = ?result.current_phase,
        "Ovulation calculated"
    );

    Ok(result)
}

/// Day-by-day fertile window, ordered by date.
///
/// Always exactly seven days, from five days before ovulation to the day after.
///
/// # Errors
///
/// [`CalcError::OutOfRange`] when `cycle_length` is outside 21..=35 days.
pub fn calculate_fertile_window(
    lmp: NaiveDate,
    cycle_length: u32,
) -> Result<FertileWindowResult, CalcError> {
    ensure_cycle_length(cycle_length)?;

    let ovulation = ovulation_offset(cycle_length);
    let days = (-FERTILE_DAYS_BEFORE..=FERTILE_DAYS_AFTER)
        .map(|offset| {
            let (fertility_level, probability) = fertility_level_for_offset(offset);
            FertileDay {
                date: add_days(lmp, ovulation + offset),
                day_in_cycle: (ovulation + offset + 1) as u32,
                fertility_level,
                probability,
            }
        })
        .collect();

    Ok(FertileWindowResult {
        ovulation_date: add_days(lmp, ovulation),
        days,
    })
}

/// Estimate when conception happened.
///
/// `reference` is an LMP when `is_lmp` is true, otherwise a due date, which
/// is first converted to the implied LMP by subtracting 280 days. This is
/// plain date arithmetic and never fails; date windows are enforced by
/// [`crate::validation`].
pub fn calculate_conception_date(reference: NaiveDate, is_lmp: bool) -> ConceptionResult {
    let implied_lmp = if is_lmp {
        reference
    } else {
        add_days(reference, -GESTATION_DAYS)
    };
    let estimated_conception = add_days(implied_lmp, OVULATION_OFFSET_DAYS);

    ConceptionResult {
        implied_lmp,
        estimated_conception,
        conception_range: ConceptionRange {
            earliest: add_days(implied_lmp, CONCEPTION_EARLIEST_DAYS),
            latest: add_days(implied_lmp, CONCEPTION_LATEST_DAYS),
        },
        fertility_window: DateSpan {
            start: add_days(estimated_conception, -FERTILE_DAYS_BEFORE),
            end: add_days(estimated_conception, FERTILE_DAYS_AFTER),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_ovulation_boundary_scenario() {
        let result = calculate_ovulation(d(2024, 1, 1), 28, d(2024, 1, 3)).unwrap();

        assert_eq!(result.ovulation_date, d(2024, 1, 15));
        assert_eq!(result.fertile_window_start, d(2024, 1, 10));
        assert_eq!(result.fertile_window_end, d(2024, 1, 16));
        assert_eq!(result.next_period_date, d(2024, 1, 29));
        assert_eq!(result.days_until_ovulation, 12);
        assert_eq!(result.current_phase, CyclePhase::Menstrual);
    }

    #[test]
    fn test_ovulation_short_and_long_cycles() {
        let short = calculate_ovulation(d(2024, 1, 1), 21, d(2024, 1, 1)).unwrap();
        assert_eq!(short.ovulation_date, d(2024, 1, 8));

        let long = calculate_ovulation(d(2024, 1, 1), 35, d(2024, 1, 1)).unwrap();
        assert_eq!(long.ovulation_date, d(2024, 1, 22));
    }

    #[test]
    fn test_ovulation_after_the_fact() {
        let result = calculate_ovulation(d(2024, 1, 1), 28, d(2024, 1, 25)).unwrap();

        assert_eq!(result.days_until_ovulation, 0);
        assert_eq!(result.current_phase, CyclePhase::Luteal);
    }

    #[test]
    fn test_ovulation_rejects_bad_input() {
        assert!(matches!(
            calculate_ovulation(d(2024, 1, 1), 20, d(2024, 1, 2)),
            Err(CalcError::OutOfRange { .. })
        ));
        assert!(matches!(
            calculate_ovulation(d(2024, 1, 1), 36, d(2024, 1, 2)),
            Err(CalcError::OutOfRange { .. })
        ));
        assert!(matches!(
            calculate_ovulation(d(2024, 1, 5), 28, d(2024, 1, 2)),
            Err(CalcError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_cycle_phases_for_28_day_cycle() {
        // Ovulation at offset 14
        assert_eq!(cycle_phase(0, 28), CyclePhase::Menstrual);
        assert_eq!(cycle_phase(4, 28), CyclePhase::Menstrual);
        assert_eq!(cycle_phase(5, 28), CyclePhase::Follicular);
        assert_eq!(cycle_phase(12, 28), CyclePhase::Follicular);
        assert_eq!(cycle_phase(13, 28), CyclePhase::Ovulation);
        assert_eq!(cycle_phase(15, 28), CyclePhase::Ovulation);
        assert_eq!(cycle_phase(16, 28), CyclePhase::Luteal);
        assert_eq!(cycle_phase(40, 28), CyclePhase::Luteal);
    }

    #[test]
    fn test_fertile_window_days() {
        let window = calculate_fertile_window(d(2024, 1, 1), 28).unwrap();

        assert_eq!(window.ovulation_date, d(2024, 1, 15));
        assert_eq!(window.days.len(), 7);
        assert_eq!(window.days[0].date, d(2024, 1, 10));
        assert_eq!(window.days[0].day_in_cycle, 10);
        assert_eq!(window.days[6].date, d(2024, 1, 16));

        let levels: Vec<_> = window.days.iter().map(|day| day.fertility_level).collect();
        assert_eq!(
            levels,
            vec![
                FertilityLevel::Medium,
                FertilityLevel::Medium,
                FertilityLevel::Medium,
                FertilityLevel::High,
                FertilityLevel::Peak,
                FertilityLevel::Peak,
                FertilityLevel::High,
            ]
        );

        let probabilities: Vec<_> = window.days.iter().map(|day| day.probability).collect();
        assert_eq!(probabilities, vec![45, 45, 45, 75, 95, 95, 75]);
    }

    #[test]
    fn test_fertility_level_outside_window() {
        assert_eq!(fertility_level_for_offset(-6), (FertilityLevel::Low, 5));
        assert_eq!(fertility_level_for_offset(2), (FertilityLevel::Low, 5));
    }

    #[test]
    fn test_conception_from_lmp() {
        let result = calculate_conception_date(d(2024, 1, 1), true);

        assert_eq!(result.implied_lmp, d(2024, 1, 1));
        assert_eq!(result.estimated_conception, d(2024, 1, 15));
        assert_eq!(result.conception_range.earliest, d(2024, 1, 10));
        assert_eq!(result.conception_range.latest, d(2024, 1, 16));
        assert_eq!(result.fertility_window.start, d(2024, 1, 10));
        assert_eq!(result.fertility_window.end, d(2024, 1, 16));
    }

    #[test]
    fn test_conception_from_due_date() {
        let result = calculate_conception_date(d(2024, 10, 7), false);

        assert_eq!(result.implied_lmp, d(2024, 1, 1));
        assert_eq!(result.estimated_conception, d(2024, 1, 15));
    }

    proptest! {
        #[test]
        fn fertile_window_spans_six_days(cycle in 21u32..=35, start in 0i64..3650) {
            let lmp = add_days(d(2015, 1, 1), start);
            let result = calculate_ovulation(lmp, cycle, add_days(lmp, 1)).unwrap();
            prop_assert_eq!(
                days_between(result.fertile_window_start, result.fertile_window_end),
                6
            );
        }

        #[test]
        fn conception_round_trips_through_due_date(start in 0i64..3650) {
            let lmp = add_days(d(2015, 1, 1), start);
            let due_date = add_days(lmp, GESTATION_DAYS);

            let from_lmp = calculate_conception_date(lmp, true);
            let from_due = calculate_conception_date(due_date, false);

            prop_assert_eq!(days_between(lmp, from_lmp.estimated_conception), 14);
            prop_assert_eq!(from_lmp, from_due);
        }

        #[test]
        fn fertile_window_is_always_seven_ordered_days(cycle in 21u32..=35) {
            let window = calculate_fertile_window(d(2024, 1, 1), cycle).unwrap();
            prop_assert_eq!(window.days.len(), 7);
            for pair in window.days.windows(2) {
                prop_assert_eq!(days_between(pair[0].date, pair[1].date), 1);
            }
        }
    }
}
