//! Working-day date arithmetic.
//!
//! Both walks count the anchor date as the first working day regardless of
//! its own classification, then step one calendar day at a time, counting
//! only days that are not holidays.

use super::classifier::{holiday_dates_in_range, is_holiday};
use super::error::{CalendarError, CalendarResult};
use super::rule::HolidayRule;
use chrono::NaiveDate;

/// Upper bound on calendar days a single walk may visit.
pub const DEFAULT_MAX_WALK_DAYS: u32 = 3650;

/// Result of planning backward from an end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDatePlan {
    pub start_date: NaiveDate,
    /// Holidays in `[start_date, end_date]`, ascending.
    pub holiday_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Direction::Forward => date.succ_opt(),
            Direction::Backward => date.pred_opt(),
        }
    }
}

/// Step away from `anchor` until `remaining` more working days were seen.
fn walk(
    anchor: NaiveDate,
    direction: Direction,
    mut remaining: u32,
    rules: &[HolidayRule],
    max_days: u32,
) -> CalendarResult<NaiveDate> {
    let mut day = anchor;
    let mut visited = 0u32;
    while remaining > 0 {
        if visited >= max_days {
            return Err(CalendarError::NoWorkingDayFound { anchor, max_days });
        }
        day = direction
            .step(day)
            .ok_or(CalendarError::DateOverflow { anchor })?;
        visited += 1;
        if !is_holiday(day, rules) {
            remaining -= 1;
        }
    }
    Ok(day)
}

/// Find the start date such that `[start, end_date]` holds `working_days`
/// working days, with `end_date` always counted as one.
///
/// A `working_days` of `0` is treated as `1`.
pub fn compute_start_date(
    end_date: NaiveDate,
    working_days: u32,
    rules: &[HolidayRule],
) -> CalendarResult<StartDatePlan> {
    compute_start_date_within(end_date, working_days, rules, DEFAULT_MAX_WALK_DAYS)
}

/// [`compute_start_date`] with an explicit walk bound.
pub fn compute_start_date_within(
    end_date: NaiveDate,
    working_days: u32,
    rules: &[HolidayRule],
    max_days: u32,
) -> CalendarResult<StartDatePlan> {
    if working_days <= 1 {
        // Single-day range: the end date is reported if it is a holiday.
        let holiday_dates = if is_holiday(end_date, rules) {
            vec![end_date]
        } else {
            Vec::new()
        };
        return Ok(StartDatePlan {
            start_date: end_date,
            holiday_dates,
        });
    }

    let start_date = walk(
        end_date,
        Direction::Backward,
        working_days - 1,
        rules,
        max_days,
    )?;
    let holiday_dates = holiday_dates_in_range(start_date, end_date, rules)?;
    Ok(StartDatePlan {
        start_date,
        holiday_dates,
    })
}

/// Find the end date reached by counting `working_days` working days forward
/// from `start_date`, which counts as the first.
///
/// Used when an order moves to a new start date and keeps its length.
pub fn compute_end_date(
    start_date: NaiveDate,
    working_days: u32,
    rules: &[HolidayRule],
) -> CalendarResult<NaiveDate> {
    compute_end_date_within(start_date, working_days, rules, DEFAULT_MAX_WALK_DAYS)
}

/// [`compute_end_date`] with an explicit walk bound.
pub fn compute_end_date_within(
    start_date: NaiveDate,
    working_days: u32,
    rules: &[HolidayRule],
    max_days: u32,
) -> CalendarResult<NaiveDate> {
    if working_days <= 1 {
        return Ok(start_date);
    }
    walk(
        start_date,
        Direction::Forward,
        working_days - 1,
        rules,
        max_days,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekend_rules() -> Vec<HolidayRule> {
        vec![
            HolidayRule::day_of_week("sat", "Saturday", 6, Some(date(2000, 1, 1))),
            HolidayRule::day_of_week("sun", "Sunday", 0, Some(date(2000, 1, 1))),
        ]
    }

    #[test]
    fn test_single_day_is_end_date() {
        let plan = compute_start_date(date(2024, 1, 10), 1, &[]).unwrap();
        assert_eq!(plan.start_date, date(2024, 1, 10));
        assert!(plan.holiday_dates.is_empty());

        let zero = compute_start_date(date(2024, 1, 10), 0, &[]).unwrap();
        assert_eq!(zero.start_date, date(2024, 1, 10));
    }

    #[test]
    fn test_single_day_on_holiday_reports_end_date() {
        // 2024-01-06 is a Saturday
        let plan = compute_start_date(date(2024, 1, 6), 1, &weekend_rules()).unwrap();
        assert_eq!(plan.start_date, date(2024, 1, 6));
        assert_eq!(plan.holiday_dates, vec![date(2024, 1, 6)]);
    }

    #[test]
    fn test_no_holidays_is_plain_subtraction() {
        let plan = compute_start_date(date(2024, 3, 15), 10, &[]).unwrap();
        assert_eq!(plan.start_date, date(2024, 3, 6));
        assert!(plan.holiday_dates.is_empty());
    }

    #[test]
    fn test_walk_back_over_weekend() {
        let plan = compute_start_date(date(2024, 1, 10), 5, &weekend_rules()).unwrap();
        assert_eq!(plan.start_date, date(2024, 1, 4));
        assert_eq!(plan.holiday_dates, vec![date(2024, 1, 6), date(2024, 1, 7)]);
    }

    #[test]
    fn test_end_date_on_holiday_still_counts() {
        // Ending on Sunday 2024-01-07 with 3 working days: Sunday counts,
        // Saturday is skipped, then Fri and Thu.
        let plan = compute_start_date(date(2024, 1, 7), 3, &weekend_rules()).unwrap();
        assert_eq!(plan.start_date, date(2024, 1, 4));
        assert_eq!(plan.holiday_dates, vec![date(2024, 1, 6), date(2024, 1, 7)]);
    }

    #[test]
    fn test_exception_shortens_the_walk() {
        let mut rules = weekend_rules();
        rules.push(HolidayRule::exception("ex", "Saturday shift", date(2024, 1, 6)));
        let plan = compute_start_date(date(2024, 1, 10), 5, &rules).unwrap();
        // Wed counts, then Tue, Mon, (Sun skipped), Sat, Fri
        assert_eq!(plan.start_date, date(2024, 1, 5));
        assert_eq!(plan.holiday_dates, vec![date(2024, 1, 7)]);
    }

    #[test]
    fn test_compute_end_date_forward() {
        let rules = weekend_rules();
        assert_eq!(
            compute_end_date(date(2024, 1, 4), 5, &rules).unwrap(),
            date(2024, 1, 10)
        );
        assert_eq!(
            compute_end_date(date(2024, 1, 4), 1, &rules).unwrap(),
            date(2024, 1, 4)
        );
        assert_eq!(
            compute_end_date(date(2024, 1, 4), 0, &rules).unwrap(),
            date(2024, 1, 4)
        );
    }

    #[test]
    fn test_round_trip_when_end_is_working_day() {
        let rules = weekend_rules();
        let end = date(2024, 2, 29);
        let plan = compute_start_date(end, 12, &rules).unwrap();
        assert_eq!(compute_end_date(plan.start_date, 12, &rules).unwrap(), end);
    }

    #[test]
    fn test_round_trip_when_end_is_holiday_overshoots() {
        // The backward walk counted the Sunday end date as a working day, the
        // forward walk does not, so it continues to the next working day.
        let rules = weekend_rules();
        let end = date(2024, 1, 7);
        let plan = compute_start_date(end, 3, &rules).unwrap();
        assert_eq!(
            compute_end_date(plan.start_date, 3, &rules).unwrap(),
            date(2024, 1, 8)
        );
    }

    #[test]
    fn test_every_day_holiday_is_bounded() {
        let rules: Vec<HolidayRule> = (0..7)
            .map(|wd| {
                HolidayRule::day_of_week(format!("h{}", wd), "Closed", wd, Some(date(2000, 1, 1)))
            })
            .collect();

        let err = compute_start_date(date(2024, 1, 10), 2, &rules).unwrap_err();
        assert_eq!(
            err,
            CalendarError::NoWorkingDayFound {
                anchor: date(2024, 1, 10),
                max_days: DEFAULT_MAX_WALK_DAYS,
            }
        );

        let err = compute_end_date_within(date(2024, 1, 10), 2, &rules, 30).unwrap_err();
        assert!(matches!(
            err,
            CalendarError::NoWorkingDayFound { max_days: 30, .. }
        ));
    }

    #[test]
    fn test_walk_bound_is_exact() {
        // 9 working days back without holidays needs exactly 9 steps
        assert_eq!(
            compute_start_date_within(date(2024, 1, 10), 10, &[], 9)
                .unwrap()
                .start_date,
            date(2024, 1, 1)
        );
        assert!(compute_start_date_within(date(2024, 1, 10), 10, &[], 8).is_err());
    }

    #[test]
    fn test_walk_off_the_calendar_overflows() {
        let err = compute_end_date(NaiveDate::MAX, 2, &[]).unwrap_err();
        assert_eq!(
            err,
            CalendarError::DateOverflow {
                anchor: NaiveDate::MAX
            }
        );
    }
}
