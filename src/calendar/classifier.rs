//! Holiday classification.
//!
//! Rules are evaluated in a fixed order: an active exception on the date
//! wins over everything, then specific-date rules, then weekday rules.
//! There is no built-in weekend; Saturdays and Sundays are holidays only
//! when a rule says so.

use super::error::{CalendarResult, ensure_ordered};
use super::rule::{HolidayKind, HolidayRule};
use chrono::{Datelike, NaiveDate, Weekday};

/// Return `true` if `date` is a non-working day under `rules`.
pub fn is_holiday(date: NaiveDate, rules: &[HolidayRule]) -> bool {
    if is_overridden(date, rules) {
        return false;
    }
    rules.iter().any(|rule| rule.marks_holiday(date))
}

/// Return `true` if an active exception forces `date` to be a working day.
pub fn is_overridden(date: NaiveDate, rules: &[HolidayRule]) -> bool {
    rules.iter().any(|rule| rule.overrides(date))
}

/// Names of the rules that make `date` a holiday, joined with `", "`.
///
/// Specific-date rules are listed before weekday rules. Returns `None` when
/// the date is not a holiday, including when an exception overrides it.
pub fn holiday_name(date: NaiveDate, rules: &[HolidayRule]) -> Option<String> {
    if is_overridden(date, rules) {
        return None;
    }
    let specific = rules
        .iter()
        .filter(|r| r.kind == HolidayKind::SpecificDate && r.marks_holiday(date));
    let weekly = rules
        .iter()
        .filter(|r| r.kind == HolidayKind::DayOfWeek && r.marks_holiday(date));
    join_names(specific.chain(weekly))
}

/// Names of the active exceptions on `date`, joined with `", "`.
pub fn exception_name(date: NaiveDate, rules: &[HolidayRule]) -> Option<String> {
    join_names(rules.iter().filter(|r| r.overrides(date)))
}

fn join_names<'a>(rules: impl Iterator<Item = &'a HolidayRule>) -> Option<String> {
    let names: Vec<&str> = rules.map(|r| r.name.as_str()).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Saturday/Sunday check for display hints only.
///
/// Never feed this into scheduling; use [`is_holiday`] for that.
pub fn is_weekend_heuristic(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every holiday in `[start, end]`, in ascending order.
pub fn holiday_dates_in_range(
    start: NaiveDate,
    end: NaiveDate,
    rules: &[HolidayRule],
) -> CalendarResult<Vec<NaiveDate>> {
    ensure_ordered(start, end)?;
    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_holiday(*d, rules))
        .collect())
}

/// Number of working days in `[start, end]`.
pub fn working_days_between(
    start: NaiveDate,
    end: NaiveDate,
    rules: &[HolidayRule],
) -> CalendarResult<u32> {
    ensure_ordered(start, end)?;
    let count = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !is_holiday(*d, rules))
        .count();
    Ok(count as u32)
}
