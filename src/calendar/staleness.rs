//! Detection of outdated holiday caches on orders.
//!
//! Nothing here repairs a cache. Results are advisories for the user, who
//! decides whether to recalculate.

use super::classifier::is_holiday;
use super::error::{CalendarResult, ensure_ordered};
use super::rule::HolidayRule;
use chrono::NaiveDate;

/// Cached holiday dates that the current rules no longer treat as holidays.
pub fn find_stale_dates(cached_holiday_dates: &[NaiveDate], rules: &[HolidayRule]) -> Vec<NaiveDate> {
    cached_holiday_dates
        .iter()
        .copied()
        .filter(|d| !is_holiday(*d, rules))
        .collect()
}

/// Holidays in `[start, end]` under the current rules that the cache lacks.
pub fn find_missing_dates(
    start: NaiveDate,
    end: NaiveDate,
    cached_holiday_dates: &[NaiveDate],
    rules: &[HolidayRule],
) -> CalendarResult<Vec<NaiveDate>> {
    ensure_ordered(start, end)?;
    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_holiday(*d, rules) && !cached_holiday_dates.contains(d))
        .collect())
}

/// Both directions of cache drift for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StalenessReport {
    /// Cached as holidays, now working days.
    pub stale: Vec<NaiveDate>,
    /// Now holidays, absent from the cache.
    pub missing: Vec<NaiveDate>,
}

impl StalenessReport {
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty() && self.missing.is_empty()
    }
}

/// Compare a cached holiday list for `[start, end]` against the current rules.
pub fn check_holiday_cache(
    start: NaiveDate,
    end: NaiveDate,
    cached_holiday_dates: &[NaiveDate],
    rules: &[HolidayRule],
) -> CalendarResult<StalenessReport> {
    Ok(StalenessReport {
        stale: find_stale_dates(cached_holiday_dates, rules),
        missing: find_missing_dates(start, end, cached_holiday_dates, rules)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::compute_start_date;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fresh_cache_is_clean() {
        let rules = vec![
            HolidayRule::day_of_week("sun", "Sunday", 0, Some(date(2024, 1, 1))),
            HolidayRule::specific_date("h1", "Foundation day", date(2024, 1, 9)),
        ];
        let end = date(2024, 1, 12);
        let plan = compute_start_date(end, 8, &rules).unwrap();

        assert!(find_stale_dates(&plan.holiday_dates, &rules).is_empty());
        let report = check_holiday_cache(plan.start_date, end, &plan.holiday_dates, &rules).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_cancelled_rule_makes_cache_stale() {
        let mut rules = vec![HolidayRule::specific_date("h1", "Closure", date(2024, 3, 4))];
        let cached = vec![date(2024, 3, 4)];
        assert!(find_stale_dates(&cached, &rules).is_empty());

        rules[0].cancel(date(2024, 2, 1));
        assert_eq!(find_stale_dates(&cached, &rules), vec![date(2024, 3, 4)]);
    }

    #[test]
    fn test_new_exception_makes_cache_stale() {
        let mut rules = vec![HolidayRule::specific_date("h1", "Closure", date(2024, 3, 4))];
        rules.push(HolidayRule::exception("h2", "Open anyway", date(2024, 3, 4)));
        assert_eq!(
            find_stale_dates(&[date(2024, 3, 4)], &rules),
            vec![date(2024, 3, 4)]
        );
    }

    #[test]
    fn test_new_holiday_is_reported_missing() {
        let rules = vec![HolidayRule::specific_date("h1", "Closure", date(2024, 3, 6))];
        let report =
            check_holiday_cache(date(2024, 3, 4), date(2024, 3, 8), &[], &rules).unwrap();
        assert!(report.stale.is_empty());
        assert_eq!(report.missing, vec![date(2024, 3, 6)]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_holiday_outside_range_is_ignored() {
        let rules = vec![HolidayRule::specific_date("h1", "Closure", date(2024, 3, 20))];
        let missing = find_missing_dates(date(2024, 3, 4), date(2024, 3, 8), &[], &rules).unwrap();
        assert!(missing.is_empty());
    }
}
