use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a holiday rule selects dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    /// Holiday on exactly one calendar date.
    SpecificDate,
    /// Holiday on every occurrence of a weekday from `effective_from` onward.
    DayOfWeek,
    /// Forces a date to be a working day, overriding every other rule.
    Exception,
}

impl FromStr for HolidayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific_date" => Ok(HolidayKind::SpecificDate),
            "day_of_week" => Ok(HolidayKind::DayOfWeek),
            "exception" => Ok(HolidayKind::Exception),
            _ => Err(format!(
                "Invalid holiday kind '{}'. Valid options are: specific_date, day_of_week, exception",
                s
            )),
        }
    }
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HolidayKind::SpecificDate => "specific_date",
            HolidayKind::DayOfWeek => "day_of_week",
            HolidayKind::Exception => "exception",
        };
        f.write_str(s)
    }
}

/// Weekday number used by rules: 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// English weekday name for a rule weekday number.
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(weekday as usize).copied()
}

/// Parse a weekday given as a number (`0`..`6`, Sunday first) or an English
/// name or three-letter abbreviation, case-insensitive.
pub fn parse_weekday(s: &str) -> Option<u8> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<u8>() {
        return (n < 7).then_some(n);
    }
    let lower = trimmed.to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            name == lower || (lower.len() == 3 && name.starts_with(&lower))
        })
        .map(|i| i as u8)
}

/// A single entry in the holiday calendar.
///
/// Which of `date`, `weekday` and `effective_from` are meaningful depends on
/// `kind`: `date` for `SpecificDate` and `Exception`, `weekday` and
/// `effective_from` for `DayOfWeek`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRule {
    pub id: String,
    pub name: String,
    pub kind: HolidayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub cancelled: bool,
    /// Informational only; classification checks `cancelled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_on: Option<NaiveDate>,
}

impl HolidayRule {
    /// Holiday on exactly `date`.
    pub fn specific_date(id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: HolidayKind::SpecificDate,
            date: Some(date),
            weekday: None,
            effective_from: None,
            cancelled: false,
            cancelled_on: None,
        }
    }

    /// Holiday on every `weekday` (0 = Sunday) on or after `effective_from`.
    pub fn day_of_week(
        id: impl Into<String>,
        name: impl Into<String>,
        weekday: u8,
        effective_from: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: HolidayKind::DayOfWeek,
            date: None,
            weekday: Some(weekday),
            effective_from,
            cancelled: false,
            cancelled_on: None,
        }
    }

    /// Working-day override on `date`.
    pub fn exception(id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: HolidayKind::Exception,
            date: Some(date),
            weekday: None,
            effective_from: None,
            cancelled: false,
            cancelled_on: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled
    }

    /// Soft-delete the rule.
    pub fn cancel(&mut self, on: NaiveDate) {
        self.cancelled = true;
        self.cancelled_on = Some(on);
    }

    /// True if this active rule marks `date` as a holiday, ignoring any
    /// exception that may override it.
    pub fn marks_holiday(&self, date: NaiveDate) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.kind {
            HolidayKind::SpecificDate => self.date == Some(date),
            HolidayKind::DayOfWeek => match (self.weekday, self.effective_from) {
                (Some(weekday), Some(from)) => weekday == weekday_number(date) && date >= from,
                _ => false,
            },
            HolidayKind::Exception => false,
        }
    }

    /// True if this active rule forces `date` to be a working day.
    pub fn overrides(&self, date: NaiveDate) -> bool {
        self.is_active() && self.kind == HolidayKind::Exception && self.date == Some(date)
    }

    /// Short human-readable description of what the rule selects.
    pub fn describe(&self) -> String {
        match self.kind {
            HolidayKind::SpecificDate | HolidayKind::Exception => match self.date {
                Some(date) => date.to_string(),
                None => "no date".to_string(),
            },
            HolidayKind::DayOfWeek => {
                let day = self
                    .weekday
                    .and_then(weekday_name)
                    .unwrap_or("unknown weekday");
                match self.effective_from {
                    Some(from) => format!("every {} from {}", day, from),
                    None => format!("every {} (no effective date, inactive)", day),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_number_sunday_first() {
        // 2024-01-07 is a Sunday, 2024-01-06 a Saturday
        assert_eq!(weekday_number(date(2024, 1, 7)), 0);
        assert_eq!(weekday_number(date(2024, 1, 8)), 1);
        assert_eq!(weekday_number(date(2024, 1, 6)), 6);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("0"), Some(0));
        assert_eq!(parse_weekday("6"), Some(6));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("Sunday"), Some(0));
        assert_eq!(parse_weekday("saturday"), Some(6));
        assert_eq!(parse_weekday(" wed "), Some(3));
        assert_eq!(parse_weekday("we"), None);
        assert_eq!(parse_weekday("holiday"), None);
    }

    #[test]
    fn test_holiday_kind_from_str() {
        assert_eq!(
            "specific_date".parse::<HolidayKind>(),
            Ok(HolidayKind::SpecificDate)
        );
        assert_eq!("day_of_week".parse::<HolidayKind>(), Ok(HolidayKind::DayOfWeek));
        assert_eq!("exception".parse::<HolidayKind>(), Ok(HolidayKind::Exception));
        assert!("weekly".parse::<HolidayKind>().is_err());
        assert_eq!(HolidayKind::DayOfWeek.to_string(), "day_of_week");
    }

    #[test]
    fn test_day_of_week_respects_effective_from() {
        let rule = HolidayRule::day_of_week("h1", "Sunday", 0, Some(date(2024, 1, 1)));
        assert!(rule.marks_holiday(date(2024, 1, 7)));
        assert!(!rule.marks_holiday(date(2023, 12, 31)));
        assert!(!rule.marks_holiday(date(2024, 1, 8)));
    }

    #[test]
    fn test_day_of_week_without_effective_from_never_matches() {
        let rule = HolidayRule::day_of_week("h1", "Sunday", 0, None);
        assert!(!rule.marks_holiday(date(2024, 1, 7)));
        assert!(rule.describe().contains("inactive"));
    }

    #[test]
    fn test_cancelled_rule_is_inert() {
        let mut rule = HolidayRule::specific_date("h1", "Christmas", date(2024, 12, 25));
        assert!(rule.marks_holiday(date(2024, 12, 25)));

        rule.cancel(date(2024, 12, 1));
        assert!(!rule.is_active());
        assert_eq!(rule.cancelled_on, Some(date(2024, 12, 1)));
        assert!(!rule.marks_holiday(date(2024, 12, 25)));

        let mut exception = HolidayRule::exception("h2", "Open day", date(2024, 12, 25));
        assert!(exception.overrides(date(2024, 12, 25)));
        exception.cancel(date(2024, 12, 1));
        assert!(!exception.overrides(date(2024, 12, 25)));
    }

    #[test]
    fn test_rule_toml_shape() {
        let rule = HolidayRule::day_of_week("holiday-1", "Weekly closure", 6, Some(date(2024, 1, 1)));
        let serialized = toml::to_string(&rule).unwrap();
        assert!(serialized.contains("kind = \"day_of_week\""));
        assert!(serialized.contains("weekday = 6"));
        assert!(!serialized.contains("cancelled_on"));

        let parsed: HolidayRule = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, rule);
    }
}
