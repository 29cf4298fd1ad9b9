use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by holiday classification and working-day arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A working-day count below one, or a range whose start is after its end.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A computed end date falls after the order's due date.
    #[error("end date {end_date} exceeds due date {due_date}")]
    DueDateExceeded {
        end_date: NaiveDate,
        due_date: NaiveDate,
    },

    /// The walk visited `max_days` calendar days without collecting enough
    /// working days. Usually means every day is classified as a holiday.
    #[error("no working day found within {max_days} days of {anchor}; check the holiday rules")]
    NoWorkingDayFound { anchor: NaiveDate, max_days: u32 },

    /// The walk left the representable date range.
    #[error("date arithmetic overflowed while walking from {anchor}")]
    DateOverflow { anchor: NaiveDate },
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Reject a `start > end` range.
pub fn ensure_ordered(start: NaiveDate, end: NaiveDate) -> CalendarResult<()> {
    if start > end {
        return Err(CalendarError::InvalidRange(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok(())
}

/// Validate a caller-supplied working-day count and narrow it to `u32`.
pub fn validate_working_days(working_days: i64) -> CalendarResult<u32> {
    if working_days < 1 {
        return Err(CalendarError::InvalidRange(format!(
            "working_days must be at least 1 (got {})",
            working_days
        )));
    }
    u32::try_from(working_days).map_err(|_| {
        CalendarError::InvalidRange(format!("working_days {} is too large", working_days))
    })
}

/// Check a computed end date against the order's due date.
///
/// The arithmetic never looks at due dates; callers run this afterwards.
pub fn ensure_within_due(end_date: NaiveDate, due_date: NaiveDate) -> CalendarResult<()> {
    if end_date > due_date {
        return Err(CalendarError::DueDateExceeded { end_date, due_date });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_working_days() {
        assert_eq!(validate_working_days(1), Ok(1));
        assert_eq!(validate_working_days(20), Ok(20));
        assert!(matches!(
            validate_working_days(0),
            Err(CalendarError::InvalidRange(_))
        ));
        assert!(matches!(
            validate_working_days(-3),
            Err(CalendarError::InvalidRange(_))
        ));
        assert!(validate_working_days(i64::MAX).is_err());
    }

    #[test]
    fn test_ensure_ordered() {
        assert!(ensure_ordered(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(ensure_ordered(date(2024, 1, 1), date(2024, 1, 2)).is_ok());
        assert!(ensure_ordered(date(2024, 1, 2), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_ensure_within_due() {
        assert!(ensure_within_due(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
        let err = ensure_within_due(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert_eq!(
            err,
            CalendarError::DueDateExceeded {
                end_date: date(2024, 3, 2),
                due_date: date(2024, 3, 1),
            }
        );
        assert_eq!(
            err.to_string(),
            "end date 2024-03-02 exceeds due date 2024-03-01"
        );
    }
}
