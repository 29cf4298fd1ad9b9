//! Parameter parsing and error conversion for the MCP tools
//!
//! Every helper returns an `INVALID_PARAMS` error whose message is shown to
//! the client, so the messages say how to fix the call.

use crate::calendar::{self, CalendarError, HolidayKind};
use crate::schedule::{OrderStatus, ScheduleError};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

fn invalid_params(message: impl std::fmt::Display) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.to_string(), true)
}

/// Parse a `YYYY-MM-DD` date parameter
///
/// # Arguments
/// * `field` - Parameter name, used in the error message
/// * `date_str` - Date string in YYYY-MM-DD format
pub fn parse_date(field: &str, date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid {} '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            field, date_str
        ))
    })
}

/// Parse an optional date parameter, treating `""` as absent
pub fn parse_optional_date(field: &str, date_str: Option<&str>) -> McpResult<Option<NaiveDate>> {
    match date_str.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(field, s).map(Some),
    }
}

/// Parse an order status parameter
pub fn parse_status(status_str: &str) -> McpResult<OrderStatus> {
    status_str.trim().parse::<OrderStatus>().map_err(invalid_params)
}

/// Parse a holiday rule kind parameter
pub fn parse_kind(kind_str: &str) -> McpResult<HolidayKind> {
    kind_str.trim().parse::<HolidayKind>().map_err(invalid_params)
}

/// Parse a weekday given as `0`-`6` (Sunday first) or an English name
pub fn parse_weekday(weekday_str: &str) -> McpResult<u8> {
    calendar::parse_weekday(weekday_str).ok_or_else(|| {
        invalid_params(format!(
            "Invalid weekday '{}'. Use 0-6 (0=Sunday) or a name such as 'Sunday' or 'sat'",
            weekday_str
        ))
    })
}

/// Check a working-day count supplied by the client
pub fn parse_working_days(working_days: i64) -> McpResult<u32> {
    calendar::validate_working_days(working_days).map_err(calendar_error)
}

/// Convert a calendar error into a tool error
pub fn calendar_error(err: CalendarError) -> mcp_attr::Error {
    let hint = match &err {
        CalendarError::DueDateExceeded { .. } => {
            " Move the end date earlier, reduce working_days, or extend the due date."
        }
        CalendarError::NoWorkingDayFound { .. } => {
            " Every day in the window is a holiday; use list_holidays() to review the rules."
        }
        _ => "",
    };
    invalid_params(format!("{}.{}", capitalize(&err.to_string()), hint))
}

/// Convert a record-store error into a tool error
pub fn schedule_error(err: ScheduleError) -> mcp_attr::Error {
    invalid_params(err)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trim surrounding whitespace from a client-supplied ID
pub fn normalize_id(id: &str) -> String {
    id.trim().to_string()
}

/// Treat `""` as a request to clear an optional text field
///
/// Returns `None` when the parameter was not given, `Some(None)` to clear,
/// and `Some(Some(value))` to set.
pub fn optional_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.trim().is_empty() { None } else { Some(v) })
}
