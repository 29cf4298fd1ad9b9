//! Holiday calendar and working-day arithmetic
//!
//! Pure functions over a slice of [`HolidayRule`]s; no I/O and no shared
//! state. Submodules:
//! - `rule`: holiday rule records
//! - `classifier`: holiday / working-day classification
//! - `arithmetic`: start and end date planning by working days
//! - `staleness`: drift detection for cached holiday lists
//! - `error`: calendar errors and range checks

mod arithmetic;
mod classifier;
mod error;
mod rule;
mod staleness;

pub use arithmetic::{
    DEFAULT_MAX_WALK_DAYS, StartDatePlan, compute_end_date, compute_end_date_within,
    compute_start_date, compute_start_date_within,
};
pub use classifier::{
    exception_name, holiday_dates_in_range, holiday_name, is_holiday, is_overridden,
    is_weekend_heuristic, working_days_between,
};
pub use error::{
    CalendarError, CalendarResult, ensure_ordered, ensure_within_due, validate_working_days,
};
pub use rule::{HolidayKind, HolidayRule, parse_weekday, weekday_name, weekday_number};
pub use staleness::{StalenessReport, check_holiday_cache, find_missing_dates, find_stale_dates};
