//! Order scheduling calendar MCP server library
//!
//! Provides a Model Context Protocol (MCP) server for planning production
//! orders against a holiday calendar. Orders are planned backward from an
//! end date by a number of working days; holidays come from weekly rules,
//! specific dates and working-day exceptions.
//!
//! # Architecture
//!
//! - **MCP Layer**: `OrderCalendarHandler` and the `handlers` module
//! - **Calendar Layer**: `calendar` module - pure holiday classification and
//!   working-day arithmetic
//! - **Domain Layer**: `schedule` module - orders, holiday rule records and
//!   the record store
//! - **Persistence Layer**: `storage` module - TOML file with optional git sync
//!
//! # Example
//!
//! ```no_run
//! use ordercal_mcp::{OrderCalendarHandler, ServerConfig};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = OrderCalendarHandler::new(ServerConfig::new("schedule.toml"))?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod config;
pub mod formatting;
mod git_ops;
mod handlers;
pub mod schedule;
mod storage;
pub mod validation;

use anyhow::Result;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail_public};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use calendar::{
    CalendarError, DEFAULT_MAX_WALK_DAYS, HolidayKind, HolidayRule, StartDatePlan,
    compute_end_date, compute_start_date, find_stale_dates, holiday_name, is_holiday,
};
pub use config::{ConfigError, ServerConfig};
pub use schedule::{Order, OrderStatus, ScheduleData, ScheduleError};
pub use storage::{Storage, SyncStatus};

/// MCP server handler for the order scheduling calendar
///
/// All changes are persisted to a TOML file immediately and, with git sync
/// enabled, committed to the enclosing repository.
pub struct OrderCalendarHandler {
    pub(crate) data: Mutex<ScheduleData>,
    pub(crate) storage: Storage,
    pub(crate) max_walk_days: u32,
}

impl OrderCalendarHandler {
    /// Create a handler and load the schedule file
    ///
    /// # Arguments
    /// * `config` - Storage path, git sync flag and walk bound
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let storage = Storage::new(&config.storage_path, config.sync_git);
        let data = Mutex::new(storage.load()?);
        Ok(Self {
            data,
            storage,
            max_walk_days: config.max_walk_days,
        })
    }

    /// Lock the schedule, recovering the data if a previous holder panicked
    pub(crate) fn lock_data(&self) -> MutexGuard<'_, ScheduleData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save the schedule with a commit message describing the change
    ///
    /// Returns a note to append to the tool response, empty unless git sync
    /// failed after the file was written. If the write itself fails, the
    /// in-memory schedule is reset to the file on disk and an error is
    /// returned, so the change can be retried as is.
    ///
    /// Must not be called while holding the data lock.
    pub(crate) fn save_data_with_message(&self, message: &str) -> McpResult<String> {
        let mut data = self.lock_data();
        match self.storage.save_with_message(&data, message) {
            Ok(SyncStatus::Failed(e)) => Ok(format!(
                "\n⚠ Saved to {}, but git sync failed: {:#}. The change will go out with the next successful sync.",
                self.storage.file_path().display(),
                e
            )),
            Ok(SyncStatus::Off | SyncStatus::Synced) => Ok(String::new()),
            Err(e) => {
                match self.storage.read_file() {
                    Ok(on_disk) => *data = on_disk,
                    Err(reload) => tracing::error!(
                        "Failed to restore schedule after a failed save: {:#}",
                        reload
                    ),
                }
                bail_public!(_, "Failed to save, the change was not applied: {:#}", e);
            }
        }
    }

    /// IDs of orders whose holiday cache disagrees with the current rules
    pub(crate) fn stale_order_ids(&self, data: &ScheduleData) -> Vec<String> {
        match data.stale_orders() {
            Ok(stale) => stale.into_iter().map(|(o, _)| o.id.clone()).collect(),
            Err(e) => {
                tracing::warn!("Holiday cache check failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Advisory appended to responses after a holiday rule change
    pub(crate) fn affected_orders_note(ids: &[String]) -> String {
        if ids.is_empty() {
            return String::new();
        }
        format!(
            "\n⚠ {} order(s) now have outdated holiday caches: {}. Run check_holiday_cache for details or recalculate_holidays to refresh.",
            ids.len(),
            ids.join(", ")
        )
    }
}

impl Drop for OrderCalendarHandler {
    fn drop(&mut self) {
        if let Err(e) = self.storage.shutdown() {
            tracing::warn!("Shutdown git sync failed: {:#}", e);
        }
    }
}

/// Production order calendar with holiday-aware working-day planning.
///
/// Orders have an end date, a due date and a length in working days. The
/// server derives the start date by walking backward from the end date,
/// skipping holidays. The end date always counts as a working day.
///
/// Holiday rules:
/// - **specific_date**: one calendar date is a holiday
/// - **day_of_week**: a weekday (0=Sunday..6=Saturday) is a holiday from an effective date on; only one may be active
/// - **exception**: a date is forced to be a working day, overriding the other rules
///
/// There is no built-in weekend. Orders cache the holidays inside their range;
/// after rule changes use check_holiday_cache and recalculate_holidays.
///
/// Order statuses: planned, in_progress, waiting, done, trash.
/// Dates use YYYY-MM-DD.
#[mcp_server]
impl McpServer for OrderCalendarHandler {
    /// **Plan**: Create an order. The start date is computed backward from end_date over working days.
    /// **Rules**: end_date defaults to due_date and must not be after it. working_days >= 1.
    /// **IDs**: Use short kebab-case IDs ("po-1042", "bracket-batch-7"); they cannot be changed later.
    #[tool]
    async fn add_order(
        &self,
        /// ID: unique order ID (e.g., "po-1042")
        id: String,
        /// Title: brief description of the work
        title: String,
        /// Due date: latest acceptable end date, YYYY-MM-DD
        due_date: String,
        /// Working days: length of the job in working days (>= 1)
        working_days: i64,
        /// End date: YYYY-MM-DD, defaults to due_date (optional)
        end_date: Option<String>,
        /// Customer name (optional)
        customer: Option<String>,
        /// Estimated effort in hours (optional)
        effort_hours: Option<f64>,
        /// Notes: Markdown details (optional)
        notes: Option<String>,
        /// Status: planned/in_progress/waiting/done/trash, defaults to planned (optional)
        status: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_order(
            id,
            title,
            due_date,
            working_days,
            end_date,
            customer,
            effort_hours,
            notes,
            status,
        )
        .await
    }

    /// **Edit**: Change order fields. Changing working_days or end_date re-plans the start date.
    /// A new due_date alone keeps the schedule and must not be before the end date.
    /// **Clear**: Pass "" to clear customer or notes.
    #[tool]
    async fn update_order(
        &self,
        /// ID of the order to update
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// New customer, "" to clear (optional)
        customer: Option<String>,
        /// New notes, "" to clear (optional)
        notes: Option<String>,
        /// New effort estimate in hours (optional)
        effort_hours: Option<f64>,
        /// New due date, YYYY-MM-DD (optional)
        due_date: Option<String>,
        /// New length in working days (optional)
        working_days: Option<i64>,
        /// New end date, YYYY-MM-DD (optional)
        end_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_order(
            id,
            title,
            customer,
            notes,
            effort_hours,
            due_date,
            working_days,
            end_date,
        )
        .await
    }

    /// **Reschedule**: Move an order to a new start date keeping its working days; the end date is recomputed.
    /// Fails if the new end date passes the due date.
    #[tool]
    async fn move_order(
        &self,
        /// ID of the order to move
        id: String,
        /// New start date, YYYY-MM-DD
        start_date: String,
    ) -> McpResult<String> {
        self.handle_move_order(id, start_date).await
    }

    /// **Track**: Move orders through planned → in_progress → done, or to waiting/trash.
    /// **Batch**: Accepts multiple IDs; reports success and failure per ID.
    #[tool]
    async fn change_status(
        &self,
        /// Order IDs to change
        ids: Vec<String>,
        /// New status: planned/in_progress/waiting/done/trash
        new_status: String,
    ) -> McpResult<String> {
        self.handle_change_status(ids, new_status).await
    }

    /// **Review**: List orders. Flags overdue orders and outdated holiday caches.
    /// **Filters**: status (trash hidden unless asked for), date window overlap, keyword.
    #[tool]
    async fn list_orders(
        &self,
        /// Status filter: planned/in_progress/waiting/done/trash. Empty = all but trash. (optional)
        status: Option<String>,
        /// Window start, YYYY-MM-DD; keeps orders overlapping the window (optional)
        from: Option<String>,
        /// Window end, YYYY-MM-DD (optional)
        to: Option<String>,
        /// Keyword: case-insensitive match on id, title, customer, notes (optional)
        keyword: Option<String>,
        /// Exclude notes from output to reduce tokens (optional)
        exclude_notes: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_orders(status, from, to, keyword, exclude_notes)
            .await
    }

    /// **Purge**: Permanently delete orders in trash. Move them with change_status first.
    #[tool]
    async fn empty_trash(&self) -> McpResult<String> {
        self.handle_empty_trash().await
    }

    /// **Calendar**: Add a holiday rule.
    /// - specific_date: needs date
    /// - day_of_week: needs weekday; effective_from defaults to today; only one active weekly rule allowed
    /// - exception: needs date; forces that date to be a working day
    #[tool]
    async fn add_holiday(
        &self,
        /// Kind: specific_date/day_of_week/exception
        kind: String,
        /// Display name (e.g., "New Year", "Sunday closure", "Saturday shift")
        name: String,
        /// Date, YYYY-MM-DD, for specific_date and exception (optional)
        date: Option<String>,
        /// Weekday for day_of_week: 0-6 (0=Sunday) or a name like "Sunday" (optional)
        weekday: Option<String>,
        /// First date the weekly rule applies, YYYY-MM-DD (optional)
        effective_from: Option<String>,
        /// Rule ID, generated as "holiday-N" when omitted (optional)
        id: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_holiday(kind, name, date, weekday, effective_from, id)
            .await
    }

    /// **Calendar**: Cancel a holiday rule. It stays on file as history but no longer applies.
    #[tool]
    async fn cancel_holiday(
        &self,
        /// ID of the rule to cancel
        id: String,
        /// Cancellation date recorded on the rule, YYYY-MM-DD, defaults to today (optional)
        cancelled_on: Option<String>,
    ) -> McpResult<String> {
        self.handle_cancel_holiday(id, cancelled_on).await
    }

    /// **Calendar**: List holiday rules grouped by kind.
    #[tool]
    async fn list_holidays(
        &self,
        /// Include cancelled rules (optional, default false)
        include_cancelled: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_holidays(include_cancelled).await
    }

    /// **Calendar**: Is a date a holiday? Shows the holiday or exception name and orders running that day.
    #[tool]
    async fn check_date(
        &self,
        /// Date to check, YYYY-MM-DD
        date: String,
    ) -> McpResult<String> {
        self.handle_check_date(date).await
    }

    /// **What-if**: Compute the start date for a job ending on end_date, without creating an order.
    #[tool]
    async fn plan_start_date(
        &self,
        /// End date, YYYY-MM-DD (always counted as a working day)
        end_date: String,
        /// Length in working days (>= 1)
        working_days: i64,
        /// Due date to check the end date against, YYYY-MM-DD (optional)
        due_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_plan_start_date(end_date, working_days, due_date)
            .await
    }

    /// **What-if**: Compute the end date for a job starting on start_date, without creating an order.
    #[tool]
    async fn plan_end_date(
        &self,
        /// Start date, YYYY-MM-DD (always counted as a working day)
        start_date: String,
        /// Length in working days (>= 1)
        working_days: i64,
        /// Due date the end date must not pass, YYYY-MM-DD (optional)
        due_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_plan_end_date(start_date, working_days, due_date)
            .await
    }

    /// **Audit**: Compare cached holiday dates with the current rules. Read-only advisory.
    #[tool]
    async fn check_holiday_cache(
        &self,
        /// Order ID; all orders when omitted (optional)
        id: Option<String>,
    ) -> McpResult<String> {
        self.handle_check_holiday_cache(id).await
    }

    /// **Repair**: Overwrite cached holiday dates from the current rules. Start and end dates do not move.
    #[tool]
    async fn recalculate_holidays(
        &self,
        /// Order ID; all orders when omitted (optional)
        id: Option<String>,
    ) -> McpResult<String> {
        self.handle_recalculate_holidays(id).await
    }

    /// **Overview**: Month calendar with holidays, exceptions, running orders and due dates.
    #[tool]
    async fn calendar_month(
        &self,
        /// Month, YYYY-MM
        month: String,
    ) -> McpResult<String> {
        self.handle_calendar_month(month).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn get_test_handler() -> (OrderCalendarHandler, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let handler = OrderCalendarHandler::new(ServerConfig::new(temp_file.path())).unwrap();
        (handler, temp_file)
    }

    #[test]
    fn test_custom_file_path() {
        let (handler, temp_file) = get_test_handler();
        assert_eq!(handler.storage.file_path(), temp_file.path());
        assert_eq!(handler.max_walk_days, DEFAULT_MAX_WALK_DAYS);
    }

    #[test]
    fn test_zero_walk_bound_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ServerConfig::new(temp_file.path()).with_max_walk_days(0);
        assert!(OrderCalendarHandler::new(config).is_err());
    }

    #[test]
    fn test_affected_orders_note() {
        assert_eq!(OrderCalendarHandler::affected_orders_note(&[]), "");
        let note =
            OrderCalendarHandler::affected_orders_note(&["a".to_string(), "b".to_string()]);
        assert!(note.contains("2 order(s)"));
        assert!(note.contains("a, b"));
    }

    fn panic_while_holding(guard: MutexGuard<'_, ScheduleData>) {
        panic!("lock held with {} order(s)", guard.order_count());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let (handler, _temp_file) = get_test_handler();
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| panic_while_holding(handler.data.lock().unwrap()))
                .join();
        });
        assert!(handler.data.is_poisoned());
        assert_eq!(handler.lock_data().order_count(), 0);
    }

    #[tokio::test]
    async fn test_walk_bound_reaches_tools() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ServerConfig::new(temp_file.path()).with_max_walk_days(5);
        let handler = OrderCalendarHandler::new(config).unwrap();

        // 6 working days back with no holidays take 5 steps
        assert!(handler
            .plan_start_date("2024-03-15".to_string(), 6, None)
            .await
            .is_ok());
        // 7 working days back from a Friday need 6 steps, over the bound
        assert!(handler
            .plan_start_date("2024-03-15".to_string(), 7, None)
            .await
            .is_err());
    }
}
