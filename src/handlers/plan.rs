//! Date planning handlers
//!
//! Expose the working-day arithmetic without touching any order.

use crate::OrderCalendarHandler;
use crate::calendar::{self, compute_end_date_within, compute_start_date_within};
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Start date for a job of `working_days` that must end on `end_date`.
    pub async fn handle_plan_start_date(
        &self,
        end_date: String,
        working_days: i64,
        due_date: Option<String>,
    ) -> McpResult<String> {
        let end = validation::parse_date("end_date", &end_date)?;
        let days = validation::parse_working_days(working_days)?;
        if let Some(due) = validation::parse_optional_date("due_date", due_date.as_deref())? {
            calendar::ensure_within_due(end, due).map_err(validation::calendar_error)?;
        }

        let data = self.lock_data();
        let plan = compute_start_date_within(end, days, data.rules(), self.max_walk_days)
            .map_err(validation::calendar_error)?;

        let mut response = format!(
            "Start date: {} ({} working days ending {})",
            plan.start_date, days, end
        );
        if plan.holiday_dates.is_empty() {
            response.push_str("\nNo holidays in range");
        } else {
            let dates: Vec<String> = plan.holiday_dates.iter().map(|d| d.to_string()).collect();
            response.push_str(&format!("\nHolidays in range: {}", dates.join(", ")));
        }
        Ok(response)
    }

    /// End date reached after `working_days` starting on `start_date`.
    pub async fn handle_plan_end_date(
        &self,
        start_date: String,
        working_days: i64,
        due_date: Option<String>,
    ) -> McpResult<String> {
        let start = validation::parse_date("start_date", &start_date)?;
        let days = validation::parse_working_days(working_days)?;
        let due = validation::parse_optional_date("due_date", due_date.as_deref())?;

        let data = self.lock_data();
        let end = compute_end_date_within(start, days, data.rules(), self.max_walk_days)
            .map_err(validation::calendar_error)?;
        if let Some(due) = due {
            calendar::ensure_within_due(end, due).map_err(validation::calendar_error)?;
        }
        let holidays = calendar::holiday_dates_in_range(start, end, data.rules())
            .map_err(validation::calendar_error)?;

        let mut response = format!(
            "End date: {} ({} working days starting {})",
            end, days, start
        );
        if !holidays.is_empty() {
            let dates: Vec<String> = holidays.iter().map(|d| d.to_string()).collect();
            response.push_str(&format!("\nHolidays in range: {}", dates.join(", ")));
        }
        Ok(response)
    }
}
