//! Update order handler

use crate::OrderCalendarHandler;
use crate::calendar;
use crate::schedule::{ScheduleError, local_date_today};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OrderCalendarHandler {
    /// Edit an order. Changing working days or the end date re-plans the
    /// start date from the (new) end date. A due date change alone only
    /// checks the current end date against it.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_order(
        &self,
        id: String,
        title: Option<String>,
        customer: Option<String>,
        notes: Option<String>,
        effort_hours: Option<f64>,
        due_date: Option<String>,
        working_days: Option<i64>,
        end_date: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let due = validation::parse_optional_date("due_date", due_date.as_deref())?;
        let end = validation::parse_optional_date("end_date", end_date.as_deref())?;
        let days = working_days
            .map(validation::parse_working_days)
            .transpose()?;
        if let Some(hours) = effort_hours
            && !(hours.is_finite() && hours >= 0.0)
        {
            bail_public!(_, "effort_hours must be a non-negative number (got {})", hours);
        }

        let mut data = self.lock_data();
        let Some(mut order) = data.find_order(&id).cloned() else {
            return Err(validation::schedule_error(ScheduleError::OrderNotFound(id)));
        };

        let mut changes = Vec::new();
        if let Some(title) = title {
            if title.trim().is_empty() {
                bail_public!(_, "Order title must not be empty");
            }
            order.title = title;
            changes.push("title");
        }
        if let Some(customer) = validation::optional_text(customer) {
            order.customer = customer;
            changes.push("customer");
        }
        if let Some(notes) = validation::optional_text(notes) {
            order.notes = notes;
            changes.push("notes");
        }
        if effort_hours.is_some() {
            order.effort_hours = effort_hours;
            changes.push("effort_hours");
        }

        if let Some(due) = due {
            order.due_date = due;
            changes.push("due_date");
        }
        let replan = days.is_some() || end.is_some();
        if !replan && due.is_some() {
            calendar::ensure_within_due(order.end_date, order.due_date)
                .map_err(validation::calendar_error)?;
        }
        if replan {
            let new_end = end.unwrap_or(order.end_date);
            let new_days = days.unwrap_or(order.working_days);
            order
                .plan_to_end(new_end, new_days, data.rules(), self.max_walk_days)
                .map_err(validation::calendar_error)?;
            changes.push("schedule");
        }

        if changes.is_empty() {
            bail_public!(_, "No fields to update. Provide at least one field to change.");
        }

        order.updated_at = local_date_today();
        data.update_order(order.clone())
            .map_err(validation::schedule_error)?;
        drop(data);

        let sync_note = self.save_data_with_message(&format!("Update order {}", id))?;
        tracing::info!("Order {} updated: {}", id, changes.join(", "));

        let mut response = format!("Order {} updated ({})", id, changes.join(", "));
        if replan || due.is_some() {
            response.push_str(&format!(
                "\nSchedule: {} → {} ({} working days), due {}",
                order.start_date, order.end_date, order.working_days, order.due_date
            ));
        }
        response.push_str(&sync_note);
        Ok(response)
    }
}
