//! Add order handler

use crate::OrderCalendarHandler;
use crate::calendar::holiday_name;
use crate::schedule::{Order, OrderStatus, ScheduleError, local_date_today};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OrderCalendarHandler {
    /// Create an order and plan its start date backward from the end date.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_order(
        &self,
        id: String,
        title: String,
        due_date: String,
        working_days: i64,
        end_date: Option<String>,
        customer: Option<String>,
        effort_hours: Option<f64>,
        notes: Option<String>,
        status: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        if id.is_empty() {
            bail_public!(_, "Order ID must not be empty. Use a short kebab-case ID such as 'po-1042'.");
        }
        if title.trim().is_empty() {
            bail_public!(_, "Order title must not be empty");
        }

        let due = validation::parse_date("due_date", &due_date)?;
        let end = validation::parse_optional_date("end_date", end_date.as_deref())?.unwrap_or(due);
        let days = validation::parse_working_days(working_days)?;
        let status = match status {
            Some(s) => validation::parse_status(&s)?,
            None => OrderStatus::planned,
        };
        if let Some(hours) = effort_hours
            && !(hours.is_finite() && hours >= 0.0)
        {
            bail_public!(_, "effort_hours must be a non-negative number (got {})", hours);
        }

        let mut data = self.lock_data();
        if data.contains_id(&id) {
            return Err(validation::schedule_error(ScheduleError::DuplicateId(id)));
        }

        let today = local_date_today();
        let mut order = Order {
            id: id.clone(),
            title,
            customer: validation::optional_text(customer).flatten(),
            status,
            effort_hours,
            due_date: due,
            notes: validation::optional_text(notes).flatten(),
            created_at: today,
            updated_at: today,
            ..Default::default()
        };
        order
            .plan_to_end(end, days, data.rules(), self.max_walk_days)
            .map_err(validation::calendar_error)?;
        let end_holiday = holiday_name(end, data.rules());

        data.add_order(order.clone())
            .map_err(validation::schedule_error)?;
        drop(data);

        let sync_note = self.save_data_with_message(&format!("Add order {}", id))?;
        tracing::info!(
            "Order {} planned {} -> {} ({} working days)",
            id,
            order.start_date,
            order.end_date,
            order.working_days
        );

        let mut response = format!(
            "Order created with ID: {}\nSchedule: {} → {} ({} working days), due {}",
            id, order.start_date, order.end_date, order.working_days, order.due_date
        );
        if !order.holiday_dates.is_empty() {
            let dates: Vec<String> = order.holiday_dates.iter().map(|d| d.to_string()).collect();
            response.push_str(&format!("\nHolidays skipped: {}", dates.join(", ")));
        }
        if let Some(name) = end_holiday {
            response.push_str(&format!(
                "\n⚠ End date {} is a holiday ({}); it is still counted as a working day.",
                end, name
            ));
        }
        response.push_str(&sync_note);
        Ok(response)
    }
}
