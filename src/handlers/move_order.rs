//! Move order handler

use crate::OrderCalendarHandler;
use crate::calendar::holiday_name;
use crate::schedule::{ScheduleError, local_date_today};
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Shift an order to a new start date, keeping its working-day count.
    pub async fn handle_move_order(&self, id: String, start_date: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let start = validation::parse_date("start_date", &start_date)?;

        let mut data = self.lock_data();
        let Some(mut order) = data.find_order(&id).cloned() else {
            return Err(validation::schedule_error(ScheduleError::OrderNotFound(id)));
        };
        let previous = (order.start_date, order.end_date);

        order
            .relocate(start, data.rules(), self.max_walk_days)
            .map_err(validation::calendar_error)?;
        let start_holiday = holiday_name(start, data.rules());
        order.updated_at = local_date_today();
        data.update_order(order.clone())
            .map_err(validation::schedule_error)?;
        drop(data);

        let sync_note = self.save_data_with_message(&format!("Move order {} to {}", id, start))?;
        tracing::info!(
            "Order {} moved from {}..{} to {}..{}",
            id,
            previous.0,
            previous.1,
            order.start_date,
            order.end_date
        );

        let mut response = format!(
            "Order {} moved: {} → {} ({} working days), due {}",
            id, order.start_date, order.end_date, order.working_days, order.due_date
        );
        if let Some(name) = start_holiday {
            response.push_str(&format!(
                "\n⚠ Start date {} is a holiday ({}); it is still counted as the first working day.",
                start, name
            ));
        }
        response.push_str(&sync_note);
        Ok(response)
    }
}
