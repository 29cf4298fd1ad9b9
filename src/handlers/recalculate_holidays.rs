//! Holiday cache recalculation handler

use crate::OrderCalendarHandler;
use crate::schedule::{ScheduleError, local_date_today};
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Rescan `[start_date, end_date]` and overwrite the cached holiday list
    /// of one order, or of every order when no ID is given.
    ///
    /// Dates never move; only the cache is refreshed.
    pub async fn handle_recalculate_holidays(&self, id: Option<String>) -> McpResult<String> {
        let mut data = self.lock_data();

        let changed = match id.as_deref().map(validation::normalize_id) {
            Some(id) if !id.is_empty() => {
                let Some(mut order) = data.find_order(&id).cloned() else {
                    return Err(validation::schedule_error(ScheduleError::OrderNotFound(id)));
                };
                if order
                    .recalculate_holidays(data.rules())
                    .map_err(validation::calendar_error)?
                {
                    order.updated_at = local_date_today();
                    data.update_order(order)
                        .map_err(validation::schedule_error)?;
                    vec![id]
                } else {
                    Vec::new()
                }
            }
            _ => data
                .recalculate_all_holidays()
                .map_err(validation::calendar_error)?,
        };
        drop(data);

        if changed.is_empty() {
            return Ok("Holiday caches already up to date; nothing changed".to_string());
        }

        let subject = if changed.len() == 1 {
            changed[0].clone()
        } else {
            format!("{} orders", changed.len())
        };
        let sync_note =
            self.save_data_with_message(&format!("Recalculate holidays for {}", subject))?;
        tracing::info!("Recalculated holiday caches: {}", changed.join(", "));

        Ok(format!(
            "Recalculated holiday cache for {} order(s): {}{}",
            changed.len(),
            changed.join(", "),
            sync_note
        ))
    }
}
