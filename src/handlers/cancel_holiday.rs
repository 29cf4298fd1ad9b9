//! Cancel holiday handler

use crate::OrderCalendarHandler;
use crate::schedule::local_date_today;
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Soft-cancel a holiday rule. The rule stays on file, marked cancelled.
    pub async fn handle_cancel_holiday(
        &self,
        id: String,
        cancelled_on: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let on = validation::parse_optional_date("cancelled_on", cancelled_on.as_deref())?
            .unwrap_or_else(local_date_today);

        let mut data = self.lock_data();
        let rule = data
            .cancel_holiday_rule(&id, on)
            .map_err(validation::schedule_error)?;
        let summary = format!("{} ({}: {})", rule.name, rule.kind, rule.describe());
        let affected = self.stale_order_ids(&data);
        drop(data);

        let sync_note = self.save_data_with_message(&format!("Cancel holiday {}", id))?;
        tracing::info!("Holiday rule {} cancelled on {}", id, on);

        let mut response = format!("Holiday rule {} cancelled on {}: {}", id, on, summary);
        response.push_str(&Self::affected_orders_note(&affected));
        response.push_str(&sync_note);
        Ok(response)
    }
}
