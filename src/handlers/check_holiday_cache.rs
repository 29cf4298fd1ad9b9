//! Holiday cache check handler

use crate::OrderCalendarHandler;
use crate::formatting::describe_staleness;
use crate::schedule::ScheduleError;
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Report orders whose cached holiday list no longer matches the rules.
    ///
    /// Advisory only; nothing is changed.
    pub async fn handle_check_holiday_cache(&self, id: Option<String>) -> McpResult<String> {
        let data = self.lock_data();

        if let Some(id) = id.as_deref().map(validation::normalize_id)
            && !id.is_empty()
        {
            let Some(order) = data.find_order(&id) else {
                return Err(validation::schedule_error(ScheduleError::OrderNotFound(id)));
            };
            let report = order
                .holiday_cache_report(data.rules())
                .map_err(validation::calendar_error)?;
            return Ok(match describe_staleness(&report) {
                Some(drift) => format!(
                    "Order {} has an outdated holiday cache: {}. Run recalculate_holidays to refresh it.",
                    id, drift
                ),
                None => format!("Order {} holiday cache is up to date", id),
            });
        }

        let stale = data.stale_orders().map_err(validation::calendar_error)?;
        if stale.is_empty() {
            return Ok("All holiday caches are up to date".to_string());
        }
        let mut response = format!("{} order(s) have outdated holiday caches:\n", stale.len());
        for (order, report) in &stale {
            if let Some(drift) = describe_staleness(report) {
                response.push_str(&format!("- {}: {}\n", order.id, drift));
            }
        }
        response.push_str("Run recalculate_holidays to refresh them.");
        Ok(response)
    }
}
