//! Check date handler

use crate::OrderCalendarHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Classify a date and list the active orders scheduled on it.
    pub async fn handle_check_date(&self, date: String) -> McpResult<String> {
        let date = validation::parse_date("date", &date)?;

        let data = self.lock_data();
        let mut response = formatting::format_date_check(date, data.rules());
        let orders = data.orders_on(date);
        if !orders.is_empty() {
            let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
            response.push_str(&format!("\nOrders in progress: {}", ids.join(", ")));
        }
        Ok(response)
    }
}
