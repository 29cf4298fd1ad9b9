//! Month view handler

use crate::OrderCalendarHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    pub async fn handle_calendar_month(&self, month: String) -> McpResult<String> {
        let first_day = validation::parse_date("month", &format!("{}-01", month.trim()))
            .map_err(|_| {
                mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(
                    format!("Invalid month '{}'. Use YYYY-MM (e.g., '2025-03')", month),
                    true,
                )
            })?;

        let data = self.lock_data();
        Ok(formatting::format_month(first_day, data.rules(), data.orders()))
    }
}
