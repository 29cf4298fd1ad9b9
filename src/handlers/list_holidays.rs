//! List holidays handler

use crate::OrderCalendarHandler;
use crate::formatting;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    pub async fn handle_list_holidays(&self, include_cancelled: Option<bool>) -> McpResult<String> {
        let data = self.lock_data();
        let rules = data.holiday_rules(include_cancelled.unwrap_or(false));
        Ok(formatting::format_holiday_rules(&rules))
    }
}
