//! Empty trash handler

use crate::OrderCalendarHandler;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// Permanently delete every order in trash.
    pub async fn handle_empty_trash(&self) -> McpResult<String> {
        let count = self.lock_data().empty_trash();

        let sync_note = self.save_data_with_message("Empty trash")?;
        tracing::info!("Deleted {} order(s) from trash", count);

        Ok(format!("Deleted {} order(s) from trash{}", count, sync_note))
    }
}
