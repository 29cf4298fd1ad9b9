//! Common test utilities for integration tests

#![allow(dead_code)]

use ordercal_mcp::{OrderCalendarHandler, ServerConfig};
use std::path::Path;
use tempfile::NamedTempFile;

/// Create a test handler with temporary storage
pub fn get_test_handler() -> (OrderCalendarHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = handler_at(temp_file.path());
    (handler, temp_file)
}

/// Open a handler on an existing schedule file
pub fn handler_at(path: &Path) -> OrderCalendarHandler {
    OrderCalendarHandler::new(ServerConfig::new(path)).unwrap()
}

/// Weekly Sunday closure from 2024-01-01 (rule ID "holiday-1" on a fresh file)
pub async fn add_sunday_rule(handler: &OrderCalendarHandler) -> String {
    handler
        .handle_add_holiday(
            "day_of_week".to_string(),
            "Sunday".to_string(),
            None,
            Some("0".to_string()),
            Some("2024-01-01".to_string()),
            None,
        )
        .await
        .unwrap()
}

/// Add an order ending on its due date
pub async fn add_order(
    handler: &OrderCalendarHandler,
    id: &str,
    due_date: &str,
    working_days: i64,
) -> mcp_attr::Result<String> {
    handler
        .handle_add_order(
            id.to_string(),
            format!("Order {}", id),
            due_date.to_string(),
            working_days,
            None,
            None,
            None,
            None,
            None,
        )
        .await
}
