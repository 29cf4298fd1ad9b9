//! MCP tool handlers for the order calendar server
//!
//! One file per tool; the `#[mcp_server]` impl in `lib.rs` delegates here.

pub mod add_holiday;
pub mod add_order;
pub mod calendar_month;
pub mod cancel_holiday;
pub mod change_status;
pub mod check_date;
pub mod check_holiday_cache;
pub mod empty_trash;
pub mod list_holidays;
pub mod list_orders;
pub mod move_order;
pub mod plan;
pub mod recalculate_holidays;
pub mod update_order;
