//! Order scheduling domain models and the record store
//!
//! Submodules:
//! - `order`: the order record and its planning helpers
//! - `schedule_data`: container for orders and holiday rules
//! - `queries`: read-only queries over the container
//! - `serde_impl`: TOML layout of the container
//! - `error`: record-store errors

mod error;
mod order;
mod queries;
mod schedule_data;
mod serde_impl;

pub use error::ScheduleError;
pub use order::{Order, OrderStatus, local_date_today};
pub use schedule_data::{CURRENT_FORMAT_VERSION, ScheduleData};
