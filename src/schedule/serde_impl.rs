//! Serialization and deserialization for ScheduleData
//!
//! On disk the data is laid out as:
//!
//! ```toml
//! format_version = 1
//! holiday_counter = 2
//!
//! [[holiday]]
//! id = "holiday-1"
//! ...
//!
//! [[order]]
//! id = "po-1042"
//! ...
//! ```
//!
//! The `order_map` index is never written; it is rebuilt on load.

use super::order::Order;
use super::schedule_data::{CURRENT_FORMAT_VERSION, ScheduleData};
use crate::calendar::HolidayRule;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Raw file layout, every field optional so a blank file loads
#[derive(Deserialize)]
struct ScheduleFile {
    #[serde(default = "default_format_version")]
    format_version: u32,
    #[serde(default)]
    holiday_counter: u32,
    #[serde(default)]
    holiday: Vec<HolidayRule>,
    #[serde(default)]
    order: Vec<Order>,
}

fn default_format_version() -> u32 {
    CURRENT_FORMAT_VERSION
}

/// Normalize Windows line endings in free-text fields
fn normalize_line_endings(text: &mut Option<String>) {
    if let Some(s) = text
        && s.contains('\r')
    {
        *s = s.replace("\r\n", "\n");
    }
}

impl<'de> Deserialize<'de> for ScheduleData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let file = ScheduleFile::deserialize(deserializer)?;
        if file.format_version > CURRENT_FORMAT_VERSION {
            return Err(D::Error::custom(format!(
                "format_version {} is newer than this build supports ({}); upgrade ordercal-mcp before editing this file",
                file.format_version, CURRENT_FORMAT_VERSION
            )));
        }

        let mut orders = file.order;
        for order in &mut orders {
            normalize_line_endings(&mut order.notes);
            order.holiday_dates.sort();
            order.holiday_dates.dedup();
        }

        let order_map: HashMap<_, _> = orders
            .iter()
            .map(|o| (o.id.clone(), o.status.clone()))
            .collect();

        Ok(ScheduleData {
            format_version: file.format_version,
            orders,
            order_map,
            holidays: file.holiday,
            holiday_counter: file.holiday_counter,
        })
    }
}

impl Serialize for ScheduleData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ScheduleData", 4)?;
        state.serialize_field("format_version", &self.format_version)?;
        if self.holiday_counter != 0 {
            state.serialize_field("holiday_counter", &self.holiday_counter)?;
        }
        if !self.holidays.is_empty() {
            state.serialize_field("holiday", &self.holidays)?;
        }
        if !self.orders.is_empty() {
            state.serialize_field("order", &self.orders)?;
        }
        state.end()
    }
}
