//! Read-only queries over ScheduleData

use super::order::{Order, OrderStatus};
use super::schedule_data::ScheduleData;
use crate::calendar::{CalendarResult, StalenessReport};
use chrono::NaiveDate;

impl ScheduleData {
    /// Number of stored orders, trash included
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// All orders, optionally restricted to one status
    pub fn list_orders(&self, status_filter: Option<OrderStatus>) -> Vec<Order> {
        match status_filter {
            Some(status) => self
                .orders
                .iter()
                .filter(|o| o.status == status)
                .cloned()
                .collect(),
            None => self.orders.clone(),
        }
    }

    /// Active orders whose span covers `date`
    pub fn orders_on(&self, date: NaiveDate) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.is_active() && o.overlaps(date, date))
            .collect()
    }

    /// Holiday rules for display, optionally with cancelled ones
    pub fn holiday_rules(&self, include_cancelled: bool) -> Vec<&crate::calendar::HolidayRule> {
        if include_cancelled {
            self.holidays.iter().collect()
        } else {
            self.active_rules()
        }
    }

    /// Staleness report for every non-trashed order whose cache has drifted
    pub fn stale_orders(&self) -> CalendarResult<Vec<(&Order, StalenessReport)>> {
        let mut stale = Vec::new();
        for order in self.orders.iter().filter(|o| o.status != OrderStatus::trash) {
            let report = order.holiday_cache_report(&self.holidays)?;
            if !report.is_clean() {
                stale.push((order, report));
            }
        }
        Ok(stale)
    }
}
