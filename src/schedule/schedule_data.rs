use super::error::ScheduleError;
use super::order::{Order, OrderStatus, local_date_today};
use crate::calendar::{CalendarResult, HolidayKind, HolidayRule};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Newest TOML layout this build reads and writes
pub const CURRENT_FORMAT_VERSION: u32 = 1;

#[derive(Debug)]
pub struct ScheduleData {
    /// Format version for the TOML file
    pub format_version: u32,

    /// All orders, in insertion order so the TOML output diffs cleanly
    pub(crate) orders: Vec<Order>,

    /// ID → status index for O(1) duplicate checks
    ///
    /// Not serialized; rebuilt from `orders` on load and kept in sync by
    /// every mutating method.
    pub(crate) order_map: HashMap<String, OrderStatus>,

    /// Holiday rules, cancelled ones included so the history survives
    pub(crate) holidays: Vec<HolidayRule>,

    /// Counter for generating holiday rule IDs
    pub holiday_counter: u32,
}

impl Default for ScheduleData {
    fn default() -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION,
            orders: Vec::new(),
            order_map: HashMap::new(),
            holidays: Vec::new(),
            holiday_counter: 0,
        }
    }
}

// Serialize/Deserialize implementations are in serde_impl.rs

impl ScheduleData {
    /// Create a new empty ScheduleData instance
    pub fn new() -> Self {
        Self::default()
    }

    /// True if an order or a holiday rule already uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.order_map.contains_key(id) || self.holidays.iter().any(|r| r.id == id)
    }

    /// Add an order
    pub fn add_order(&mut self, order: Order) -> Result<(), ScheduleError> {
        if self.contains_id(&order.id) {
            return Err(ScheduleError::DuplicateId(order.id));
        }
        self.order_map.insert(order.id.clone(), order.status.clone());
        self.orders.push(order);
        Ok(())
    }

    /// Find an order by its ID
    pub fn find_order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Find an order by its ID and return a mutable reference
    ///
    /// Status changes must go through `move_status` or `update_order` so the
    /// index stays in sync.
    pub fn find_order_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    /// Replace an order in place, keeping its position
    ///
    /// # Returns
    /// The previous version of the order
    pub fn update_order(&mut self, order: Order) -> Result<Order, ScheduleError> {
        let pos = self
            .orders
            .iter()
            .position(|o| o.id == order.id)
            .ok_or_else(|| ScheduleError::OrderNotFound(order.id.clone()))?;
        self.order_map.insert(order.id.clone(), order.status.clone());
        Ok(std::mem::replace(&mut self.orders[pos], order))
    }

    /// Move an order to a different status and stamp `updated_at`
    pub fn move_status(&mut self, id: &str, new_status: OrderStatus) -> Result<(), ScheduleError> {
        let order = self
            .find_order_mut(id)
            .ok_or_else(|| ScheduleError::OrderNotFound(id.to_string()))?;
        order.status = new_status.clone();
        order.updated_at = local_date_today();
        self.order_map.insert(id.to_string(), new_status);
        Ok(())
    }

    /// Remove every trashed order, returning how many were removed
    pub fn empty_trash(&mut self) -> usize {
        let before = self.orders.len();
        self.orders.retain(|o| o.status != OrderStatus::trash);
        self.order_map
            .retain(|_, status| *status != OrderStatus::trash);
        before - self.orders.len()
    }

    /// Generate an unused holiday rule ID (`holiday-1`, `holiday-2`, ...)
    pub fn next_holiday_id(&mut self) -> String {
        loop {
            self.holiday_counter += 1;
            let id = format!("holiday-{}", self.holiday_counter);
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    /// Add a holiday rule
    ///
    /// Checks that the fields required by the rule's kind are present and
    /// that no other active `day_of_week` rule exists.
    pub fn add_holiday_rule(&mut self, rule: HolidayRule) -> Result<(), ScheduleError> {
        if self.contains_id(&rule.id) {
            return Err(ScheduleError::DuplicateId(rule.id));
        }
        match rule.kind {
            HolidayKind::SpecificDate | HolidayKind::Exception if rule.date.is_none() => {
                return Err(ScheduleError::MissingRuleField {
                    kind: rule.kind.to_string(),
                    field: "date",
                });
            }
            HolidayKind::DayOfWeek if rule.weekday.is_none_or(|w| w > 6) => {
                return Err(ScheduleError::MissingRuleField {
                    kind: rule.kind.to_string(),
                    field: "weekday",
                });
            }
            _ => {}
        }
        if rule.kind == HolidayKind::DayOfWeek
            && rule.is_active()
            && let Some(existing) = self
                .holidays
                .iter()
                .find(|r| r.kind == HolidayKind::DayOfWeek && r.is_active())
        {
            return Err(ScheduleError::WeekdayRuleConflict {
                existing: existing.id.clone(),
            });
        }
        self.holidays.push(rule);
        Ok(())
    }

    /// Find a holiday rule by ID, cancelled or not
    pub fn find_holiday_rule(&self, id: &str) -> Option<&HolidayRule> {
        self.holidays.iter().find(|r| r.id == id)
    }

    /// Soft-cancel a holiday rule, recording the cancellation date
    pub fn cancel_holiday_rule(
        &mut self,
        id: &str,
        on: NaiveDate,
    ) -> Result<&HolidayRule, ScheduleError> {
        let rule = self
            .holidays
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ScheduleError::RuleNotFound(id.to_string()))?;
        if rule.cancelled {
            return Err(ScheduleError::AlreadyCancelled(id.to_string()));
        }
        rule.cancel(on);
        Ok(rule)
    }

    /// Every holiday rule, cancelled included
    ///
    /// This is the snapshot handed to the calendar functions; they ignore
    /// cancelled rules themselves.
    pub fn rules(&self) -> &[HolidayRule] {
        &self.holidays
    }

    /// Holiday rules that still apply
    pub fn active_rules(&self) -> Vec<&HolidayRule> {
        self.holidays.iter().filter(|r| r.is_active()).collect()
    }

    /// All orders in insertion order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Rebuild the holiday cache of every non-trashed order
    ///
    /// Returns the IDs of the orders whose cache changed. Dates are left as
    /// they are; only the cached holiday list is refreshed.
    pub fn recalculate_all_holidays(&mut self) -> CalendarResult<Vec<String>> {
        let today = local_date_today();
        let mut changed = Vec::new();
        for order in self
            .orders
            .iter_mut()
            .filter(|o| o.status != OrderStatus::trash)
        {
            if order.recalculate_holidays(&self.holidays)? {
                order.updated_at = today;
                changed.push(order.id.clone());
            }
        }
        Ok(changed)
    }
}
