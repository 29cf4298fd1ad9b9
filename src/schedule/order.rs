use crate::calendar::{
    self, CalendarResult, HolidayRule, StalenessReport, compute_end_date_within,
    compute_start_date_within, ensure_ordered, ensure_within_due,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Order status in the production workflow
///
/// Uses snake_case naming to match TOML serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted and scheduled, work not started
    planned,
    /// Work underway
    in_progress,
    /// Blocked on the customer, material or another order
    waiting,
    /// Delivered
    done,
    /// Discarded, removed permanently by empty_trash
    trash,
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(OrderStatus::planned),
            "in_progress" => Ok(OrderStatus::in_progress),
            "waiting" => Ok(OrderStatus::waiting),
            "done" => Ok(OrderStatus::done),
            "trash" => Ok(OrderStatus::trash),
            _ => Err(format!(
                "Invalid status '{}'. Valid options are: planned, in_progress, waiting, done, trash",
                s
            )),
        }
    }
}

/// A scheduled order
///
/// `start_date` is derived from `end_date` and `working_days` by walking
/// back over the holiday calendar. `holiday_dates` is a snapshot of the
/// holidays inside `[start_date, end_date]` taken at the last save; it is
/// not refreshed when holiday rules change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Unique identifier (e.g., "po-1042", "bracket-batch-7")
    pub id: String,
    /// Short description of the work
    pub title: String,
    /// Optional customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub status: OrderStatus,
    /// Optional estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort_hours: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Latest acceptable end date
    pub due_date: NaiveDate,
    /// Working days spanned by `[start_date, end_date]`, both ends counted
    pub working_days: u32,
    /// Holidays inside `[start_date, end_date]` at last save
    pub holiday_dates: Vec<NaiveDate>,
    /// Optional notes in Markdown format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl Default for Order {
    fn default() -> Self {
        let today = local_date_today();
        Self {
            id: String::new(),
            title: String::new(),
            customer: None,
            status: OrderStatus::planned,
            effort_hours: None,
            start_date: today,
            end_date: today,
            due_date: today,
            working_days: 1,
            holiday_dates: Vec::new(),
            notes: None,
            created_at: today,
            updated_at: today,
        }
    }
}

impl Order {
    /// Orders still occupying the schedule (not done, not trashed)
    pub fn is_active(&self) -> bool {
        !matches!(self.status, OrderStatus::done | OrderStatus::trash)
    }

    /// True if the order is active and `today` is past its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && today > self.due_date
    }

    /// True if `[start_date, end_date]` intersects `[from, to]`
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && self.end_date >= from
    }

    /// Schedule the order to finish on `end_date` after `working_days`
    /// working days, deriving the start date and refreshing the cache.
    ///
    /// Fails without touching the order if `end_date` is past the due date
    /// or the walk cannot complete.
    pub fn plan_to_end(
        &mut self,
        end_date: NaiveDate,
        working_days: u32,
        rules: &[HolidayRule],
        max_walk_days: u32,
    ) -> CalendarResult<()> {
        ensure_within_due(end_date, self.due_date)?;
        let plan = compute_start_date_within(end_date, working_days, rules, max_walk_days)?;
        self.start_date = plan.start_date;
        self.end_date = end_date;
        self.working_days = working_days.max(1);
        self.holiday_dates = plan.holiday_dates;
        Ok(())
    }

    /// Move the order to start on `start_date`, keeping its working-day count.
    pub fn relocate(
        &mut self,
        start_date: NaiveDate,
        rules: &[HolidayRule],
        max_walk_days: u32,
    ) -> CalendarResult<()> {
        let end_date = compute_end_date_within(start_date, self.working_days, rules, max_walk_days)?;
        ensure_within_due(end_date, self.due_date)?;
        self.holiday_dates = calendar::holiday_dates_in_range(start_date, end_date, rules)?;
        self.start_date = start_date;
        self.end_date = end_date;
        Ok(())
    }

    /// Compare the cached holiday list against `rules`
    pub fn holiday_cache_report(&self, rules: &[HolidayRule]) -> CalendarResult<StalenessReport> {
        calendar::check_holiday_cache(self.start_date, self.end_date, &self.holiday_dates, rules)
    }

    /// Rebuild the holiday cache from `rules`. Returns `true` if it changed.
    pub fn recalculate_holidays(&mut self, rules: &[HolidayRule]) -> CalendarResult<bool> {
        let fresh = calendar::holiday_dates_in_range(self.start_date, self.end_date, rules)?;
        if fresh == self.holiday_dates {
            return Ok(false);
        }
        self.holiday_dates = fresh;
        Ok(true)
    }

    /// Working days currently inside `[start_date, end_date]` under `rules`
    pub fn scheduled_working_days(&self, rules: &[HolidayRule]) -> CalendarResult<u32> {
        ensure_ordered(self.start_date, self.end_date)?;
        calendar::working_days_between(self.start_date, self.end_date, rules)
    }
}
