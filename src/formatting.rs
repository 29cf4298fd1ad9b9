//! Text rendering for tool responses
//!
//! Filters narrow a list of orders in place; the `format_*` functions turn
//! orders, rules and calendar views into the plain text returned to clients.

use crate::calendar::{
    self, HolidayKind, HolidayRule, StalenessReport, exception_name, holiday_name, is_holiday,
    is_weekend_heuristic,
};
use crate::schedule::Order;
use chrono::{Datelike, Months, NaiveDate};

/// Keep orders whose `[start_date, end_date]` intersects the window
///
/// Either bound may be open.
pub fn apply_window_filter(orders: &mut Vec<Order>, from: Option<NaiveDate>, to: Option<NaiveDate>) {
    let from = from.unwrap_or(NaiveDate::MIN);
    let to = to.unwrap_or(NaiveDate::MAX);
    orders.retain(|order| order.overlaps(from, to));
}

/// Apply keyword filtering (case-insensitive search in id, title, customer and notes)
pub fn apply_keyword_filter(orders: &mut Vec<Order>, keyword: &str) {
    let keyword_lower = keyword.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&keyword_lower);
    orders.retain(|order| {
        contains(order.id.as_str())
            || contains(order.title.as_str())
            || order.customer.as_deref().is_some_and(contains)
            || order.notes.as_deref().is_some_and(contains)
    });
}

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary of cache drift, `None` when the cache is current
pub fn describe_staleness(report: &StalenessReport) -> Option<String> {
    if report.is_clean() {
        return None;
    }
    let mut parts = Vec::new();
    if !report.stale.is_empty() {
        parts.push(format!("no longer holidays: {}", join_dates(&report.stale)));
    }
    if !report.missing.is_empty() {
        parts.push(format!("new holidays: {}", join_dates(&report.missing)));
    }
    Some(parts.join("; "))
}

/// Format orders into a display string
///
/// # Arguments
/// * `orders` - Orders to format
/// * `rules` - Current holiday rules, used to flag outdated holiday caches
/// * `exclude_notes` - Whether to leave notes out of the output
/// * `today` - Reference date for overdue flags
pub fn format_orders(
    orders: Vec<Order>,
    rules: &[HolidayRule],
    exclude_notes: bool,
    today: NaiveDate,
) -> String {
    if orders.is_empty() {
        return "No orders found".to_string();
    }

    let mut result = format!("Found {} order(s):\n\n", orders.len());
    for order in orders {
        result.push_str(&format!(
            "- [{}] {} (status: {:?})\n",
            order.id, order.title, order.status
        ));
        if let Some(ref customer) = order.customer {
            result.push_str(&format!("  Customer: {}\n", customer));
        }
        result.push_str(&format!(
            "  Schedule: {} → {} ({} working day{}), due {}\n",
            order.start_date,
            order.end_date,
            order.working_days,
            if order.working_days == 1 { "" } else { "s" },
            order.due_date
        ));
        if !order.holiday_dates.is_empty() {
            result.push_str(&format!("  Holidays: {}\n", join_dates(&order.holiday_dates)));
        }
        if let Some(hours) = order.effort_hours {
            result.push_str(&format!("  Effort: {} h\n", hours));
        }
        if order.is_overdue(today) {
            result.push_str("  ⚠ Overdue\n");
        }
        if let Ok(report) = order.holiday_cache_report(rules)
            && let Some(drift) = describe_staleness(&report)
        {
            result.push_str(&format!("  ⚠ Holiday cache outdated ({})", drift));
            if let Ok(days) = order.scheduled_working_days(rules)
                && days != order.working_days
            {
                result.push_str(&format!("; the range now holds {} working day(s)", days));
            }
            result.push_str("; run recalculate_holidays\n");
        }
        if !exclude_notes && let Some(ref n) = order.notes {
            result.push_str(&format!("  Notes: {}\n", n));
        }
        result.push_str(&format!("  Created: {}\n", order.created_at));
        result.push_str(&format!("  Updated: {}\n", order.updated_at));
    }

    result
}

fn format_rule(rule: &HolidayRule) -> String {
    let mut line = format!(
        "- [{}] {} ({}: {})",
        rule.id,
        rule.name,
        rule.kind,
        rule.describe()
    );
    if rule.cancelled {
        match rule.cancelled_on {
            Some(on) => line.push_str(&format!(" [cancelled on {}]", on)),
            None => line.push_str(" [cancelled]"),
        }
    }
    line.push('\n');
    line
}

/// Format holiday rules, grouped by kind
pub fn format_holiday_rules(rules: &[&HolidayRule]) -> String {
    if rules.is_empty() {
        return "No holiday rules defined".to_string();
    }

    let mut result = format!("Found {} holiday rule(s):\n", rules.len());
    for (kind, heading) in [
        (HolidayKind::DayOfWeek, "Weekly holidays"),
        (HolidayKind::SpecificDate, "Specific dates"),
        (HolidayKind::Exception, "Working-day exceptions"),
    ] {
        let group: Vec<_> = rules.iter().filter(|r| r.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        result.push_str(&format!("\n{}:\n", heading));
        for rule in group {
            result.push_str(&format_rule(rule));
        }
    }
    result
}

/// Describe how `date` is classified
pub fn format_date_check(date: NaiveDate, rules: &[HolidayRule]) -> String {
    let weekday = calendar::weekday_name(calendar::weekday_number(date)).unwrap_or("?");
    if is_holiday(date, rules) {
        let name = holiday_name(date, rules).unwrap_or_default();
        return format!("{} ({}) is a holiday: {}", date, weekday, name);
    }
    match exception_name(date, rules) {
        Some(name) => format!(
            "{} ({}) is a working day by exception: {}",
            date, weekday, name
        ),
        None if is_weekend_heuristic(date) => format!(
            "{} ({}) is a working day (weekend, but no holiday rule covers it)",
            date, weekday
        ),
        None => format!("{} ({}) is a working day", date, weekday),
    }
}

/// Month view: one line per day with holidays, exceptions and active orders
///
/// `first_day` is any date in the month to render.
pub fn format_month(first_day: NaiveDate, rules: &[HolidayRule], orders: &[Order]) -> String {
    let start = first_day.with_day(1).unwrap_or(first_day);
    let next_month = start.checked_add_months(Months::new(1));

    let mut result = format!("Calendar for {}\n\n", start.format("%Y-%m"));
    let mut working = 0;
    for day in start
        .iter_days()
        .take_while(|d| next_month.is_none_or(|next| *d < next))
    {
        let mut line = format!("{} {}", day, day.format("%a"));
        if is_holiday(day, rules) {
            line.push_str(&format!(
                "  holiday: {}",
                holiday_name(day, rules).unwrap_or_default()
            ));
        } else {
            working += 1;
            if let Some(name) = exception_name(day, rules) {
                line.push_str(&format!("  exception: {}", name));
            } else if is_weekend_heuristic(day) {
                line.push_str("  (weekend, working)");
            }
        }

        let ids: Vec<&str> = orders
            .iter()
            .filter(|o| o.is_active() && o.overlaps(day, day))
            .map(|o| o.id.as_str())
            .collect();
        if !ids.is_empty() {
            line.push_str(&format!("  orders: {}", ids.join(", ")));
        }
        if orders.iter().any(|o| o.is_active() && o.due_date == day) {
            line.push_str("  [due]");
        }
        result.push_str(&line);
        result.push('\n');
    }
    result.push_str(&format!("\nWorking days: {}\n", working));
    result
}
