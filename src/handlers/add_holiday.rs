//! Add holiday handler

use crate::OrderCalendarHandler;
use crate::calendar::{HolidayKind, HolidayRule};
use crate::schedule::local_date_today;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OrderCalendarHandler {
    /// Add a holiday rule: a specific date, a weekly weekday, or a
    /// working-day exception.
    pub async fn handle_add_holiday(
        &self,
        kind: String,
        name: String,
        date: Option<String>,
        weekday: Option<String>,
        effective_from: Option<String>,
        id: Option<String>,
    ) -> McpResult<String> {
        let kind = validation::parse_kind(&kind)?;
        if name.trim().is_empty() {
            bail_public!(_, "Holiday name must not be empty");
        }
        let date = validation::parse_optional_date("date", date.as_deref())?;
        let effective_from =
            validation::parse_optional_date("effective_from", effective_from.as_deref())?;
        let weekday = weekday.filter(|w| !w.trim().is_empty());

        match kind {
            HolidayKind::SpecificDate | HolidayKind::Exception => {
                if weekday.is_some() {
                    bail_public!(
                        _,
                        "'weekday' only applies to kind=day_of_week. Use 'date' for kind={}.",
                        kind
                    );
                }
                if effective_from.is_some() {
                    bail_public!(
                        _,
                        "'effective_from' only applies to kind=day_of_week. kind={} takes effect on its 'date'.",
                        kind
                    );
                }
            }
            HolidayKind::DayOfWeek => {
                if date.is_some() {
                    bail_public!(
                        _,
                        "'date' does not apply to kind=day_of_week. Use 'weekday' and, to set the first day, 'effective_from'."
                    );
                }
            }
        }

        let mut data = self.lock_data();
        let id = match id.as_deref().map(validation::normalize_id) {
            Some(id) if !id.is_empty() => id,
            _ => data.next_holiday_id(),
        };
        if let Some(existing) = data.find_holiday_rule(&id) {
            bail_public!(
                _,
                "Holiday rule ID '{}' is already used by {} ({}: {}). Choose another ID or omit it to generate one.",
                id,
                existing.name,
                existing.kind,
                existing.describe()
            );
        }

        let rule = match kind {
            HolidayKind::SpecificDate | HolidayKind::Exception => {
                let Some(date) = date else {
                    bail_public!(_, "kind={} requires the 'date' parameter (YYYY-MM-DD)", kind);
                };
                if kind == HolidayKind::SpecificDate {
                    HolidayRule::specific_date(&id, name, date)
                } else {
                    HolidayRule::exception(&id, name, date)
                }
            }
            HolidayKind::DayOfWeek => {
                let Some(weekday) = weekday else {
                    bail_public!(
                        _,
                        "kind=day_of_week requires the 'weekday' parameter (0-6, 0=Sunday, or a weekday name)"
                    );
                };
                let weekday = validation::parse_weekday(&weekday)?;
                let from = effective_from.unwrap_or_else(local_date_today);
                HolidayRule::day_of_week(&id, name, weekday, Some(from))
            }
        };
        let description = rule.describe();
        data.add_holiday_rule(rule)
            .map_err(validation::schedule_error)?;

        let affected = self.stale_order_ids(&data);
        drop(data);

        let sync_note =
            self.save_data_with_message(&format!("Add holiday {} ({})", id, description))?;
        tracing::info!("Holiday rule {} added: {} {}", id, kind, description);

        let mut response = format!(
            "Holiday rule created with ID: {} ({}: {})",
            id, kind, description
        );
        response.push_str(&Self::affected_orders_note(&affected));
        response.push_str(&sync_note);
        Ok(response)
    }
}
