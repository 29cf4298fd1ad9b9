//! List orders handler

use crate::OrderCalendarHandler;
use crate::calendar;
use crate::formatting;
use crate::schedule::{OrderStatus, local_date_today};
use crate::validation;
use mcp_attr::Result as McpResult;

impl OrderCalendarHandler {
    /// List orders with optional status, date window and keyword filters.
    ///
    /// Without a status filter, trashed orders are hidden.
    pub async fn handle_list_orders(
        &self,
        status: Option<String>,
        from: Option<String>,
        to: Option<String>,
        keyword: Option<String>,
        exclude_notes: Option<bool>,
    ) -> McpResult<String> {
        let status_filter = match status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(validation::parse_status(s)?),
        };
        let from = validation::parse_optional_date("from", from.as_deref())?;
        let to = validation::parse_optional_date("to", to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            calendar::ensure_ordered(from, to).map_err(validation::calendar_error)?;
        }

        let data = self.lock_data();
        let mut orders = data.list_orders(status_filter.clone());
        if status_filter.is_none() {
            orders.retain(|o| o.status != OrderStatus::trash);
        }
        if from.is_some() || to.is_some() {
            formatting::apply_window_filter(&mut orders, from, to);
        }
        if let Some(keyword) = keyword.as_deref()
            && !keyword.trim().is_empty()
        {
            formatting::apply_keyword_filter(&mut orders, keyword.trim());
        }

        Ok(formatting::format_orders(
            orders,
            data.rules(),
            exclude_notes.unwrap_or(false),
            local_date_today(),
        ))
    }
}
