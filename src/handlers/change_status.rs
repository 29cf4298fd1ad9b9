//! Change status handler

use crate::OrderCalendarHandler;
use crate::schedule::OrderStatus;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl OrderCalendarHandler {
    /// Move one or more orders to a new status, reporting each ID.
    pub async fn handle_change_status(
        &self,
        ids: Vec<String>,
        new_status: String,
    ) -> McpResult<String> {
        if ids.is_empty() {
            bail_public!(_, "No IDs provided. Please specify at least one order ID.");
        }
        let status = validation::parse_status(&new_status)?;
        let is_trash = status == OrderStatus::trash;

        let mut successes = Vec::new();
        let mut failures = Vec::new();

        let mut data = self.lock_data();
        for id in ids.iter().map(|id| validation::normalize_id(id)) {
            let Some(old_status) = data.find_order(&id).map(|o| o.status.clone()) else {
                failures.push(format!("{}: not found", id));
                continue;
            };
            match data.move_status(&id, status.clone()) {
                Ok(()) => successes.push((id, old_status)),
                Err(e) => failures.push(format!("{}: {}", id, e)),
            }
        }
        drop(data);

        let mut sync_note = String::new();
        if !successes.is_empty() {
            let ids_str = if successes.len() == 1 {
                successes[0].0.clone()
            } else {
                format!("{} orders", successes.len())
            };
            sync_note =
                self.save_data_with_message(&format!("Change {} status to {:?}", ids_str, status))?;
            tracing::info!("{} order(s) moved to {:?}", successes.len(), status);
        }

        let mut response = String::new();
        if !successes.is_empty() {
            response.push_str(&format!(
                "Successfully changed status for {} order{}:\n",
                successes.len(),
                if successes.len() == 1 { "" } else { "s" }
            ));
            for (id, old_status) in &successes {
                if is_trash {
                    response.push_str(&format!("- {} (moved to trash)\n", id));
                } else {
                    response.push_str(&format!("- {}: {:?} → {:?}\n", id, old_status, status));
                }
            }
        }
        if !failures.is_empty() {
            if !response.is_empty() {
                response.push('\n');
            }
            response.push_str(&format!(
                "Failed to change status for {} order{}:\n",
                failures.len(),
                if failures.len() == 1 { "" } else { "s" }
            ));
            for failure in &failures {
                response.push_str(&format!("- {}\n", failure));
            }
        }

        if successes.is_empty() {
            bail_public!(_, "{}", response.trim());
        }
        Ok(format!("{}{}", response.trim(), sync_note))
    }
}
