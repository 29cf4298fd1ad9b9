use thiserror::Error;

/// Record-store errors for orders and holiday rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("ID '{0}' already exists. Each order and holiday rule needs a unique ID.")]
    DuplicateId(String),

    #[error("Order '{0}' does not exist. Use list_orders() to see available orders.")]
    OrderNotFound(String),

    #[error("Holiday rule '{0}' does not exist. Use list_holidays() to see available rules.")]
    RuleNotFound(String),

    /// Only one active weekday rule may exist at a time.
    #[error(
        "An active day_of_week rule already exists ('{existing}'). Cancel it before adding another."
    )]
    WeekdayRuleConflict { existing: String },

    #[error("Holiday rule '{0}' is already cancelled")]
    AlreadyCancelled(String),

    #[error("Holiday rule of kind {kind} requires the '{field}' field")]
    MissingRuleField { kind: String, field: &'static str },
}
