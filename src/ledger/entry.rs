use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A credit, refund, or income record. Stored apart from statements so these
/// amounts never pollute expense aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub month: u32,
    pub year: i32,
    pub amount: f64,
    pub description: String,
    /// Free-form origin label ("Salário", "Freelance", ...). Refunds routed
    /// out of statements carry [`Entry::REFUND_KIND`].
    #[serde(default = "Entry::default_kind")]
    pub kind: String,
}

impl Entry {
    pub const REFUND_KIND: &'static str = "Estorno";

    pub fn default_kind() -> String {
        "Outros".to_string()
    }
}

/// A recurring-expense marker. Not month-scoped; transactions are flagged as
/// fixed by matching description plus amount (0.01 tolerance) against this
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

impl FixedExpense {
    pub fn new(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            added_at: Utc::now(),
        }
    }
}
