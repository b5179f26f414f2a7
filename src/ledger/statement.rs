use serde::{Deserialize, Serialize};

/// A transaction as supplied by the statement-extraction layer, before
/// classification. `category` is set only when the caller already knows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RawTransaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            category: None,
        }
    }
}

/// A categorized expense line. Date, description, and amount are immutable
/// once parsed; only the category may change (via explicit edit or
/// reclassification).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Day plus month abbreviation as printed on the statement, e.g. "12 MAR".
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// One monthly statement. Unique per `(month, year)`; re-uploading a
/// statement for the same key replaces it entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Statement {
    pub fn new(month: u32, year: i32, transactions: Vec<Transaction>) -> Self {
        Self {
            month,
            year,
            transactions,
        }
    }

    pub fn total(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}
