use thiserror::Error;

/// Error type covering statement ingestion and persistence failures.
///
/// Lookup misses (removing or editing a transaction that does not exist) are
/// deliberately not errors; those operations are silent no-ops.
#[derive(Debug, Error)]
pub enum FaturaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no transactions found in statement text")]
    NoTransactions,
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, FaturaError>;
