#![doc(test(attr(deny(warnings))))]

//! Fatura Core ingests credit-card statements, classifies transactions into
//! spending categories, and maintains a per-user monthly ledger with refund
//! entries, fixed expenses, and installment tracking.

pub mod classifier;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod installments;
pub mod ledger;
pub mod service;
pub mod storage;
pub mod utils;

pub use classifier::{Classification, Classifier, RuleBook, RuleStore, UserRule, ENTRY_SENTINEL};
pub use config::{Config, ConfigManager};
pub use errors::{FaturaError, Result};
pub use ledger::{
    Entry, FixedExpense, InstallmentPurchase, Ledger, RawTransaction, Statement, Transaction,
};
pub use service::{FaturaService, ReclassifyReport};
pub use storage::{JsonStorage, StorageBackend};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fatura Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
