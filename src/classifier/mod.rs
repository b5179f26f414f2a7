//! Deterministic transaction classification.
//!
//! `classify` is pure and total: it always returns a label for any input,
//! falling back to the configured default category. The layers run in a
//! fixed priority order and the first hit short-circuits:
//!
//! 1. manual overrides (explicit user edits, never reverted automatically)
//! 2. user-defined keyword rules, in insertion order
//! 3. refund/credit keywords, which yield the `ENTRADA` sentinel
//! 4. hardcoded special cases for high-volume merchants the generic
//!    dictionary would misread
//! 5. the automatic classification cache
//! 6. the keyword dictionary, categories scanned in declared order
//! 7. the default category

pub mod dictionary;
pub mod rules;

pub use rules::{RuleBook, RuleStore, UserRule};

use crate::utils::normalize_description;

/// Sentinel category marking a credit/refund line. Never stored on a
/// transaction: the ledger intercepts it and routes the record into Entries.
pub const ENTRY_SENTINEL: &str = "ENTRADA";

const REFUND_KEYWORDS: &[&str] = &["estorno", "desconto", "cashback", "reembolso"];

/// Result of running the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Category(String),
    /// The description names a refund or credit; the record belongs in the
    /// Entries store, not in the expense ledger.
    Entry,
}

impl Classification {
    pub fn into_label(self) -> String {
        match self {
            Classification::Category(label) => label,
            Classification::Entry => ENTRY_SENTINEL.to_string(),
        }
    }
}

/// Classifier over a rule book and a configured default category.
pub struct Classifier<'a> {
    book: &'a RuleBook,
    default_category: &'a str,
}

impl<'a> Classifier<'a> {
    pub fn new(book: &'a RuleBook, default_category: &'a str) -> Self {
        Self {
            book,
            default_category,
        }
    }

    /// Runs the full cascade, manual overrides included.
    pub fn classify(&self, description: &str) -> Classification {
        let normalized = normalize_description(description);

        if let Some(category) = self.book.manual_category(&normalized) {
            // A hand-edited manual file may carry the sentinel; it must
            // still route to Entries, never stand as a category.
            if category == ENTRY_SENTINEL {
                return Classification::Entry;
            }
            return Classification::Category(category.to_string());
        }
        self.classify_automatic(&normalized)
    }

    /// Runs only the automatic layers (everything below the manual map).
    /// Reclassification uses this after deciding the manual map does not
    /// claim the description.
    pub fn classify_unpinned(&self, description: &str) -> Classification {
        self.classify_automatic(&normalize_description(description))
    }

    fn classify_automatic(&self, normalized: &str) -> Classification {
        if let Some(category) = self.book.match_rule(normalized) {
            return Classification::Category(category.to_string());
        }

        if is_refund(normalized) {
            return Classification::Entry;
        }

        if let Some(category) = special_case(normalized) {
            return Classification::Category(category.to_string());
        }

        if let Some(category) = self.book.cached_category(normalized) {
            return Classification::Category(category.to_string());
        }

        if let Some(category) = dictionary::lookup(normalized) {
            return Classification::Category(category.to_string());
        }

        Classification::Category(self.default_category.to_string())
    }
}

/// Credit/refund detection over a normalized description.
pub fn is_refund(normalized: &str) -> bool {
    REFUND_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

/// Highest-confidence merchant rules that must beat the generic dictionary.
/// The 99 ride-hailing token would otherwise fall through to whatever
/// category matches its surrounding text, and zig* point-of-sale entries
/// carry venue names that look like food merchants.
fn special_case(normalized: &str) -> Option<&'static str> {
    if normalized.contains("99app")
        || normalized.contains("99 app")
        || (normalized.contains("99") && normalized.contains("app"))
    {
        return Some(dictionary::TRANSPORTE);
    }
    if normalized.contains("mercado livre") || normalized.contains("mercadolivre") {
        return Some(dictionary::ROUPAS);
    }
    if normalized.starts_with("zig") {
        return Some(dictionary::ENTRETENIMENTO);
    }
    None
}
