//! User rules, manual overrides, and the automatic classification cache.
//!
//! The manual map and the automatic cache are kept as two distinct stores
//! with a strict read priority (manual first) and a strict write target per
//! call site. Several historical bugs came from conflating the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::{
    errors::Result,
    utils::{ensure_dir, normalize_description, write_atomic},
};

const RULES_FILE: &str = "classification_rules.json";
const MANUAL_FILE: &str = "manual_classifications.json";
const AUTO_FILE: &str = "auto_classifications.json";

/// A user-defined keyword rule. Keywords are stored lowercased; matching is
/// substring containment against the normalized description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRule {
    pub keyword: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl UserRule {
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.trim().to_lowercase(),
            category: category.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory classification state: user rules in insertion order plus the
/// two description-keyed maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub rules: Vec<UserRule>,
    #[serde(default)]
    pub manual: BTreeMap<String, String>,
    #[serde(default)]
    pub auto_cache: BTreeMap<String, String>,
}

impl RuleBook {
    /// First user rule whose keyword appears in the normalized description.
    pub fn match_rule(&self, normalized: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| normalized.contains(rule.keyword.as_str()))
            .map(|rule| rule.category.as_str())
    }

    pub fn manual_category(&self, normalized: &str) -> Option<&str> {
        self.manual.get(normalized).map(String::as_str)
    }

    pub fn cached_category(&self, normalized: &str) -> Option<&str> {
        self.auto_cache.get(normalized).map(String::as_str)
    }

    /// Adds a rule, replacing any existing rule for the same keyword
    /// (last rule wins).
    pub fn add_rule(&mut self, rule: UserRule) {
        self.rules.retain(|r| r.keyword != rule.keyword);
        self.rules.push(rule);
    }

    pub fn remove_rule(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        let before = self.rules.len();
        self.rules.retain(|r| r.keyword != keyword);
        self.rules.len() != before
    }

    /// Pins a category for this description. Written only from explicit user
    /// edits; never touched by bulk ingestion or reclassification.
    pub fn set_manual(&mut self, description: &str, category: &str) {
        self.manual
            .insert(normalize_description(description), category.to_string());
    }

    /// Caches an automatically computed category for this description.
    pub fn set_automatic(&mut self, description: &str, category: &str) {
        self.auto_cache
            .insert(normalize_description(description), category.to_string());
    }
}

/// JSON persistence for the rule book, one file per store so an
/// administrative fix to the cache can never clobber manual overrides.
pub struct RuleStore {
    rules_path: PathBuf,
    manual_path: PathBuf,
    auto_path: PathBuf,
}

impl RuleStore {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            rules_path: base.join(RULES_FILE),
            manual_path: base.join(MANUAL_FILE),
            auto_path: base.join(AUTO_FILE),
        })
    }

    pub fn load(&self) -> Result<RuleBook> {
        Ok(RuleBook {
            rules: read_or_default(&self.rules_path)?,
            manual: read_or_default(&self.manual_path)?,
            auto_cache: read_or_default(&self.auto_path)?,
        })
    }

    pub fn save(&self, book: &RuleBook) -> Result<()> {
        write_atomic(&self.rules_path, &serde_json::to_string_pretty(&book.rules)?)?;
        write_atomic(
            &self.manual_path,
            &serde_json::to_string_pretty(&book.manual)?,
        )?;
        write_atomic(
            &self.auto_path,
            &serde_json::to_string_pretty(&book.auto_cache)?,
        )?;
        Ok(())
    }
}

fn read_or_default<T: serde::de::DeserializeOwned + Default>(path: &PathBuf) -> Result<T> {
    if path.exists() {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn duplicate_keyword_last_rule_wins() {
        let mut book = RuleBook::default();
        book.add_rule(UserRule::new("padoca", "Alimentação"));
        book.add_rule(UserRule::new("padoca", "Outros"));
        assert_eq!(book.match_rule("padoca do ze"), Some("Outros"));
        assert_eq!(book.rules.len(), 1);
    }

    #[test]
    fn rule_matching_is_insertion_ordered() {
        let mut book = RuleBook::default();
        book.add_rule(UserRule::new("clube", "Entretenimento"));
        book.add_rule(UserRule::new("clube do livro", "Outros"));
        // both keywords match; the earlier rule wins
        assert_eq!(book.match_rule("clube do livro sp"), Some("Entretenimento"));
    }

    #[test]
    fn manual_and_automatic_are_separate_stores() {
        let mut book = RuleBook::default();
        book.set_automatic("Padaria Oceanos", "Alimentação");
        book.set_manual("Padaria Oceanos", "Self Care");
        assert_eq!(book.cached_category("padaria oceanos"), Some("Alimentação"));
        assert_eq!(book.manual_category("padaria oceanos"), Some("Self Care"));
    }

    #[test]
    fn store_round_trips_all_three_files() {
        let dir = tempdir().unwrap();
        let store = RuleStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut book = store.load().unwrap();
        book.add_rule(UserRule::new("Sushi", "Alimentação"));
        book.set_manual("estorno clube", "Entretenimento");
        book.set_automatic("posto br", "Transporte");
        store.save(&book).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.rules[0].keyword, "sushi");
        assert_eq!(
            reloaded.manual_category("estorno clube"),
            Some("Entretenimento")
        );
        assert_eq!(reloaded.cached_category("posto br"), Some("Transporte"));
    }
}
