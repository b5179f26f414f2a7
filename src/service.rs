//! The operation surface consumed by UI/glue layers.
//!
//! `FaturaService` is bound to a single user profile. Every mutating
//! operation loads the whole ledger document, mutates it in memory, and
//! writes it back atomically; operations are synchronous and run to
//! completion, so no locking is involved.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

use crate::{
    classifier::{Classification, Classifier, RuleStore, UserRule},
    config::ConfigManager,
    errors::{FaturaError, Result},
    installments::{self, InstallmentOccurrence},
    ledger::{Entry, FixedExpense, InstallmentPurchase, Ledger, RawTransaction, Statement, Transaction},
    storage::{JsonStorage, StorageBackend},
};

/// Outcome of a [`FaturaService::reclassify_all`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclassifyReport {
    /// Transactions whose category changed or that moved into Entries.
    pub updated: usize,
    /// Transactions pinned by a manual classification and left alone.
    pub preserved: usize,
}

/// A stored installment falling in a queried month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyInstallment {
    pub description: String,
    pub amount: f64,
    pub number: u32,
    pub total_installments: u32,
    pub paid: bool,
}

/// Per-month aggregate used by history views.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: u32,
    pub year: i32,
    pub total_expenses: f64,
    pub total_entries: f64,
    pub by_category: BTreeMap<String, f64>,
}

pub struct FaturaService {
    storage: Box<dyn StorageBackend>,
    config: ConfigManager,
    rules: RuleStore,
    user: String,
}

impl FaturaService {
    pub fn new(
        storage: Box<dyn StorageBackend>,
        config: ConfigManager,
        rules: RuleStore,
        user: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            config,
            rules,
            user: user.into(),
        }
    }

    /// Opens a service rooted at `base` (or the default data dir) for one
    /// user profile.
    pub fn open(base: Option<PathBuf>, user: impl Into<String>) -> Result<Self> {
        let base_dir = base.unwrap_or_else(crate::utils::app_data_dir);
        Ok(Self::new(
            Box::new(JsonStorage::new(Some(base_dir.clone()))?),
            ConfigManager::with_base_dir(base_dir.clone())?,
            RuleStore::with_base_dir(base_dir)?,
            user,
        ))
    }

    // --- classification -------------------------------------------------

    /// Classifies a description through the full cascade. Always returns a
    /// label; refunds yield the `ENTRADA` sentinel label.
    pub fn classify(&self, description: &str) -> Result<String> {
        let book = self.rules.load()?;
        let config = self.config.load()?;
        Ok(Classifier::new(&book, &config.default_category)
            .classify(description)
            .into_label())
    }

    /// Pins a category for this description so no automated pass can revert
    /// it. This is the pencil-edit path. The credit sentinel cannot be
    /// pinned; a stored sentinel would resurface as a transaction category.
    pub fn confirm_manual(&self, description: &str, category: &str) -> Result<()> {
        if category == crate::classifier::ENTRY_SENTINEL {
            return Err(FaturaError::InvalidOperation(format!(
                "cannot pin the credit sentinel `{}` as a category",
                category
            )));
        }
        let config = self.config.load()?;
        if !config.has_category(category) {
            return Err(FaturaError::UnknownCategory(category.to_string()));
        }
        let mut book = self.rules.load()?;
        book.set_manual(description, category);
        self.rules.save(&book)
    }

    /// Records a category in the automatic cache. Meant for administrative
    /// correction tools; never touches the manual map.
    pub fn confirm_automatic(&self, description: &str, category: &str) -> Result<()> {
        let mut book = self.rules.load()?;
        book.set_automatic(description, category);
        self.rules.save(&book)
    }

    pub fn add_user_rule(&self, keyword: &str, category: &str) -> Result<()> {
        let config = self.config.load()?;
        if !config.has_category(category) {
            return Err(FaturaError::UnknownCategory(category.to_string()));
        }
        let mut book = self.rules.load()?;
        book.add_rule(UserRule::new(keyword, category));
        self.rules.save(&book)
    }

    pub fn remove_user_rule(&self, keyword: &str) -> Result<bool> {
        let mut book = self.rules.load()?;
        let removed = book.remove_rule(keyword);
        if removed {
            self.rules.save(&book)?;
        }
        Ok(removed)
    }

    pub fn add_category(&self, name: &str) -> Result<bool> {
        self.config.add_category(name)
    }

    pub fn remove_category(&self, name: &str) -> Result<bool> {
        self.config.remove_category(name)
    }

    // --- statements -----------------------------------------------------

    /// Ingests a monthly statement, replacing any statement already stored
    /// for `(month, year)`. Uncategorized transactions run through the
    /// classifier; refund/credit lines are routed into Entries instead of
    /// the expense list. Pre-categorized rows must carry the sentinel or a
    /// configured label; anything else fails before any write.
    ///
    /// Classification here is read-only over the rule book; the automatic
    /// cache only grows through [`confirm_automatic`](Self::confirm_automatic),
    /// so removing a rule later still lets the lower layers win again.
    pub fn add_statement(
        &self,
        month: u32,
        year: i32,
        transactions: Vec<RawTransaction>,
    ) -> Result<()> {
        let book = self.rules.load()?;
        let config = self.config.load()?;
        let classifier = Classifier::new(&book, &config.default_category);
        let mut ledger = self.storage.load(&self.user)?;

        let mut kept = Vec::with_capacity(transactions.len());
        let mut routed = 0usize;
        for raw in transactions {
            let classification = match raw.category {
                Some(label) if label == crate::classifier::ENTRY_SENTINEL => Classification::Entry,
                Some(label) if config.has_category(&label) => Classification::Category(label),
                Some(label) => return Err(FaturaError::UnknownCategory(label)),
                None => classifier.classify(&raw.description),
            };
            match classification {
                Classification::Entry => {
                    ledger.push_entry(Entry {
                        month,
                        year,
                        amount: raw.amount,
                        description: raw.description,
                        kind: Entry::REFUND_KIND.into(),
                    });
                    routed += 1;
                }
                Classification::Category(category) => kept.push(Transaction {
                    date: raw.date,
                    description: raw.description,
                    amount: raw.amount,
                    category,
                }),
            }
        }

        info!(
            month,
            year,
            transactions = kept.len(),
            entries = routed,
            "statement saved"
        );
        ledger.upsert_statement(Statement::new(month, year, kept));
        self.storage.save(&self.user, &ledger)
    }

    /// Parses raw statement text and ingests the result for `(month, year)`.
    /// Returns how many malformed lines the parser skipped.
    pub fn import_statement_text(&self, month: u32, year: i32, text: &str) -> Result<usize> {
        let report = crate::ingest::parse_statement_text(text)?;
        let skipped = report.skipped;
        self.add_statement(month, year, report.transactions)?;
        Ok(skipped)
    }

    /// Removes the first matching transaction (exact description, amount
    /// within tolerance). Missing matches are a silent no-op.
    pub fn remove_transaction(
        &self,
        month: u32,
        year: i32,
        description: &str,
        amount: f64,
    ) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        if ledger.remove_transaction(month, year, description, amount) {
            self.storage.save(&self.user, &ledger)?;
        }
        Ok(())
    }

    /// Re-categorizes a transaction and pins the choice in the manual map so
    /// reclassification passes never revert it. Setting the credit sentinel
    /// instead moves the record into Entries.
    pub fn edit_category(
        &self,
        month: u32,
        year: i32,
        description: &str,
        amount: f64,
        new_category: &str,
    ) -> Result<()> {
        if new_category == crate::classifier::ENTRY_SENTINEL {
            let mut ledger = self.storage.load(&self.user)?;
            if ledger.remove_transaction(month, year, description, amount) {
                ledger.push_entry(Entry {
                    month,
                    year,
                    amount,
                    description: description.to_string(),
                    kind: Entry::REFUND_KIND.into(),
                });
                self.storage.save(&self.user, &ledger)?;
            }
            return Ok(());
        }

        let config = self.config.load()?;
        if !config.has_category(new_category) {
            return Err(FaturaError::UnknownCategory(new_category.to_string()));
        }

        let mut ledger = self.storage.load(&self.user)?;
        let Some(transaction) = ledger.find_transaction_mut(month, year, description, amount)
        else {
            return Ok(());
        };
        transaction.category = new_category.to_string();
        self.storage.save(&self.user, &ledger)?;
        self.confirm_manual(description, new_category)
    }

    /// Clears the month's statement and entries. Fixed expenses are not
    /// month-scoped and are deliberately left alone.
    pub fn clear_month(&self, month: u32, year: i32) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        ledger.clear_month(month, year);
        self.storage.save(&self.user, &ledger)?;
        info!(month, year, "cleared month");
        Ok(())
    }

    pub fn statement(&self, month: u32, year: i32) -> Result<Option<Statement>> {
        Ok(self.storage.load(&self.user)?.statement(month, year).cloned())
    }

    // --- entries and fixed expenses ------------------------------------

    pub fn add_entry(
        &self,
        month: u32,
        year: i32,
        amount: f64,
        description: &str,
        kind: &str,
    ) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        ledger.push_entry(Entry {
            month,
            year,
            amount,
            description: description.to_string(),
            kind: kind.to_string(),
        });
        self.storage.save(&self.user, &ledger)
    }

    pub fn remove_entry(
        &self,
        month: u32,
        year: i32,
        amount: f64,
        description: &str,
        kind: &str,
    ) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        if ledger.remove_entry(month, year, amount, description, kind) {
            self.storage.save(&self.user, &ledger)?;
        }
        Ok(())
    }

    pub fn entries(&self, month: u32, year: i32) -> Result<Vec<Entry>> {
        Ok(self
            .storage
            .load(&self.user)?
            .entries_for(month, year)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn add_fixed_expense(&self, description: &str, amount: f64, category: &str) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        ledger.add_fixed_expense(FixedExpense::new(description, amount, category));
        self.storage.save(&self.user, &ledger)
    }

    pub fn remove_fixed_expense(&self, description: &str, amount: f64) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        if ledger.remove_fixed_expense(description, amount) {
            self.storage.save(&self.user, &ledger)?;
        }
        Ok(())
    }

    pub fn fixed_expenses(&self) -> Result<Vec<FixedExpense>> {
        Ok(self.storage.load(&self.user)?.fixed_expenses)
    }

    pub fn is_fixed_expense(&self, description: &str, amount: f64) -> Result<bool> {
        Ok(self
            .storage
            .load(&self.user)?
            .is_fixed_expense(description, amount))
    }

    // --- installments ---------------------------------------------------

    pub fn add_installment_purchase(
        &self,
        description: &str,
        total_amount: f64,
        num_installments: u32,
        start_date: NaiveDate,
    ) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        ledger.installment_purchases.push(InstallmentPurchase::new(
            description,
            total_amount,
            num_installments,
            start_date,
        ));
        self.storage.save(&self.user, &ledger)
    }

    pub fn remove_installment_purchase(
        &self,
        description: &str,
        total_amount: f64,
        start_date: NaiveDate,
    ) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        if ledger.remove_installment_purchase(description, total_amount, start_date) {
            self.storage.save(&self.user, &ledger)?;
        }
        Ok(())
    }

    pub fn mark_installment_paid(&self, description: &str, number: u32) -> Result<()> {
        let mut ledger = self.storage.load(&self.user)?;
        let changed = ledger
            .installment_purchases
            .iter_mut()
            .filter(|p| p.description == description)
            .any(|p| p.mark_paid(number));
        if changed {
            self.storage.save(&self.user, &ledger)?;
        }
        Ok(())
    }

    /// Stored installments whose scheduled date falls in the given month.
    pub fn installments_for_month(&self, month: u32, year: i32) -> Result<Vec<MonthlyInstallment>> {
        let ledger = self.storage.load(&self.user)?;
        let mut out = Vec::new();
        for purchase in &ledger.installment_purchases {
            for installment in &purchase.installments {
                if installment.date.year() == year && installment.date.month() == month {
                    out.push(MonthlyInstallment {
                        description: purchase.description.clone(),
                        amount: installment.amount,
                        number: installment.number,
                        total_installments: purchase.num_installments,
                        paid: installment.paid,
                    });
                }
            }
        }
        Ok(out)
    }

    /// Future installments inferred from statement descriptions, bucketed by
    /// `(year, month)`. Recomputed from raw history on every call.
    pub fn future_installments(
        &self,
        as_of_month: u32,
        as_of_year: i32,
    ) -> Result<BTreeMap<(i32, u32), Vec<InstallmentOccurrence>>> {
        let ledger = self.storage.load(&self.user)?;
        Ok(installments::project_future(
            &ledger.statements,
            as_of_month,
            as_of_year,
        ))
    }

    // --- batch reclassification ----------------------------------------

    /// Re-runs automatic classification over every stored transaction.
    ///
    /// Manually pinned descriptions are skipped (and self-healed to the
    /// manual category if the stored field drifted); refund lines move into
    /// Entries. Safe to run repeatedly: a second pass on a converged store
    /// reports zero updates.
    pub fn reclassify_all(&self) -> Result<ReclassifyReport> {
        let book = self.rules.load()?;
        let config = self.config.load()?;
        let classifier = Classifier::new(&book, &config.default_category);
        let mut ledger = self.storage.load(&self.user)?;

        let mut updated = 0usize;
        let mut preserved = 0usize;
        let mut moved: Vec<Entry> = Vec::new();

        for statement in &mut ledger.statements {
            let mut kept = Vec::with_capacity(statement.transactions.len());
            for mut transaction in statement.transactions.drain(..) {
                let normalized = crate::utils::normalize_description(&transaction.description);
                if let Some(manual) = book.manual_category(&normalized) {
                    // A hand-edited manual file may carry the sentinel;
                    // route those rows to Entries instead of storing it.
                    if manual == crate::classifier::ENTRY_SENTINEL {
                        moved.push(Entry {
                            month: statement.month,
                            year: statement.year,
                            amount: transaction.amount,
                            description: transaction.description,
                            kind: Entry::REFUND_KIND.into(),
                        });
                        updated += 1;
                        continue;
                    }
                    // The manual map is the source of truth; the stored
                    // field is just a cache of it.
                    if transaction.category != manual {
                        transaction.category = manual.to_string();
                    }
                    preserved += 1;
                    kept.push(transaction);
                    continue;
                }
                match classifier.classify_unpinned(&transaction.description) {
                    Classification::Entry => {
                        moved.push(Entry {
                            month: statement.month,
                            year: statement.year,
                            amount: transaction.amount,
                            description: transaction.description,
                            kind: Entry::REFUND_KIND.into(),
                        });
                        updated += 1;
                    }
                    Classification::Category(category) => {
                        if transaction.category != category {
                            transaction.category = category;
                            updated += 1;
                        }
                        kept.push(transaction);
                    }
                }
            }
            statement.transactions = kept;
        }

        for entry in moved {
            ledger.push_entry(entry);
        }

        self.storage.save(&self.user, &ledger)?;
        info!(updated, preserved, "reclassification finished");
        Ok(ReclassifyReport { updated, preserved })
    }

    // --- history --------------------------------------------------------

    /// Monthly totals ordered by `(year, month)`.
    pub fn monthly_summary(&self) -> Result<Vec<MonthSummary>> {
        let ledger = self.storage.load(&self.user)?;
        let mut summaries: Vec<MonthSummary> = ledger
            .statements
            .iter()
            .map(|statement| {
                let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
                for transaction in &statement.transactions {
                    *by_category.entry(transaction.category.clone()).or_default() +=
                        transaction.amount;
                }
                MonthSummary {
                    month: statement.month,
                    year: statement.year,
                    total_expenses: statement.total(),
                    total_entries: ledger
                        .entries_for(statement.month, statement.year)
                        .iter()
                        .map(|e| e.amount)
                        .sum(),
                    by_category,
                }
            })
            .collect();
        summaries.sort_by_key(|s| (s.year, s.month));
        Ok(summaries)
    }
}
