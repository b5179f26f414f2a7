//! The per-user ledger document and its row types.
//!
//! All mutation here is in-memory; persistence is a whole-document
//! read-modify-write owned by the service layer.

mod entry;
mod installment;
mod statement;

pub use entry::{Entry, FixedExpense};
pub use installment::{InstallmentPurchase, ScheduledInstallment};
pub use statement::{RawTransaction, Statement, Transaction};

use serde::{Deserialize, Serialize};

use crate::utils::amounts_match;

/// Everything persisted for one user: monthly statements, credit entries,
/// fixed-expense markers, and registered installment purchases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpense>,
    #[serde(default)]
    pub installment_purchases: Vec<InstallmentPurchase>,
}

impl Ledger {
    pub fn statement(&self, month: u32, year: i32) -> Option<&Statement> {
        self.statements
            .iter()
            .find(|s| s.month == month && s.year == year)
    }

    pub fn statement_mut(&mut self, month: u32, year: i32) -> Option<&mut Statement> {
        self.statements
            .iter_mut()
            .find(|s| s.month == month && s.year == year)
    }

    /// Inserts a statement, replacing any existing one for the same
    /// `(month, year)` key (last write wins).
    pub fn upsert_statement(&mut self, statement: Statement) {
        match self.statement_mut(statement.month, statement.year) {
            Some(existing) => *existing = statement,
            None => self.statements.push(statement),
        }
    }

    pub fn remove_statement(&mut self, month: u32, year: i32) -> bool {
        let before = self.statements.len();
        self.statements
            .retain(|s| !(s.month == month && s.year == year));
        self.statements.len() != before
    }

    /// Removes the first transaction matching description exactly and amount
    /// within tolerance. Missing statement or transaction is a no-op.
    pub fn remove_transaction(
        &mut self,
        month: u32,
        year: i32,
        description: &str,
        amount: f64,
    ) -> bool {
        let Some(statement) = self.statement_mut(month, year) else {
            return false;
        };
        let Some(pos) = statement
            .transactions
            .iter()
            .position(|t| t.description == description && amounts_match(t.amount, amount))
        else {
            return false;
        };
        statement.transactions.remove(pos);
        true
    }

    pub fn find_transaction_mut(
        &mut self,
        month: u32,
        year: i32,
        description: &str,
        amount: f64,
    ) -> Option<&mut Transaction> {
        self.statement_mut(month, year)?
            .transactions
            .iter_mut()
            .find(|t| t.description == description && amounts_match(t.amount, amount))
    }

    /// Appends an entry unless an equal one (same month, year, description,
    /// and amount within tolerance) already exists. The dedupe keeps repeated
    /// statement re-saves from double-counting refunds.
    pub fn push_entry(&mut self, entry: Entry) -> bool {
        let duplicate = self.entries.iter().any(|e| {
            e.month == entry.month
                && e.year == entry.year
                && e.description == entry.description
                && amounts_match(e.amount, entry.amount)
        });
        if duplicate {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries_for(&self, month: u32, year: i32) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.month == month && e.year == year)
            .collect()
    }

    pub fn remove_entry(
        &mut self,
        month: u32,
        year: i32,
        amount: f64,
        description: &str,
        kind: &str,
    ) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| {
            !(e.month == month
                && e.year == year
                && amounts_match(e.amount, amount)
                && e.description == description
                && e.kind == kind)
        });
        self.entries.len() != before
    }

    pub fn add_fixed_expense(&mut self, expense: FixedExpense) {
        self.fixed_expenses.push(expense);
    }

    pub fn remove_fixed_expense(&mut self, description: &str, amount: f64) -> bool {
        let before = self.fixed_expenses.len();
        self.fixed_expenses
            .retain(|g| !(g.description == description && amounts_match(g.amount, amount)));
        self.fixed_expenses.len() != before
    }

    /// Whether a transaction matches a registered fixed expense.
    pub fn is_fixed_expense(&self, description: &str, amount: f64) -> bool {
        self.fixed_expenses
            .iter()
            .any(|g| g.description == description && amounts_match(g.amount, amount))
    }

    /// Clears the month's statement and its entries. Fixed expenses are not
    /// month-scoped and are left untouched.
    pub fn clear_month(&mut self, month: u32, year: i32) {
        self.remove_statement(month, year);
        self.entries
            .retain(|e| !(e.month == month && e.year == year));
    }

    pub fn remove_installment_purchase(
        &mut self,
        description: &str,
        total_amount: f64,
        start_date: chrono::NaiveDate,
    ) -> bool {
        let before = self.installment_purchases.len();
        self.installment_purchases.retain(|p| {
            !(p.description == description
                && amounts_match(p.total_amount, total_amount)
                && p.start_date == start_date)
        });
        self.installment_purchases.len() != before
    }
}
