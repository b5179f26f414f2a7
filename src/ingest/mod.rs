//! Parses pre-extracted statement text into raw transactions.
//!
//! PDF byte decoding happens upstream; this module receives the page text
//! and pulls out lines shaped `DD MON <description> R$ 1.234,56`. Summary
//! lines (IOF, totals, the previous payment) are discarded, as are masked
//! card numbers embedded in descriptions. Malformed lines are skipped and
//! counted, never fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::errors::{FaturaError, Result};
use crate::ledger::RawTransaction;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2} [A-Z]{3}").expect("date pattern"));
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"R\$ \d+(?:\.\d{3})*,\d{2}").expect("amount pattern"));
static CARD_MASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"•{4} \d{4}").expect("card mask pattern"));

/// Statement lines that describe taxes, totals, or the prior payment rather
/// than purchases.
const SUMMARY_TERMS: &[&str] = &["iof de", "total de", "pagamento em"];

/// Outcome of a statement parse: the extracted transactions plus how many
/// candidate lines were skipped as malformed.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub transactions: Vec<RawTransaction>,
    pub skipped: usize,
}

/// Parses one statement's text. Errors only when no transaction at all could
/// be extracted, which callers surface as a recoverable user error.
pub fn parse_statement_text(text: &str) -> Result<ParseReport> {
    let mut report = ParseReport::default();

    for line in text.lines() {
        let Some(date) = DATE_RE.find(line) else {
            continue;
        };
        let lowered = line.to_lowercase();
        if SUMMARY_TERMS.iter().any(|term| lowered.contains(term)) {
            continue;
        }

        let Some(amount_raw) = AMOUNT_RE.find(line) else {
            report.skipped += 1;
            warn!(line, "statement line without a parseable amount");
            continue;
        };
        let amount = parse_brl_amount(amount_raw.as_str());

        let mut description = line.to_string();
        description.replace_range(amount_raw.range(), "");
        description.replace_range(date.range(), "");
        let description = CARD_MASK_RE.replace_all(&description, "");
        let description = description.trim();
        if description.is_empty() {
            report.skipped += 1;
            continue;
        }

        report.transactions.push(RawTransaction::new(
            date.as_str(),
            description,
            amount,
        ));
    }

    if report.transactions.is_empty() {
        return Err(FaturaError::NoTransactions);
    }
    Ok(report)
}

/// `R$ 1.234,56` → 1234.56
fn parse_brl_amount(raw: &str) -> f64 {
    raw.trim_start_matches("R$ ")
        .replace('.', "")
        .replace(',', ".")
        .parse()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dated_lines_with_amounts() {
        let text = "12 MAR Uber Trip R$ 25,00\n13 MAR iFood Order R$ 1.040,50\n";
        let report = parse_statement_text(text).unwrap();
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.transactions[0].date, "12 MAR");
        assert_eq!(report.transactions[0].description, "Uber Trip");
        assert_eq!(report.transactions[0].amount, 25.0);
        assert_eq!(report.transactions[1].amount, 1040.5);
    }

    #[test]
    fn skips_summary_and_malformed_lines() {
        let text = concat!(
            "12 MAR Uber Trip R$ 25,00\n",
            "13 MAR IOF de compra internacional R$ 3,10\n",
            "14 MAR Pagamento em 10 ABR R$ 900,00\n",
            "15 MAR Linha sem valor\n",
        );
        let report = parse_statement_text(text).unwrap();
        assert_eq!(report.transactions.len(), 1);
        // summary lines are discarded silently; only the amount-less line counts
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn strips_masked_card_numbers() {
        let text = "12 MAR Compra •••• 1234 Padaria Oceanos R$ 18,90\n";
        let report = parse_statement_text(text).unwrap();
        assert_eq!(report.transactions[0].description, "Compra  Padaria Oceanos");
    }

    #[test]
    fn no_transactions_is_an_error() {
        let err = parse_statement_text("fatura sem linhas\n").unwrap_err();
        assert!(matches!(err, FaturaError::NoTransactions));
    }
}
