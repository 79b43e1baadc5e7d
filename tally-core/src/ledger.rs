//! The consolidated ledger and the per-file parse log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bank::BankId;
use crate::transaction::CanonicalTransaction;

/// Which schema adapter produced a file's rows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdapterUsed {
    #[serde(rename = "bank")]
    Bank,
    #[serde(rename = "fallback")]
    Fallback,
}

impl AdapterUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterUsed::Bank => "bank",
            AdapterUsed::Fallback => "fallback",
        }
    }
}

/// One line of the parse log, per input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseLogEntry {
    pub file: String,
    /// Classified from the file name, whichever adapter parsed it
    pub bank: BankId,
    pub rows_parsed: usize,
    pub rows_dropped: usize,
    pub adapter: AdapterUsed,
    /// Why the bank-specific adapter was abandoned, if it was
    pub fallback_reason: Option<String>,
}

/// All dated transactions from every file, ordered by date.
///
/// Same-date rows keep the order in which their files were ingested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedLedger {
    transactions: Vec<CanonicalTransaction>,
}

impl ConsolidatedLedger {
    /// Concatenate per-file frames and stable-sort by date. Undated rows are discarded.
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<CanonicalTransaction>>,
    {
        let mut transactions: Vec<CanonicalTransaction> = frames
            .into_iter()
            .flatten()
            .filter(|t| t.date.is_some())
            .collect();
        transactions.sort_by_key(|t| t.date);
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[CanonicalTransaction] {
        &self.transactions
    }

    /// Iterate rows with their (always present) date
    pub fn dated(&self) -> impl Iterator<Item = (NaiveDate, &CanonicalTransaction)> {
        self.transactions
            .iter()
            .filter_map(|t| t.date.map(|d| (d, t)))
    }

    /// First and last transaction date
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.first()?.date?;
        let last = self.transactions.last()?.date?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(day: Option<u32>, desc: &str, bank: BankId) -> CanonicalTransaction {
        CanonicalTransaction {
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d)),
            description: desc.to_string(),
            reference: None,
            debit: Some(1.0),
            credit: None,
            balance: None,
            bank,
        }
    }

    #[test]
    fn test_sorted_across_frames() {
        let ledger = ConsolidatedLedger::from_frames(vec![
            vec![txn(Some(20), "b", BankId::Axis), txn(Some(3), "a", BankId::Axis)],
            vec![txn(Some(10), "c", BankId::Hdfc1)],
        ]);

        let order: Vec<_> = ledger.transactions().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(
            ledger.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
            ))
        );
    }

    #[test]
    fn test_same_date_keeps_ingest_order() {
        let ledger = ConsolidatedLedger::from_frames(vec![
            vec![txn(Some(5), "first", BankId::Icici)],
            vec![txn(Some(5), "second", BankId::Unknown)],
        ]);
        assert_eq!(ledger.transactions()[0].description, "first");
        assert_eq!(ledger.transactions()[1].description, "second");
    }

    #[test]
    fn test_undated_rows_never_enter() {
        let ledger = ConsolidatedLedger::from_frames(vec![vec![
            txn(None, "subtotal", BankId::Axis),
            txn(Some(1), "real", BankId::Axis),
        ]]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.dated().count(), 1);
    }
}
