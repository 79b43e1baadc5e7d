//! Pivoted sums of Amount by transaction type.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tally_core::{ConsolidatedLedger, TxnType};

/// Amount summed per transaction type
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TypeTotals {
    pub expense: f64,
    pub income: f64,
    pub other: f64,
}

impl TypeTotals {
    pub fn add(&mut self, kind: TxnType, amount: f64) {
        match kind {
            TxnType::Expense => self.expense += amount,
            TxnType::Income => self.income += amount,
            TxnType::Other => self.other += amount,
        }
    }

    pub fn get(&self, kind: TxnType) -> f64 {
        match kind {
            TxnType::Expense => self.expense,
            TxnType::Income => self.income,
            TxnType::Other => self.other,
        }
    }

    pub fn net(&self) -> f64 {
        self.expense + self.income + self.other
    }
}

/// One row of the month summary
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    /// `Dec-2023` style label
    pub month: String,
    pub totals: TypeTotals,
}

/// Totals per month, oldest month first.
pub fn month_totals(ledger: &ConsolidatedLedger) -> Vec<MonthTotals> {
    let mut by_month: BTreeMap<(i32, u32), TypeTotals> = BTreeMap::new();
    for (date, txn) in ledger.dated() {
        by_month
            .entry((date.year(), date.month()))
            .or_default()
            .add(txn.txn_type(), txn.amount());
    }

    by_month
        .into_iter()
        .filter_map(|((year, month), totals)| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(MonthTotals {
                month: first.format("%b-%Y").to_string(),
                totals,
            })
        })
        .collect()
}

/// Totals per category label. The ledger carries no categories yet, so every
/// row lands under the blank label until categories are filled in the workbook.
pub fn category_totals(ledger: &ConsolidatedLedger) -> BTreeMap<String, TypeTotals> {
    let mut out: BTreeMap<String, TypeTotals> = BTreeMap::new();
    for txn in ledger.transactions() {
        out.entry(String::new())
            .or_default()
            .add(txn.txn_type(), txn.amount());
    }
    out
}
