//! Canonical transaction rows shared by every statement layout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bank::BankId;

/// One statement row after column mapping and value coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub reference: Option<String>,
    /// Money out. Expected nonnegative, not enforced.
    pub debit: Option<f64>,
    /// Money in. Expected nonnegative, not enforced.
    pub credit: Option<f64>,
    pub balance: Option<f64>,
    pub bank: BankId,
}

/// Direction of a transaction as shown in the tracker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxnType {
    Expense,
    Income,
    Other,
}

impl TxnType {
    pub const ALL: [TxnType; 3] = [TxnType::Expense, TxnType::Income, TxnType::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Expense => "Expense",
            TxnType::Income => "Income",
            TxnType::Other => "Other",
        }
    }
}

impl CanonicalTransaction {
    /// Expense if anything was debited, else Income if anything was credited.
    pub fn txn_type(&self) -> TxnType {
        if self.debit.unwrap_or(0.0) > 0.0 {
            TxnType::Expense
        } else if self.credit.unwrap_or(0.0) > 0.0 {
            TxnType::Income
        } else {
            TxnType::Other
        }
    }

    /// Signed net: credit minus debit, absent values counting as zero
    pub fn amount(&self) -> f64 {
        self.credit.unwrap_or(0.0) - self.debit.unwrap_or(0.0)
    }

    /// Month bucket such as `Dec-2023`
    pub fn month_label(&self) -> Option<String> {
        self.date.map(|d| d.format("%b-%Y").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(debit: Option<f64>, credit: Option<f64>) -> CanonicalTransaction {
        CanonicalTransaction {
            date: NaiveDate::from_ymd_opt(2023, 12, 31),
            description: "UPI/SWIGGY".to_string(),
            reference: None,
            debit,
            credit,
            balance: Some(1000.0),
            bank: BankId::Axis,
        }
    }

    #[test]
    fn test_type_derivation() {
        assert_eq!(txn(Some(250.0), None).txn_type(), TxnType::Expense);
        assert_eq!(txn(None, Some(50_000.0)).txn_type(), TxnType::Income);
        assert_eq!(txn(Some(0.0), Some(0.0)).txn_type(), TxnType::Other);
        assert_eq!(txn(None, None).txn_type(), TxnType::Other);
        // debit wins when both are set
        assert_eq!(txn(Some(10.0), Some(5.0)).txn_type(), TxnType::Expense);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(txn(Some(250.0), None).amount(), -250.0);
        assert_eq!(txn(None, Some(75.5)).amount(), 75.5);
        assert_eq!(txn(Some(10.0), Some(5.0)).amount(), -5.0);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(txn(None, None).month_label().as_deref(), Some("Dec-2023"));
        let mut undated = txn(None, None);
        undated.date = None;
        assert_eq!(undated.month_label(), None);
    }
}
