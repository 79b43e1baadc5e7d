//! tally-core: ledger data model and tolerant value coercion for bank statements

pub mod bank;
pub mod cell;
pub mod coerce;
pub mod ledger;
pub mod transaction;

pub use bank::BankId;
pub use cell::Cell;
pub use coerce::{coerce_amount, coerce_amount_text, coerce_date, coerce_date_text};
pub use ledger::{AdapterUsed, ConsolidatedLedger, ParseLogEntry};
pub use transaction::{CanonicalTransaction, TxnType};
