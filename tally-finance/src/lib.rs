//! tally-finance: category vocabulary, ledger summaries and the expense tracker workbook

pub mod summary;
pub mod vocabulary;
pub mod workbook;

pub use summary::{MonthTotals, TypeTotals, category_totals, month_totals};
pub use vocabulary::{CATEGORY_LIST, Layout, lookup_formula, range_name, subcategories};
pub use workbook::{RenderError, TxnColumn, column_letter, render_workbook, transaction_columns};
