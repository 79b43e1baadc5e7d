//! Fixed category vocabulary for manual tagging.
//!
//! Categories are never assigned automatically; the tracker offers them as
//! dropdowns. In the extended layout every category also names a workbook range
//! holding its subcategories, looked up from the row's Category cell.

use serde::{Deserialize, Serialize};

/// Which tracker workbook to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Category column plus summary sheets
    #[default]
    Base,
    /// Category and dependent SubCategory columns, no summary sheets
    Extended,
}

pub const CATEGORY_LIST: [&str; 14] = [
    "Groceries",
    "Dining",
    "Shopping",
    "Utilities",
    "Rent/Home",
    "Transport",
    "Fees/Charges",
    "Salary",
    "Transfers",
    "Investments",
    "Insurance",
    "Interest",
    "Income-Other",
    "Expense-Other",
];

/// Characters that cannot appear in a defined name; each becomes `_`
pub const NAME_SEPARATORS: [char; 4] = [' ', '/', '-', '&'];

/// Subcategories offered under a category; empty for names outside the vocabulary.
pub fn subcategories(category: &str) -> &'static [&'static str] {
    match category {
        "Groceries" => &["Supermarket", "Fruits & Vegetables", "Milk & Dairy", "Online Grocery"],
        "Dining" => &["Restaurants", "Food Delivery", "Cafes", "Snacks"],
        "Shopping" => &["Clothing", "Electronics", "Household", "Online Shopping"],
        "Utilities" => &["Electricity", "Water", "Gas", "Mobile & Internet"],
        "Rent/Home" => &["Rent", "Maintenance", "Repairs", "Furnishing"],
        "Transport" => &["Fuel", "Cab & Auto", "Public Transport", "Parking & Tolls"],
        "Fees/Charges" => &["Bank Charges", "Card Fees", "Late Fees", "Taxes"],
        "Salary" => &["Salary", "Bonus", "Reimbursement"],
        "Transfers" => &["Self Transfer", "Family", "Friends"],
        "Investments" => &["Mutual Funds", "Stocks", "Fixed Deposit", "PPF/NPS"],
        "Insurance" => &["Health", "Life", "Vehicle"],
        "Interest" => &["Savings Interest", "FD Interest"],
        "Income-Other" => &["Refund", "Cashback", "Gifts", "Other Income"],
        "Expense-Other" => &["Medical", "Education", "Entertainment", "Miscellaneous"],
        _ => &[],
    }
}

/// Defined name holding a category's subcategory list
pub fn range_name(category: &str) -> String {
    category
        .chars()
        .map(|c| if NAME_SEPARATORS.contains(&c) { '_' } else { c })
        .collect()
}

/// Data validation source that resolves the subcategory range named after the
/// category in `category_cell`, applying the same substitutions as [`range_name`].
pub fn lookup_formula(category_cell: &str) -> String {
    let sanitized = NAME_SEPARATORS.iter().fold(category_cell.to_string(), |inner, c| {
        format!("SUBSTITUTE({inner},\"{c}\",\"_\")")
    });
    format!("=INDIRECT({sanitized})")
}
