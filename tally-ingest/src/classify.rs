//! Bank classification from file names.
//!
//! The file name is the only signal. Rules are checked in order and the first
//! rule with a matching pattern wins. The built-in patterns are one deployment's
//! file naming; override them with `[[banks]]` entries in `tally.toml`.

use serde::{Deserialize, Serialize};
use tally_core::BankId;

/// Substring patterns that identify one bank's files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub bank: BankId,
    pub patterns: Vec<String>,
}

impl ClassifierRule {
    pub fn new(bank: BankId, patterns: &[&str]) -> Self {
        Self {
            bank,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn matches(&self, lower_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| !p.is_empty() && lower_name.contains(&p.to_lowercase()))
    }
}

pub fn default_rules() -> Vec<ClassifierRule> {
    vec![
        ClassifierRule::new(BankId::Icici, &["optransactionhistory", "icici"]),
        ClassifierRule::new(BankId::Axis, &["918010053388907", "axis"]),
        ClassifierRule::new(BankId::Hdfc1, &["3895"]),
        ClassifierRule::new(BankId::Hdfc2, &["7671"]),
    ]
}

/// Case-insensitive substring classification; UNKNOWN when no rule matches.
pub fn classify_bank(file_name: &str, rules: &[ClassifierRule]) -> BankId {
    let name = file_name.to_lowercase();
    rules
        .iter()
        .find(|r| r.matches(&name))
        .map(|r| r.bank)
        .unwrap_or(BankId::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> BankId {
        classify_bank(name, &default_rules())
    }

    #[test]
    fn test_default_rules() {
        assert_eq!(classify("OpTransactionHistory12-01-2024.xls"), BankId::Icici);
        assert_eq!(classify("icici_jan.xlsx"), BankId::Icici);
        assert_eq!(classify("918010053388907_stmt.xlsx"), BankId::Axis);
        assert_eq!(classify("AXIS-Statement.xlsx"), BankId::Axis);
        assert_eq!(classify("Acct_XXXX3895.xls"), BankId::Hdfc1);
        assert_eq!(classify("Acct_XXXX7671.xls"), BankId::Hdfc2);
        assert_eq!(classify("statement.xlsx"), BankId::Unknown);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // contains both an ICICI and an HDFC token; ICICI is listed first
        assert_eq!(classify("icici_3895.xlsx"), BankId::Icici);
        assert_eq!(classify("axis_7671.xlsx"), BankId::Axis);
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let rules = vec![ClassifierRule::new(BankId::Hdfc2, &["Savings-0042"])];
        assert_eq!(classify_bank("savings-0042-march.xlsx", &rules), BankId::Hdfc2);
        assert_eq!(classify_bank("icici.xlsx", &rules), BankId::Unknown);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let rules = vec![ClassifierRule::new(BankId::Axis, &[""])];
        assert_eq!(classify_bank("anything.xlsx", &rules), BankId::Unknown);
    }
}
