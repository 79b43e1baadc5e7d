//! Bank identifiers assigned to statement files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which bank produced a statement file. Assigned once per file from its name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BankId {
    #[serde(rename = "ICICI")]
    Icici,
    #[serde(rename = "AXIS")]
    Axis,
    #[serde(rename = "HDFC1")]
    Hdfc1,
    #[serde(rename = "HDFC2")]
    Hdfc2,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl BankId {
    /// Label written to the ledger and the parse log
    pub fn as_str(&self) -> &'static str {
        match self {
            BankId::Icici => "ICICI",
            BankId::Axis => "AXIS",
            BankId::Hdfc1 => "HDFC1",
            BankId::Hdfc2 => "HDFC2",
            BankId::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_statement_labels() {
        let json = serde_json::to_string(&BankId::Hdfc1).unwrap();
        assert_eq!(json, "\"HDFC1\"");

        let bank: BankId = serde_json::from_str("\"AXIS\"").unwrap();
        assert_eq!(bank, BankId::Axis);
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(BankId::Unknown.to_string(), "UNKNOWN");
        assert_eq!(format!("{}", BankId::Icici), BankId::Icici.as_str());
    }
}
