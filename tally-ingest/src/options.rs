//! Ingestion settings, deserialized from the `tally.toml` top level.

use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierRule, default_rules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// How many leading rows the header locator scans
    pub header_search_rows: usize,
    /// Accepted input extensions, lower-case, without the dot
    pub extensions: Vec<String>,
    /// File-name classification rules, in priority order
    pub banks: Vec<ClassifierRule>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_search_rows: 80,
            extensions: vec!["xls".to_string(), "xlsx".to_string()],
            banks: default_rules(),
        }
    }
}

impl IngestOptions {
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
