use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_finance::Layout;
use tally_ingest::IngestOptions;

/// Looked up in the input directory when `--config` is not given
pub const CONFIG_FILE: &str = "tally.toml";

pub const DEFAULT_OUTPUT: &str = "Personal_Expense_Tracker.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workbook file name, relative to the input directory
    pub output: String,
    pub layout: Layout,
    #[serde(flatten)]
    pub ingest: IngestOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            layout: Layout::default(),
            ingest: IngestOptions::default(),
        }
    }
}

impl Config {
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.output)
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse tally.toml")
}

/// Read `explicit` if given (it must exist), otherwise `dir/tally.toml` when
/// present, otherwise the built-in defaults.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) if !p.exists() => bail!("config not found: {}", p.display()),
        Some(p) => p.to_path_buf(),
        None => dir.join(CONFIG_FILE),
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}
