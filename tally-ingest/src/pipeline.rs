//! Per-file ingestion and directory-level orchestration.
//!
//! Failure is contained at two levels: a bank adapter error falls back to the
//! generic adapter, and a file that cannot be read at all is skipped. Neither
//! stops the run.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::{
    AdapterUsed, BankId, CanonicalTransaction, ConsolidatedLedger, ParseLogEntry, coerce_amount,
    coerce_date,
};
use tracing::{debug, info, warn};

use crate::adapter::{CanonicalField, CanonicalFrame, parse_bank, parse_fallback};
use crate::classify::classify_bank;
use crate::legacy::{ensure_modern_format, is_legacy, modern_path};
use crate::options::IngestOptions;
use crate::sheet::RawSheet;

/// Lock and temp file prefixes written by spreadsheet applications
const LOCK_PREFIXES: &[&str] = &["~$", ".~lock."];

/// Cleaned rows of one file and its log line
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub transactions: Vec<CanonicalTransaction>,
    pub log: ParseLogEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Result of a run that produced at least one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Ingestion {
    pub ledger: ConsolidatedLedger,
    pub log: Vec<ParseLogEntry>,
    pub skipped: Vec<SkippedFile>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Statement files in `dir`, sorted by name.
///
/// Skips the output artifact, lock files, and any `.xls` whose `.xlsx` sibling
/// already exists from an earlier conversion.
pub fn discover_inputs(dir: &Path, opts: &IngestOptions, output_name: &str) -> Result<Vec<PathBuf>> {
    let output_file = Path::new(output_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_name.to_string());
    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("listing {}", dir.display()))?.path();
        if !path.is_file() {
            continue;
        }
        let name = file_name(&path);
        if name == output_file || LOCK_PREFIXES.iter().any(|p| name.starts_with(p)) {
            continue;
        }
        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| opts.accepts_extension(e));
        if !accepted {
            continue;
        }
        if is_legacy(&path) && modern_path(&path).exists() {
            info!("Skipping {}: already converted", name);
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Coerce an adapter frame into typed rows stamped with `bank`; returns the
/// dated rows and how many rows were dropped for lacking a date.
pub fn clean_frame(frame: CanonicalFrame, bank: BankId) -> (Vec<CanonicalTransaction>, usize) {
    let before = frame.len();
    let transactions: Vec<CanonicalTransaction> = frame
        .rows
        .into_iter()
        .map(|row| CanonicalTransaction {
            date: coerce_date(&row.date),
            description: row.description.non_blank_text().unwrap_or_default(),
            reference: row.reference.non_blank_text(),
            debit: coerce_amount(&row.debit),
            credit: coerce_amount(&row.credit),
            balance: coerce_amount(&row.balance),
            bank,
        })
        .filter(|t| t.date.is_some())
        .collect();
    let dropped = before - transactions.len();
    (transactions, dropped)
}

/// Ingest one statement file.
///
/// Errors only when the file cannot be converted or read; adapter failures are
/// absorbed by the fallback adapter and noted in the log entry.
pub fn parse_file(path: &Path, opts: &IngestOptions) -> Result<FileOutcome> {
    let path = ensure_modern_format(path)
        .with_context(|| format!("converting {}", path.display()))?;
    let name = file_name(&path);
    let bank = classify_bank(&name, &opts.banks);
    info!("Parsing {} as {}...", name, bank);

    let sheet = RawSheet::open(&path).with_context(|| format!("reading {}", path.display()))?;

    let (frame, adapter, fallback_reason) = match parse_bank(&sheet, bank, opts.header_search_rows) {
        Ok(frame) if bank == BankId::Unknown => (frame, AdapterUsed::Fallback, None),
        Ok(frame) => (frame, AdapterUsed::Bank, None),
        Err(e) => {
            warn!("Schema parser failed for {}: {}", bank, e);
            (parse_fallback(&sheet), AdapterUsed::Fallback, Some(e.to_string()))
        }
    };

    debug!(
        "{}: date from {:?}, description from {:?}",
        name,
        frame.source_column(CanonicalField::Date),
        frame.source_column(CanonicalField::Description)
    );
    let (transactions, rows_dropped) = clean_frame(frame, bank);
    info!(
        "{}: {} rows parsed, {} dropped",
        name,
        transactions.len(),
        rows_dropped
    );

    let log = ParseLogEntry {
        file: name,
        bank,
        rows_parsed: transactions.len(),
        rows_dropped,
        adapter,
        fallback_reason,
    };
    Ok(FileOutcome { transactions, log })
}

/// Ingest the given files in order. None when no file could be parsed at all.
pub fn ingest_paths(paths: &[PathBuf], opts: &IngestOptions) -> Option<Ingestion> {
    let mut frames = Vec::new();
    let mut log = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        match parse_file(path, opts) {
            Ok(outcome) => {
                frames.push(outcome.transactions);
                log.push(outcome.log);
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                skipped.push(SkippedFile {
                    file: file_name(path),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    if frames.is_empty() {
        return None;
    }

    Some(Ingestion {
        ledger: ConsolidatedLedger::from_frames(frames),
        log,
        skipped,
    })
}

/// Discover and ingest every statement in `dir`.
pub fn ingest_dir(dir: &Path, opts: &IngestOptions, output_name: &str) -> Result<Option<Ingestion>> {
    let paths = discover_inputs(dir, opts, output_name)?;
    info!("Found {} statement file(s) in {}", paths.len(), dir.display());
    Ok(ingest_paths(&paths, opts))
}
