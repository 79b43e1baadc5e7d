//! tally-ingest: statement spreadsheet reading, schema inference and per-file ingestion.

pub mod adapter;
pub mod classify;
pub mod columns;
pub mod frame;
pub mod header;
pub mod legacy;
pub mod options;
pub mod pipeline;
pub mod sheet;

pub use adapter::{
    AdapterError, CanonicalField, CanonicalFrame, CanonicalRow, HeaderStrategy, SchemaProfile,
    parse_bank, parse_fallback, parse_with_profile, profile_for,
};
pub use classify::{ClassifierRule, classify_bank, default_rules};
pub use columns::pick_column;
pub use frame::Frame;
pub use header::find_header_row;
pub use legacy::{ensure_modern_format, resave_as_xlsx};
pub use options::IngestOptions;
pub use pipeline::{
    FileOutcome, Ingestion, SkippedFile, clean_frame, discover_inputs, ingest_dir, ingest_paths,
    parse_file,
};
pub use sheet::{RawSheet, SheetError};
