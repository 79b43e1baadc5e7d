//! Bank-specific schema adapters and the generic fallback.
//!
//! Each adapter is data: how to find the header row and, for every canonical
//! field, a ranked list of column-label synonyms. Adding a bank means adding a
//! profile, not a code path.

use std::fmt;
use tally_core::{BankId, Cell};
use thiserror::Error;
use tracing::debug;

use crate::columns::pick_column;
use crate::frame::Frame;
use crate::header::find_header_row;
use crate::sheet::RawSheet;

/// The six columns every statement is mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    Description,
    Ref,
    Debit,
    Credit,
    Balance,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Date,
        CanonicalField::Description,
        CanonicalField::Ref,
        CanonicalField::Debit,
        CanonicalField::Credit,
        CanonicalField::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Date",
            CanonicalField::Description => "Description",
            CanonicalField::Ref => "Ref",
            CanonicalField::Debit => "Debit",
            CanonicalField::Credit => "Credit",
            CanonicalField::Balance => "Balance",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an adapter chooses its header row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderStrategy {
    /// Scan for the keywords; use `default_row` only when no row qualifies.
    Detect {
        keywords: &'static [&'static str],
        default_row: usize,
    },
    /// The sheet's own first row
    FirstRow,
}

/// One statement layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaProfile {
    pub name: &'static str,
    pub header: HeaderStrategy,
    /// Ranked synonyms per canonical field, in canonical column order
    pub fields: [(CanonicalField, &'static [&'static str]); 6],
}

pub static AXIS_PROFILE: SchemaProfile = SchemaProfile {
    name: "axis",
    header: HeaderStrategy::Detect {
        keywords: &["tran date", "particulars", "dr", "cr", "bal"],
        default_row: 0,
    },
    fields: [
        (CanonicalField::Date, &["tran date", "date"]),
        (CanonicalField::Description, &["particulars", "description"]),
        (CanonicalField::Ref, &["chq", "ref"]),
        (CanonicalField::Debit, &["dr", "debit", "withdrawal"]),
        (CanonicalField::Credit, &["cr", "credit", "deposit"]),
        (CanonicalField::Balance, &["bal", "balance"]),
    ],
};

pub static HDFC_PROFILE: SchemaProfile = SchemaProfile {
    name: "hdfc",
    header: HeaderStrategy::Detect {
        keywords: &["date", "narration", "withdrawal", "deposit", "balance"],
        default_row: 20,
    },
    fields: [
        (CanonicalField::Date, &["date"]),
        (CanonicalField::Description, &["narration", "description"]),
        (CanonicalField::Ref, &["ref", "cheque"]),
        (CanonicalField::Debit, &["withdrawal", "debit"]),
        (CanonicalField::Credit, &["deposit", "credit"]),
        (CanonicalField::Balance, &["balance"]),
    ],
};

pub static ICICI_PROFILE: SchemaProfile = SchemaProfile {
    name: "icici",
    header: HeaderStrategy::Detect {
        keywords: &[
            "transaction date",
            "transaction remarks",
            "withdrawal",
            "deposit",
            "balance",
        ],
        default_row: 12,
    },
    fields: [
        (CanonicalField::Date, &["transaction date", "date"]),
        (
            CanonicalField::Description,
            &["transaction remarks", "description", "particulars"],
        ),
        (CanonicalField::Ref, &["cheque", "ref"]),
        (CanonicalField::Debit, &["withdrawal", "debit"]),
        (CanonicalField::Credit, &["deposit", "credit"]),
        (CanonicalField::Balance, &["balance"]),
    ],
};

pub static FALLBACK_PROFILE: SchemaProfile = SchemaProfile {
    name: "fallback",
    header: HeaderStrategy::FirstRow,
    fields: [
        (CanonicalField::Date, &["date"]),
        (
            CanonicalField::Description,
            &["description", "narration", "remarks"],
        ),
        (CanonicalField::Ref, &["ref", "chq"]),
        (CanonicalField::Debit, &["debit", "withdrawal"]),
        (CanonicalField::Credit, &["credit", "deposit"]),
        (CanonicalField::Balance, &["balance"]),
    ],
};

/// Adapter dispatch: HDFC1 and HDFC2 share a layout, unknown banks get the fallback.
pub fn profile_for(bank: BankId) -> &'static SchemaProfile {
    match bank {
        BankId::Axis => &AXIS_PROFILE,
        BankId::Hdfc1 | BankId::Hdfc2 => &HDFC_PROFILE,
        BankId::Icici => &ICICI_PROFILE,
        BankId::Unknown => &FALLBACK_PROFILE,
    }
}

impl SchemaProfile {
    pub fn synonyms(&self, field: CanonicalField) -> &'static [&'static str] {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, s)| *s)
            .unwrap_or(&[])
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.header, HeaderStrategy::FirstRow)
    }

    /// Header row for this sheet under this profile
    pub fn header_row(&self, sheet: &RawSheet, search_limit: usize) -> usize {
        match self.header {
            HeaderStrategy::FirstRow => sheet
                .rows()
                .iter()
                .position(|r| !r.iter().all(Cell::is_blank))
                .unwrap_or(0),
            HeaderStrategy::Detect {
                keywords,
                default_row,
            } => match find_header_row(sheet, keywords, search_limit) {
                Some(row) => {
                    debug!("{} header detected at row {}", self.name, row);
                    row
                }
                None => {
                    debug!(
                        "{} header not found in first {} rows, using row {}",
                        self.name, search_limit, default_row
                    );
                    default_row
                }
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("header row {row} is beyond the end of the sheet ({rows} rows)")]
    HeaderRowOutOfRange { row: usize, rows: usize },
    #[error("no column matches {field} (tried {synonyms:?})")]
    MissingColumn {
        field: CanonicalField,
        synonyms: &'static [&'static str],
    },
}

/// One statement row mapped onto the canonical columns, values still raw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRow {
    pub date: Cell,
    pub description: Cell,
    pub reference: Cell,
    pub debit: Cell,
    pub credit: Cell,
    pub balance: Cell,
}

impl CanonicalRow {
    fn set(&mut self, field: CanonicalField, cell: Cell) {
        match field {
            CanonicalField::Date => self.date = cell,
            CanonicalField::Description => self.description = cell,
            CanonicalField::Ref => self.reference = cell,
            CanonicalField::Debit => self.debit = cell,
            CanonicalField::Credit => self.credit = cell,
            CanonicalField::Balance => self.balance = cell,
        }
    }
}

/// Output of an adapter: canonical rows plus which label each field resolved to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalFrame {
    pub rows: Vec<CanonicalRow>,
    pub resolved: Vec<(CanonicalField, Option<String>)>,
}

impl CanonicalFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Label the field was read from, if any
    pub fn source_column(&self, field: CanonicalField) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, label)| label.as_deref())
    }
}

/// Run a profile over a sheet.
///
/// Bank-specific profiles fail when their header row lies past the end of the
/// sheet or no Date column resolves. The fallback profile never fails; see
/// [`parse_fallback`].
pub fn parse_with_profile(
    sheet: &RawSheet,
    profile: &SchemaProfile,
    search_limit: usize,
) -> Result<CanonicalFrame, AdapterError> {
    let row = profile.header_row(sheet, search_limit);
    let frame = Frame::from_sheet(sheet, row).ok_or(AdapterError::HeaderRowOutOfRange {
        row,
        rows: sheet.len(),
    })?;

    let mut resolved = Vec::with_capacity(profile.fields.len());
    let mut indices = Vec::with_capacity(profile.fields.len());
    for field in CanonicalField::ALL {
        let synonyms = profile.synonyms(field);
        let label = pick_column(&frame, synonyms).map(str::to_string);
        if label.is_none() && field == CanonicalField::Date && !profile.is_fallback() {
            return Err(AdapterError::MissingColumn { field, synonyms });
        }
        indices.push((field, label.as_deref().and_then(|l| frame.column_index(l))));
        resolved.push((field, label));
    }

    let rows = frame
        .rows()
        .iter()
        .map(|cells| {
            let mut row = CanonicalRow::default();
            for (field, idx) in &indices {
                if let Some(cell) = idx.and_then(|i| cells.get(i)) {
                    row.set(*field, cell.clone());
                }
            }
            row
        })
        .collect();

    Ok(CanonicalFrame { rows, resolved })
}

/// Generic adapter: first non-blank row as header, broad synonyms, unresolved fields left empty.
pub fn parse_fallback(sheet: &RawSheet) -> CanonicalFrame {
    // the fallback never requires a column, so this cannot fail
    parse_with_profile(sheet, &FALLBACK_PROFILE, 1).unwrap_or_default()
}

/// Run the adapter registered for `bank`.
pub fn parse_bank(
    sheet: &RawSheet,
    bank: BankId,
    search_limit: usize,
) -> Result<CanonicalFrame, AdapterError> {
    let profile = profile_for(bank);
    if profile.is_fallback() {
        return Ok(parse_fallback(sheet));
    }
    parse_with_profile(sheet, profile, search_limit)
}
