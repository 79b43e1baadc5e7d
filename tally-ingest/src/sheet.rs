//! Raw statement grids read from xlsx/xls/ods (calamine) or csv files.
//!
//! Row indices are absolute: when a workbook's used range starts below row 1
//! the grid is padded so that row `i` here is row `i + 1` in the spreadsheet.

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::path::Path;
use tally_core::Cell;
use thiserror::Error;

/// Largest serial Excel accepts (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::Error,
    },
    #[error("{path} contains no worksheets")]
    NoSheets { path: String },
    #[error("failed to read sheet '{sheet}' of {path}: {source}")]
    Read {
        path: String,
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to read csv {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("unsupported statement file type: {path}")]
    Unsupported { path: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Untyped grid of one worksheet. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a sheet from text rows; empty strings become empty cells.
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| r.iter().map(|s| text_cell(s)).collect())
                .collect(),
        )
    }

    /// Read the first worksheet of a spreadsheet, or a csv file, by extension.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Self::from_csv(path),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Self::from_workbook(path),
            _ => Err(SheetError::Unsupported {
                path: path.display().to_string(),
            }),
        }
    }

    /// First worksheet of a workbook
    pub fn from_workbook(path: &Path) -> Result<Self, SheetError> {
        let mut sheets = all_worksheets(path)?;
        if sheets.is_empty() {
            return Err(SheetError::NoSheets {
                path: path.display().to_string(),
            });
        }
        Ok(sheets.swap_remove(0).1)
    }

    /// Headerless, ragged csv. Bytes that are not UTF-8 are replaced rather than rejected.
    pub fn from_csv(path: &Path) -> Result<Self, SheetError> {
        let csv_err = |source| SheetError::Csv {
            path: path.display().to_string(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;

        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            let record = record.map_err(csv_err)?;
            rows.push(
                record
                    .iter()
                    .map(|field| text_cell(&String::from_utf8_lossy(field)))
                    .collect(),
            );
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// Every worksheet of a workbook, in workbook order.
pub(crate) fn all_worksheets(path: &Path) -> Result<Vec<(String, RawSheet)>, SheetError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|source| SheetError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| SheetError::Read {
                path: path.display().to_string(),
                sheet: name.clone(),
                source,
            })?;
        out.push((name, sheet_from_range(&range)));
    }
    Ok(out)
}

fn sheet_from_range(range: &Range<Data>) -> RawSheet {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }

    RawSheet { rows }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => text_cell(s),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => {
            // 1900 date system assumed
            let serial = dt.as_f64();
            serial_to_datetime(serial)
                .map(Cell::Date)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::Date)
            .unwrap_or_else(|| text_cell(s)),
        Data::DurationIso(s) => text_cell(s),
    }
}

fn text_cell(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Excel serial day number to a timestamp, rounded to the millisecond.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch()?.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// Timestamp to an Excel serial day number.
pub fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let delta = dt.signed_duration_since(excel_epoch()?);
    Some(delta.num_milliseconds() as f64 / 86_400_000.0)
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}
