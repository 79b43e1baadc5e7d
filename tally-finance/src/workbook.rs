//! Expense tracker workbook rendering.
//!
//! Sheet order: Transactions, Category_List, SubCategory_List (extended),
//! Summary_By_Category and Summary_By_Month (base), Parse_Log.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    DataValidation, ExcelDateTime, Format, Formula, Workbook, Worksheet, XlsxError,
};
use std::path::Path;
use tally_core::{CanonicalTransaction, ConsolidatedLedger, ParseLogEntry, TxnType};
use thiserror::Error;
use tracing::info;

use crate::summary::{category_totals, month_totals};
use crate::vocabulary::{CATEGORY_LIST, Layout, lookup_formula, range_name, subcategories};

pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const CATEGORY_SHEET: &str = "Category_List";
pub const SUBCATEGORY_SHEET: &str = "SubCategory_List";
pub const CATEGORY_SUMMARY_SHEET: &str = "Summary_By_Category";
pub const MONTH_SUMMARY_SHEET: &str = "Summary_By_Month";
pub const PARSE_LOG_SHEET: &str = "Parse_Log";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("building workbook: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("saving {path}: {source}")]
    Save { path: String, source: XlsxError },
}

/// Columns of the Transactions sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnColumn {
    Date,
    Description,
    Category,
    SubCategory,
    Ref,
    Debit,
    Credit,
    Balance,
    Bank,
    Type,
    Amount,
    Month,
}

const BASE_COLUMNS: [TxnColumn; 11] = [
    TxnColumn::Date,
    TxnColumn::Description,
    TxnColumn::Category,
    TxnColumn::Ref,
    TxnColumn::Debit,
    TxnColumn::Credit,
    TxnColumn::Balance,
    TxnColumn::Bank,
    TxnColumn::Type,
    TxnColumn::Amount,
    TxnColumn::Month,
];

const EXTENDED_COLUMNS: [TxnColumn; 12] = [
    TxnColumn::Date,
    TxnColumn::Description,
    TxnColumn::Category,
    TxnColumn::SubCategory,
    TxnColumn::Ref,
    TxnColumn::Debit,
    TxnColumn::Credit,
    TxnColumn::Balance,
    TxnColumn::Bank,
    TxnColumn::Type,
    TxnColumn::Amount,
    TxnColumn::Month,
];

impl TxnColumn {
    pub fn label(&self) -> &'static str {
        match self {
            TxnColumn::Date => "Date",
            TxnColumn::Description => "Description",
            TxnColumn::Category => "Category",
            TxnColumn::SubCategory => "SubCategory",
            TxnColumn::Ref => "Ref",
            TxnColumn::Debit => "Debit",
            TxnColumn::Credit => "Credit",
            TxnColumn::Balance => "Balance",
            TxnColumn::Bank => "Bank",
            TxnColumn::Type => "Type",
            TxnColumn::Amount => "Amount",
            TxnColumn::Month => "Month",
        }
    }

    fn width(&self) -> f64 {
        match self {
            TxnColumn::Description => 48.0,
            TxnColumn::Category | TxnColumn::SubCategory => 18.0,
            TxnColumn::Ref => 16.0,
            TxnColumn::Date | TxnColumn::Month => 12.0,
            _ => 10.0,
        }
    }
}

pub fn transaction_columns(layout: Layout) -> &'static [TxnColumn] {
    match layout {
        Layout::Base => &BASE_COLUMNS,
        Layout::Extended => &EXTENDED_COLUMNS,
    }
}

/// Spreadsheet column letters for a zero-based index (0 -> A, 26 -> AA).
pub fn column_letter(index: u16) -> String {
    let mut n = u32::from(index) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn column_index(columns: &[TxnColumn], column: TxnColumn) -> Option<u16> {
    columns
        .iter()
        .position(|c| *c == column)
        .and_then(|i| u16::try_from(i).ok())
}

fn excel_date(date: NaiveDate) -> Result<Option<ExcelDateTime>, XlsxError> {
    let Ok(year) = u16::try_from(date.year()) else {
        return Ok(None);
    };
    // Excel cannot show dates before 1900.
    if year < 1900 {
        return Ok(None);
    }
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).map(Some)
}

fn write_optional_number(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), XlsxError> {
    if let Some(n) = value {
        ws.write_number(row, col, n)?;
    }
    Ok(())
}

fn write_header(ws: &mut Worksheet, labels: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (c, label) in labels.iter().enumerate() {
        let Ok(c) = u16::try_from(c) else { break };
        ws.write_string_with_format(0, c, *label, bold)?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_transaction(
    ws: &mut Worksheet,
    row: u32,
    columns: &[TxnColumn],
    txn: &CanonicalTransaction,
    date_format: &Format,
) -> Result<(), XlsxError> {
    for (c, column) in columns.iter().enumerate() {
        let Ok(c) = u16::try_from(c) else { break };
        match column {
            TxnColumn::Date => {
                if let Some(dt) = txn.date.map(excel_date).transpose()?.flatten() {
                    ws.write_datetime_with_format(row, c, &dt, date_format)?;
                }
            }
            TxnColumn::Description => {
                ws.write_string(row, c, &txn.description)?;
            }
            // Filled in by hand
            TxnColumn::Category | TxnColumn::SubCategory => {}
            TxnColumn::Ref => {
                if let Some(reference) = &txn.reference {
                    ws.write_string(row, c, reference)?;
                }
            }
            TxnColumn::Debit => write_optional_number(ws, row, c, txn.debit)?,
            TxnColumn::Credit => write_optional_number(ws, row, c, txn.credit)?,
            TxnColumn::Balance => write_optional_number(ws, row, c, txn.balance)?,
            TxnColumn::Bank => {
                ws.write_string(row, c, txn.bank.as_str())?;
            }
            TxnColumn::Type => {
                ws.write_string(row, c, txn.txn_type().as_str())?;
            }
            TxnColumn::Amount => {
                ws.write_number(row, c, txn.amount())?;
            }
            TxnColumn::Month => {
                if let Some(label) = txn.month_label() {
                    ws.write_string(row, c, label)?;
                }
            }
        }
    }
    Ok(())
}

fn write_transactions(
    ws: &mut Worksheet,
    ledger: &ConsolidatedLedger,
    layout: Layout,
    bold: &Format,
) -> Result<(), XlsxError> {
    let columns = transaction_columns(layout);
    let labels: Vec<&str> = columns.iter().map(|c| c.label()).collect();
    write_header(ws, &labels, bold)?;

    let date_format = Format::new().set_num_format("dd-mmm-yyyy");
    let mut last_row = 0u32;
    for (i, txn) in ledger.transactions().iter().enumerate() {
        let Ok(row) = u32::try_from(i + 1) else { break };
        write_transaction(ws, row, columns, txn, &date_format)?;
        last_row = row;
    }

    for (c, column) in columns.iter().enumerate() {
        let Ok(c) = u16::try_from(c) else { break };
        ws.set_column_width(c, column.width())?;
    }

    if last_row == 0 {
        return Ok(());
    }

    let last_col = u16::try_from(columns.len() - 1).unwrap_or(u16::MAX);
    ws.autofilter(0, 0, last_row, last_col)?;

    if let Some(cat_col) = column_index(columns, TxnColumn::Category) {
        let source = format!(
            "{CATEGORY_SHEET}!$A$2:$A${}",
            CATEGORY_LIST.len() + 1
        );
        let validation = DataValidation::new().allow_list_formula(Formula::new(source));
        ws.add_data_validation(1, cat_col, last_row, cat_col, &validation)?;

        if let Some(sub_col) = column_index(columns, TxnColumn::SubCategory) {
            let lookup = lookup_formula(&format!("${}2", column_letter(cat_col)));
            let lookup = lookup.strip_prefix('=').unwrap_or(&lookup);
            let validation = DataValidation::new().allow_list_formula(Formula::new(lookup));
            ws.add_data_validation(1, sub_col, last_row, sub_col, &validation)?;
        }
    }
    Ok(())
}

fn write_category_list(ws: &mut Worksheet, bold: &Format) -> Result<(), XlsxError> {
    write_header(ws, &["Category"], bold)?;
    for (i, category) in CATEGORY_LIST.iter().enumerate() {
        ws.write_string(i as u32 + 1, 0, *category)?;
    }
    ws.set_column_width(0, 18)?;
    Ok(())
}

/// One column per category; returns the defined names to register as
/// `(name, range formula)` pairs.
fn write_subcategory_list(
    ws: &mut Worksheet,
    bold: &Format,
) -> Result<Vec<(String, String)>, XlsxError> {
    write_header(ws, &CATEGORY_LIST, bold)?;

    let mut names = Vec::with_capacity(CATEGORY_LIST.len());
    for (c, category) in CATEGORY_LIST.iter().enumerate() {
        let c = c as u16;
        let subs = subcategories(category);
        for (r, sub) in subs.iter().enumerate() {
            ws.write_string(r as u32 + 1, c, *sub)?;
        }
        ws.set_column_width(c, 20)?;

        let letter = column_letter(c);
        names.push((
            range_name(category),
            format!("={SUBCATEGORY_SHEET}!${letter}$2:${letter}${}", subs.len() + 1),
        ));
    }
    Ok(names)
}

fn write_type_header(ws: &mut Worksheet, first: &str, bold: &Format) -> Result<(), XlsxError> {
    let mut labels = vec![first];
    labels.extend(TxnType::ALL.iter().map(|t| t.as_str()));
    write_header(ws, &labels, bold)?;
    ws.set_column_width(0, 18)?;
    Ok(())
}

/// SUMIFS over whole Transactions columns so manual categorisation updates
/// the summary; cached results reflect the ledger as written.
fn write_category_summary(
    ws: &mut Worksheet,
    ledger: &ConsolidatedLedger,
    bold: &Format,
) -> Result<(), XlsxError> {
    let columns = transaction_columns(Layout::Base);
    let letter = |column| column_index(columns, column).map(column_letter).unwrap_or_default();
    let amount = letter(TxnColumn::Amount);
    let category = letter(TxnColumn::Category);
    let kind = letter(TxnColumn::Type);

    write_type_header(ws, "Category", bold)?;
    let totals = category_totals(ledger);

    let labels = CATEGORY_LIST.iter().copied().chain(std::iter::once(""));
    for (i, label) in labels.enumerate() {
        let row = i as u32 + 1;
        let criterion = if label.is_empty() {
            "\"\"".to_string()
        } else {
            ws.write_string(row, 0, label)?;
            format!("$A{}", row + 1)
        };
        let cached = totals.get(label).copied().unwrap_or_default();

        for (t, txn_type) in TxnType::ALL.iter().enumerate() {
            let col = t as u16 + 1;
            let header = format!("{}$1", column_letter(col));
            let formula = format!(
                "SUMIFS({TRANSACTIONS_SHEET}!${amount}:${amount},\
                 {TRANSACTIONS_SHEET}!${category}:${category},{criterion},\
                 {TRANSACTIONS_SHEET}!${kind}:${kind},{header})"
            );
            let formula = Formula::new(formula).set_result(cached.get(*txn_type).to_string());
            ws.write_formula(row, col, formula)?;
        }
    }
    Ok(())
}

fn write_month_summary(
    ws: &mut Worksheet,
    ledger: &ConsolidatedLedger,
    bold: &Format,
) -> Result<(), XlsxError> {
    write_type_header(ws, "Month", bold)?;
    let net_col = TxnType::ALL.len() as u16 + 1;
    ws.write_string_with_format(0, net_col, "Net", bold)?;
    for (i, month) in month_totals(ledger).iter().enumerate() {
        let row = i as u32 + 1;
        ws.write_string(row, 0, &month.month)?;
        for (t, txn_type) in TxnType::ALL.iter().enumerate() {
            ws.write_number(row, t as u16 + 1, month.totals.get(*txn_type))?;
        }
        ws.write_number(row, net_col, month.totals.net())?;
    }
    Ok(())
}

fn write_parse_log(ws: &mut Worksheet, log: &[ParseLogEntry], bold: &Format) -> Result<(), XlsxError> {
    write_header(
        ws,
        &["File", "Bank", "RowsParsed", "RowsDropped", "Adapter", "Note"],
        bold,
    )?;
    for (i, entry) in log.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write_string(row, 0, &entry.file)?;
        ws.write_string(row, 1, entry.bank.as_str())?;
        ws.write_number(row, 2, entry.rows_parsed as f64)?;
        ws.write_number(row, 3, entry.rows_dropped as f64)?;
        ws.write_string(row, 4, entry.adapter.as_str())?;
        if let Some(note) = &entry.fallback_reason {
            ws.write_string(row, 5, note)?;
        }
    }
    ws.set_column_width(0, 36)?;
    ws.set_column_width(5, 48)?;
    Ok(())
}

/// Write the tracker workbook for `ledger` to `path`, replacing any existing file.
pub fn render_workbook(
    ledger: &ConsolidatedLedger,
    log: &[ParseLogEntry],
    layout: Layout,
    path: &Path,
) -> Result<(), RenderError> {
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    write_transactions(
        workbook.add_worksheet().set_name(TRANSACTIONS_SHEET)?,
        ledger,
        layout,
        &bold,
    )?;
    write_category_list(workbook.add_worksheet().set_name(CATEGORY_SHEET)?, &bold)?;

    match layout {
        Layout::Extended => {
            let names =
                write_subcategory_list(workbook.add_worksheet().set_name(SUBCATEGORY_SHEET)?, &bold)?;
            for (name, range) in &names {
                workbook.define_name(name, range)?;
            }
        }
        Layout::Base => {
            write_category_summary(
                workbook.add_worksheet().set_name(CATEGORY_SUMMARY_SHEET)?,
                ledger,
                &bold,
            )?;
            write_month_summary(
                workbook.add_worksheet().set_name(MONTH_SUMMARY_SHEET)?,
                ledger,
                &bold,
            )?;
        }
    }

    write_parse_log(workbook.add_worksheet().set_name(PARSE_LOG_SHEET)?, log, &bold)?;

    workbook.save(path).map_err(|source| RenderError::Save {
        path: path.display().to_string(),
        source,
    })?;
    match ledger.date_range() {
        Some((first, last)) => info!(
            "Wrote {} transaction(s) from {} file(s), {} to {}, to {}",
            ledger.len(),
            log.len(),
            first,
            last,
            path.display()
        ),
        None => info!("Wrote an empty ledger to {}", path.display()),
    }
    Ok(())
}
