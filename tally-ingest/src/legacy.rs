//! Re-saving legacy `.xls` statements as `.xlsx`.
//!
//! The original file is left in place; the copy is written next to it with the
//! same stem. Every worksheet is copied cell by cell, dates keep their serial
//! value under a date format.

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tally_core::Cell;
use tracing::info;

use crate::sheet::{SheetError, all_worksheets, datetime_to_serial};

pub fn is_legacy(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xls"))
}

/// Sibling `.xlsx` path for a legacy file
pub fn modern_path(path: &Path) -> PathBuf {
    path.with_extension("xlsx")
}

/// Return a path in the modern format, re-saving `.xls` input first.
pub fn ensure_modern_format(path: &Path) -> Result<PathBuf, SheetError> {
    if !is_legacy(path) {
        return Ok(path.to_path_buf());
    }
    let target = modern_path(path);
    resave_as_xlsx(path, &target)?;
    info!("Converted {} -> {}", path.display(), target.display());
    Ok(target)
}

/// Copy every worksheet of `src` into a new xlsx workbook at `dst`.
pub fn resave_as_xlsx(src: &Path, dst: &Path) -> Result<(), SheetError> {
    let write_err = |source| SheetError::Write {
        path: dst.display().to_string(),
        source,
    };

    let sheets = all_worksheets(src)?;
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    for (name, sheet) in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name).map_err(write_err)?;

        for (r, row) in sheet.rows().iter().enumerate() {
            let Ok(r) = u32::try_from(r) else { break };
            for (c, cell) in row.iter().enumerate() {
                let Ok(c) = u16::try_from(c) else { break };
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).map_err(write_err)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n).map_err(write_err)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b).map_err(write_err)?;
                    }
                    Cell::Date(dt) => {
                        let format = if dt.time() == chrono::NaiveTime::MIN {
                            &date_format
                        } else {
                            &datetime_format
                        };
                        if let Some(serial) = datetime_to_serial(*dt) {
                            worksheet
                                .write_number_with_format(r, c, serial, format)
                                .map_err(write_err)?;
                        }
                    }
                }
            }
        }
    }

    workbook.save(dst).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::RawSheet;
    use chrono::NaiveDate;

    #[test]
    fn test_legacy_detection_and_target() {
        assert!(is_legacy(Path::new("Acct_3895.XLS")));
        assert!(!is_legacy(Path::new("Acct_3895.xlsx")));
        assert_eq!(
            modern_path(Path::new("dir/Acct_3895.xls")),
            PathBuf::from("dir/Acct_3895.xlsx")
        );
    }

    #[test]
    fn test_modern_files_pass_through() {
        let p = Path::new("statement.xlsx");
        assert_eq!(ensure_modern_format(p).unwrap(), p.to_path_buf());
    }

    #[test]
    fn test_resave_keeps_values_and_dates() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("source.xlsx");
        let dst = dir.path().join("copy.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet().set_name("Statement").unwrap();
        ws.write_string(0, 0, "Date").unwrap();
        ws.write_string(0, 1, "Amount").unwrap();
        ws.write_number_with_format(1, 0, 45291.0, &Format::new().set_num_format("dd/mm/yyyy"))
            .unwrap();
        ws.write_number(1, 1, 1234.5).unwrap();
        wb.save(&src).unwrap();

        resave_as_xlsx(&src, &dst).unwrap();

        let copy = RawSheet::open(&dst).unwrap();
        assert_eq!(copy.row(0).unwrap()[0], Cell::text("Date"));
        assert_eq!(copy.row(1).unwrap()[1], Cell::Number(1234.5));
        match &copy.row(1).unwrap()[0] {
            Cell::Date(dt) => assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            other => panic!("expected a date cell, got {other:?}"),
        }
        assert!(src.exists());
    }
}
