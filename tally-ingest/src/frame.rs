//! A sheet re-read with one row as column labels.

use std::collections::HashMap;
use tally_core::Cell;

use crate::sheet::RawSheet;

/// Labelled table: every label is trimmed and unique, every row is as wide as the labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Use `header_row` as labels and the rows below it as data.
    ///
    /// Blank labels become `Unnamed: {i}`, repeated labels get `.1`, `.2`, ...
    /// suffixes, and fully blank data rows are skipped. Returns None when the
    /// header row is past the end of the sheet.
    pub fn from_sheet(sheet: &RawSheet, header_row: usize) -> Option<Self> {
        let header = sheet.row(header_row)?;
        let width = sheet.rows()[header_row..]
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0);

        let mut seen: HashMap<String, usize> = HashMap::new();
        let columns = (0..width)
            .map(|i| {
                let base = header
                    .get(i)
                    .and_then(|c| c.non_blank_text())
                    .unwrap_or_else(|| format!("Unnamed: {i}"));
                let n = seen.entry(base.clone()).or_insert(0);
                let label = if *n == 0 { base } else { format!("{base}.{n}") };
                *n += 1;
                label
            })
            .collect();

        let rows = sheet.rows()[header_row + 1..]
            .iter()
            .filter(|r| !r.iter().all(Cell::is_blank))
            .map(|r| {
                let mut row = r.clone();
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Some(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_trimmed_named_and_unique() {
        let sheet = RawSheet::from_text_rows(&[
            &["HDFC BANK Ltd."],
            &[" Date ", "", "Balance", "Balance"],
            &["01/01/24", "x", "1", "2", "extra"],
        ]);

        let frame = Frame::from_sheet(&sheet, 1).unwrap();
        assert_eq!(
            frame.columns(),
            &["Date", "Unnamed: 1", "Balance", "Balance.1", "Unnamed: 4"]
        );
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.column_index("Balance.1"), Some(3));
    }

    #[test]
    fn test_blank_rows_skipped_and_rows_padded() {
        let sheet = RawSheet::from_text_rows(&[
            &["Date", "Narration", "Balance"],
            &["", "  ", ""],
            &["02/01/24"],
        ]);

        let frame = Frame::from_sheet(&sheet, 0).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.rows()[0].len(), 3);
        assert_eq!(frame.rows()[0][2], Cell::Empty);
    }

    #[test]
    fn test_header_past_end() {
        let sheet = RawSheet::from_text_rows(&[&["Date"]]);
        assert!(Frame::from_sheet(&sheet, 1).is_none());
        assert!(Frame::from_sheet(&sheet, 0).unwrap().is_empty());
    }
}
