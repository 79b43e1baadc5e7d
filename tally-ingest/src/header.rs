//! Header row detection.
//!
//! Bank exports prepend a variable number of title, address and disclaimer
//! rows. The real header is the first row in which every expected keyword shows
//! up inside some cell.

use crate::sheet::RawSheet;

/// Index of the first row within `search_limit` rows whose cells contain every
/// keyword as a case-insensitive substring.
pub fn find_header_row(sheet: &RawSheet, keywords: &[&str], search_limit: usize) -> Option<usize> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    sheet
        .rows()
        .iter()
        .take(search_limit)
        .position(|row| {
            let cells: Vec<String> = row.iter().map(|c| c.as_text().to_lowercase()).collect();
            keywords
                .iter()
                .all(|k| cells.iter().any(|c| c.contains(k.as_str())))
        })
}
