//! Column resolution by ranked synonyms.

use crate::frame::Frame;

/// Resolve a column label from a ranked synonym list.
///
/// Synonyms are tried in order and, for each, columns left to right; the first
/// label containing the synonym (case-insensitive) wins. An earlier synonym
/// always beats a later one, even if the later one matches an earlier column.
pub fn pick_column<'a>(frame: &'a Frame, synonyms: &[&str]) -> Option<&'a str> {
    let lowered: Vec<String> = frame
        .columns()
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    synonyms.iter().find_map(|syn| {
        let syn = syn.to_lowercase();
        lowered
            .iter()
            .position(|label| label.contains(syn.as_str()))
            .map(|i| frame.columns()[i].as_str())
    })
}
