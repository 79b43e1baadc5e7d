//! Tolerant coercion of statement cell text into amounts and dates.
//!
//! Statements mix thousands separators, accounting negatives, Dr/Cr markers and
//! several date separators, sometimes within a single file. Every coercer here
//! returns `None` for input it cannot read; none of them fail.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::cell::Cell;

static MARKER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:dr|cr)\.?\s*").expect("static regex"));
static MARKER_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?i:dr|cr)\.?$").expect("static regex"));
static TIME_OF_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\sT]*\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?\s*(?:am|pm)?\s*$").expect("static regex")
});

/// Day-first formats tried in order; separators are normalized before matching.
const DATE_FORMATS: &[&str] = &[
    "%d,%m,%Y",
    "%d,%m,%y",
    "%d-%m-%Y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d/%m/%y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%Y-%m-%d",
];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Coerce a cell into an amount. Numbers pass through; text goes through
/// [`coerce_amount_text`].
pub fn coerce_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => coerce_amount_text(s),
        _ => None,
    }
}

/// Parse amount text such as `"1,234.50 Dr"` or `"(123.45)"`.
pub fn coerce_amount_text(text: &str) -> Option<f64> {
    let s = text.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }

    let s = MARKER_PREFIX_RE.replace(&s, "");
    let s = MARKER_SUFFIX_RE.replace(&s, "");
    let s = s.trim();

    let (negate, digits) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negate { -value } else { value })
}

/// Coerce a cell into a calendar date. Date cells pass through unchanged
/// (time of day dropped); numbers are not treated as serial dates.
pub fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(dt) => Some(dt.date()),
        Cell::Text(s) => coerce_date_text(s),
        _ => None,
    }
}

/// Parse day-first date text, e.g. `"31,12,2023"`, `"31.12.23"`, `"31 Dec 2023"`.
pub fn coerce_date_text(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    let normalized = normalize_separators(s);
    for fmt in DATE_FORMATS {
        let fmt = normalize_separators(fmt);
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, &fmt) {
            if fmt.contains("%Y") && !(1000..=9999).contains(&date.year()) {
                continue;
            }
            return Some(date);
        }
    }

    parse_free_form(s)
}

fn normalize_separators(s: &str) -> String {
    s.replace([',', '.', '/'], "-")
}

/// Last-resort day-first parse: drops a time of day, then reads three tokens as
/// Y-M-D (four-digit lead), Mon-D-Y (month name lead) or D-M-Y.
fn parse_free_form(s: &str) -> Option<NaiveDate> {
    let date_part = TIME_OF_DAY_RE.replace(s, "");
    let tokens: Vec<&str> = date_part
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() != 3 {
        return None;
    }

    let (year, month, day) = if tokens[0].len() == 4 && is_digits(tokens[0]) {
        (tokens[0], tokens[1], tokens[2])
    } else if month_from_name(tokens[0]).is_some() {
        (tokens[2], tokens[0], tokens[1])
    } else {
        (tokens[2], tokens[1], tokens[0])
    };

    let year = parse_year(year)?;
    let mut day: u32 = if is_digits(day) { day.parse().ok()? } else { return None };
    let mut month = match month_from_name(month) {
        Some(m) => m,
        None if is_digits(month) => month.parse().ok()?,
        None => return None,
    };

    // Day-first unless that reading is impossible
    if month > 12 && day <= 12 {
        std::mem::swap(&mut day, &mut month);
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn parse_year(s: &str) -> Option<i32> {
    if !is_digits(s) {
        return None;
    }
    let y: i32 = s.parse().ok()?;
    match s.len() {
        2 if y < 69 => Some(2000 + y),
        2 => Some(1900 + y),
        4 => Some(y),
        _ => None,
    }
}

fn month_from_name(s: &str) -> Option<u32> {
    if s.len() < 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let prefix = s[..3].to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}
