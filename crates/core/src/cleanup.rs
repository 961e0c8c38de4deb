//! Post-hoc cleanup of reconstructed table rows.
//!
//! Three passes run in order: blank rows are dropped and cells normalized,
//! repeated header rows are collapsed, and rendering artifacts (page
//! numbers, continuation markers, stray punctuation) are filtered out.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::table::TableRow;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static NUMERIC_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9.,\s-]+$").unwrap());
static NO_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\p{Alphabetic}\p{Nd}]+$").unwrap());

/// Lowercased single-cell texts decoders emit around page breaks.
const CONTINUATION_MARKERS: [&str; 4] = [
    "page",
    "of",
    "continued",
    "continued from previous page",
];

/// Collapse whitespace runs, straighten curly quotes, and trim.
pub fn normalize_cell(cell: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(cell, " ");
    let straightened: String = collapsed
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            c => c,
        })
        .collect();
    straightened.trim().to_string()
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Drop rows whose cells are all blank and normalize the rest.
pub fn drop_blank_rows(rows: Vec<TableRow>) -> Vec<TableRow> {
    rows.into_iter()
        .filter(|row| !is_blank(row))
        .map(|row| row.iter().map(|cell| normalize_cell(cell)).collect())
        .collect()
}

fn lowercase_key(row: &[String]) -> Vec<String> {
    row.iter().map(|cell| cell.to_lowercase()).collect()
}

/// Remove later rows that repeat the header row, ignoring case.
///
/// The header is the first row that is not itself an artifact, so a
/// leading page number cannot shadow the real header.
pub fn collapse_duplicate_headers(rows: Vec<TableRow>) -> Vec<TableRow> {
    let Some(header_idx) = rows.iter().position(|row| !is_artifact_row(row)) else {
        return rows;
    };
    let header = lowercase_key(&rows[header_idx]);
    rows.into_iter()
        .enumerate()
        .filter(|(idx, row)| *idx <= header_idx || lowercase_key(row) != header)
        .map(|(_, row)| row)
        .collect()
}

/// Whether a row is page-rendering noise rather than table data.
pub fn is_artifact_row(row: &[String]) -> bool {
    let non_empty: Vec<&str> = row
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect();

    if let [only] = non_empty.as_slice() {
        if PAGE_NUMBER.is_match(only) {
            return true;
        }
        if CONTINUATION_MARKERS.contains(&only.to_lowercase().as_str()) {
            return true;
        }
    }

    let all_numeric = non_empty.iter().all(|cell| NUMERIC_ONLY.is_match(cell));
    let all_symbols = non_empty.iter().all(|cell| NO_ALPHANUMERIC.is_match(cell));
    (all_numeric || all_symbols) && non_empty.len() < 2
}

/// Drop artifact rows.
pub fn drop_artifact_rows(rows: Vec<TableRow>) -> Vec<TableRow> {
    rows.into_iter().filter(|row| !is_artifact_row(row)).collect()
}

/// Run all cleanup passes. Applying `clean` to its own output changes nothing.
pub fn clean(rows: Vec<TableRow>) -> Vec<TableRow> {
    let total = rows.len();
    let rows = drop_blank_rows(rows);
    let after_blank = rows.len();
    let rows = collapse_duplicate_headers(rows);
    let after_headers = rows.len();
    let rows = drop_artifact_rows(rows);
    debug!(
        blank = total - after_blank,
        duplicate_headers = after_blank - after_headers,
        artifacts = after_headers - rows.len(),
        kept = rows.len(),
        "cleaned table rows"
    );
    rows
}
