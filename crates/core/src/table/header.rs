//! Header row detection from typography.

use indexmap::IndexMap;

use super::types::{FontStyle, HeaderStyle, Row};

/// Most frequent font style among the fragments of `first_row`.
///
/// Ties go to the style seen first. An empty row has no header style.
pub fn detect_header_style(first_row: &Row<'_>) -> Option<HeaderStyle> {
    let mut counts: IndexMap<&FontStyle, usize> = IndexMap::new();
    for fragment in first_row.fragments() {
        *counts.entry(&fragment.style).or_default() += 1;
    }

    let mut best: Option<(&FontStyle, usize)> = None;
    for (style, count) in counts {
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((style, count));
        }
    }
    best.map(|(style, _)| style.clone())
}

/// Header flag for each row.
///
/// The first row is always a header. Any later row is a header only when
/// every one of its fragments has exactly the header style.
pub fn mark_headers(rows: &[Row<'_>], style: Option<&HeaderStyle>) -> Vec<bool> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            idx == 0
                || style.is_some_and(|style| {
                    !row.is_empty() && row.fragments().all(|f| &f.style == style)
                })
        })
        .collect()
}
