//! Single-page table layout.
//!
//! Runs clustering, cell merging, column alignment and header detection on
//! the fragments of one page and produces anchor-aligned string rows.

use tracing::debug;

use super::cells::CellMerger;
use super::columns::ColumnAligner;
use super::header::{detect_header_style, mark_headers};
use super::params::LayoutParams;
use super::rows::RowClusterer;
use super::types::{Cell, HeaderStyle, Row, TableRow, TextFragment};

/// A row of one page after alignment to that page's anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    /// Zero-indexed page the row came from.
    pub page_index: usize,
    pub cells: TableRow,
    pub is_header: bool,
}

/// Layout result for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTable {
    pub page_index: usize,
    pub anchors: Vec<f64>,
    pub header_style: Option<HeaderStyle>,
    pub rows: Vec<ExtractedRow>,
}

impl PageTable {
    pub fn string_rows(&self) -> Vec<TableRow> {
        self.rows.iter().map(|row| row.cells.clone()).collect()
    }
}

/// Emit one trimmed string per anchor; cells sharing an anchor are space-joined.
pub(crate) fn to_table_row(cells: &[(usize, Cell)], columns: usize) -> TableRow {
    let mut out: Vec<String> = vec![String::new(); columns];
    for (column, cell) in cells {
        let Some(slot) = out.get_mut(*column) else {
            continue;
        };
        let text = cell.text.trim();
        if text.is_empty() {
            continue;
        }
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(text);
    }
    out
}

/// Reconstruct the table rows of one page.
///
/// Fragments with non-finite geometry are ignored. Rows whose cells are all
/// blank after trimming are not emitted.
pub fn layout_page(
    page_index: usize,
    fragments: &[TextFragment],
    params: &LayoutParams,
) -> PageTable {
    let usable: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| f.has_finite_geometry())
        .collect();
    if usable.len() != fragments.len() {
        debug!(
            page = page_index + 1,
            dropped = fragments.len() - usable.len(),
            "ignoring fragments with non-finite geometry"
        );
    }

    let aligner = ColumnAligner::from_fragments(usable.iter().copied(), params.column_tolerance);
    let clusterer = RowClusterer::new(params);
    let merger = CellMerger::new(params);

    let (rows, cells): (Vec<Row<'_>>, Vec<TableRow>) = clusterer
        .cluster(usable.iter().copied())
        .into_iter()
        .map(|row| {
            let cells = to_table_row(&merger.merge(&row, &aligner), aligner.len());
            (row, cells)
        })
        .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
        .unzip();

    let header_style = rows.first().and_then(detect_header_style);
    let flags = mark_headers(&rows, header_style.as_ref());

    debug!(
        page = page_index + 1,
        rows = rows.len(),
        columns = aligner.len(),
        "laid out page"
    );

    PageTable {
        page_index,
        anchors: aligner.anchors().to_vec(),
        header_style,
        rows: cells
            .into_iter()
            .zip(flags)
            .map(|(cells, is_header)| ExtractedRow {
                page_index,
                cells,
                is_header,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::FontStyle;

    fn frag(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, x, y).with_size(20.0, 10.0)
    }

    #[test]
    fn two_by_two_table() {
        let fragments = vec![
            frag("Name", 0.0, 100.0),
            frag("Age", 50.0, 100.0),
            frag("Alice", 0.0, 80.0),
            frag("30", 50.0, 80.0),
        ];
        let page = layout_page(0, &fragments, &LayoutParams::default());
        assert_eq!(page.anchors, vec![0.0, 50.0]);
        assert_eq!(
            page.string_rows(),
            vec![vec!["Name", "Age"], vec!["Alice", "30"]]
        );
    }

    #[test]
    fn missing_cells_become_empty_strings() {
        let fragments = vec![
            frag("A", 0.0, 100.0),
            frag("B", 50.0, 100.0),
            frag("C", 100.0, 100.0),
            frag("only middle", 52.0, 80.0),
        ];
        let page = layout_page(0, &fragments, &LayoutParams::default());
        assert_eq!(page.anchors, vec![0.0, 50.0, 100.0]);
        assert_eq!(page.rows[1].cells, vec!["", "only middle", ""]);
        assert!(page.rows.iter().all(|row| row.cells.len() == page.anchors.len()));
    }

    #[test]
    fn blank_rows_are_not_emitted() {
        let fragments = vec![
            frag("A", 0.0, 100.0),
            frag("   ", 0.0, 80.0),
            frag("B", 0.0, 60.0),
        ];
        let page = layout_page(0, &fragments, &LayoutParams::default());
        assert_eq!(page.string_rows(), vec![vec!["A"], vec!["B"]]);
    }

    #[test]
    fn header_rows_are_flagged() {
        let bold = FontStyle::new("Helvetica-Bold", 10.0, "700");
        let regular = FontStyle::new("Helvetica", 10.0, "400");
        let fragments = vec![
            frag("Item", 0.0, 100.0).with_style(bold.clone()),
            frag("Price", 50.0, 100.0).with_style(bold.clone()),
            frag("Tea", 0.0, 80.0).with_style(regular.clone()),
            frag("2.50", 50.0, 80.0).with_style(regular),
            frag("Item", 0.0, 60.0).with_style(bold.clone()),
            frag("Price", 50.0, 60.0).with_style(bold.clone()),
        ];
        let page = layout_page(3, &fragments, &LayoutParams::default());
        let flags: Vec<bool> = page.rows.iter().map(|row| row.is_header).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(page.header_style, Some(bold));
        assert!(page.rows.iter().all(|row| row.page_index == 3));
    }

    #[test]
    fn non_finite_fragments_are_ignored() {
        let fragments = vec![frag("A", 0.0, 100.0), frag("bad", f64::NAN, 100.0)];
        let page = layout_page(0, &fragments, &LayoutParams::default());
        assert_eq!(page.string_rows(), vec![vec!["A"]]);
    }

    #[test]
    fn extreme_baselines_do_not_abort_layout() {
        let fragments = vec![
            frag("top", 0.0, 1e19),
            frag("A", 0.0, 100.0),
            frag("bottom", 0.0, -1e19),
        ];
        let page = layout_page(0, &fragments, &LayoutParams::default());
        assert_eq!(
            page.string_rows(),
            vec![vec!["top"], vec!["A"], vec!["bottom"]]
        );
    }

    #[test]
    fn empty_page() {
        let page = layout_page(0, &[], &LayoutParams::default());
        assert!(page.rows.is_empty());
        assert!(page.anchors.is_empty());
        assert_eq!(page.header_style, None);
    }

    #[test]
    fn shared_anchor_cells_are_joined() {
        let a = frag("x", 0.0, 100.0).with_style(FontStyle::new("A", 10.0, "400"));
        let b = frag("y", 30.0, 100.0).with_style(FontStyle::new("B", 10.0, "400"));
        let cells = vec![
            (0, Cell::from_fragment(&a)),
            (0, Cell::from_fragment(&b)),
        ];
        assert_eq!(to_table_row(&cells, 2), vec!["x y", ""]);
    }
}
