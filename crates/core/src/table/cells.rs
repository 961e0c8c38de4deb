//! Merging fragments of a row into logical cells.

use super::columns::ColumnAligner;
use super::params::LayoutParams;
use super::types::{Band, Cell, Row, TextFragment};

/// Builds cells from the fragments of a row.
#[derive(Debug, Clone)]
pub struct CellMerger {
    join_tolerance: f64,
    gap_tolerance: f64,
}

impl CellMerger {
    pub fn new(params: &LayoutParams) -> Self {
        Self {
            join_tolerance: params.cell_join_tolerance,
            gap_tolerance: params.adjacent_gap_tolerance,
        }
    }

    /// Join horizontally adjacent fragments of one band.
    ///
    /// Fragments are visited left to right; a fragment continues the current
    /// cell when it starts within `adjacent_gap_tolerance` of the cell's right
    /// edge and uses the same font family.
    pub fn merge_adjacent(&self, fragments: &[&TextFragment]) -> Vec<Cell> {
        let mut sorted = fragments.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut merged: Vec<Cell> = Vec::with_capacity(sorted.len());
        let mut current: Option<Cell> = None;
        for fragment in sorted {
            current = Some(match current.take() {
                None => Cell::from_fragment(fragment),
                Some(mut cell) => {
                    let gap = (cell.end_x() - fragment.x).abs();
                    if gap < self.gap_tolerance && cell.style.family == fragment.style.family {
                        cell.text.push(' ');
                        cell.text.push_str(&fragment.text);
                        cell.width = cell.end_x().max(fragment.end_x()) - cell.x;
                        cell
                    } else {
                        merged.push(cell);
                        Cell::from_fragment(fragment)
                    }
                }
            });
        }
        merged.extend(current);
        merged
    }

    /// Fold incoming snapped cells into the cells accumulated for a row.
    ///
    /// A cell whose x lies within `cell_join_tolerance` of an accumulated
    /// cell is appended to it, otherwise it becomes a new cell.
    pub fn absorb(
        &self,
        mut acc: Vec<(usize, Cell)>,
        incoming: Vec<(usize, Cell)>,
    ) -> Vec<(usize, Cell)> {
        for (column, cell) in incoming {
            let target = acc
                .iter_mut()
                .find(|(_, existing)| (existing.x - cell.x).abs() < self.join_tolerance);
            match target {
                Some((_, existing)) => {
                    existing.text.push(' ');
                    existing.text.push_str(&cell.text);
                }
                None => acc.push((column, cell)),
            }
        }
        acc
    }

    /// Cells of a finalized row, snapped to the page's anchors and sorted by x.
    pub fn merge(&self, row: &Row<'_>, aligner: &ColumnAligner) -> Vec<(usize, Cell)> {
        let mut bands = row.bands.iter();
        let opening = bands
            .next()
            .map(|band| self.snapped_band(band, aligner))
            .unwrap_or_default();
        let mut cells = bands.fold(opening, |acc, band| {
            self.absorb(acc, self.snapped_band(band, aligner))
        });
        cells.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        cells
    }

    fn snapped_band(&self, band: &Band<'_>, aligner: &ColumnAligner) -> Vec<(usize, Cell)> {
        self.merge_adjacent(&band.fragments)
            .into_iter()
            .filter_map(|cell| aligner.snap(cell))
            .collect()
    }
}

impl Default for CellMerger {
    fn default() -> Self {
        Self::new(&LayoutParams::default())
    }
}
