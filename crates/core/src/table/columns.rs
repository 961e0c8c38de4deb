//! Column anchors shared by every row of a page.

use std::collections::BTreeSet;

use itertools::Itertools;

use super::types::{Cell, TextFragment, round_coord};

/// Collapse sorted distinct x-positions into column anchors.
///
/// A position becomes a new anchor only if it lies more than `tolerance`
/// to the right of the last anchor kept.
pub fn compute_anchors<I>(x_positions: I, tolerance: f64) -> Vec<f64>
where
    I: IntoIterator<Item = i64>,
{
    let distinct: BTreeSet<i64> = x_positions.into_iter().collect();
    let mut anchors: Vec<f64> = Vec::new();
    for x in distinct {
        let x = x as f64;
        match anchors.last() {
            Some(last) if x - last <= tolerance => {}
            _ => anchors.push(x),
        }
    }
    anchors
}

/// Snaps cells to the nearest of a page's column anchors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAligner {
    anchors: Vec<f64>,
}

impl ColumnAligner {
    pub fn new(anchors: Vec<f64>) -> Self {
        Self { anchors }
    }

    /// Derive anchors from the rounded x-positions of every fragment on a page.
    pub fn from_fragments<'a, I>(fragments: I, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        Self::new(compute_anchors(
            fragments.into_iter().map(|f| round_coord(f.x)),
            tolerance,
        ))
    }

    pub fn anchors(&self) -> &[f64] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Index of the anchor closest to `x`; the leftmost wins a tie.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        self.anchors
            .iter()
            .position_min_by(|a, b| (x - *a).abs().total_cmp(&(x - *b).abs()))
    }

    /// Move a cell onto its nearest anchor, returning the column index.
    pub fn snap(&self, mut cell: Cell) -> Option<(usize, Cell)> {
        let column = self.nearest(cell.x)?;
        cell.x = self.anchors[column];
        Some((column, cell))
    }
}
