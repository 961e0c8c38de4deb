//! Layout inference parameters.
//!
//! Contains LayoutParams for controlling how fragments are grouped into
//! rows, cells and columns.

pub(crate) const DEFAULT_ROW_THRESHOLD: f64 = 5.0;
pub(crate) const DEFAULT_ROW_THRESHOLD_DIVISOR: f64 = 3.0;
pub(crate) const DEFAULT_CELL_JOIN_TOLERANCE: f64 = 5.0;
pub(crate) const DEFAULT_ADJACENT_GAP_TOLERANCE: f64 = 5.0;
pub(crate) const DEFAULT_COLUMN_TOLERANCE: f64 = 5.0;

/// Parameters for table layout inference.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Row-height threshold used when a page has fewer than two distinct
    /// baselines, or no positive spacing between them.
    pub default_row_threshold: f64,

    /// The row-height threshold is the median baseline spacing divided by
    /// this value.
    pub row_threshold_divisor: f64,

    /// A fragment arriving in an open row whose x is closer than this to an
    /// existing cell is appended to that cell.
    pub cell_join_tolerance: f64,

    /// Two neighbouring fragments in the same font are joined when the gap
    /// between the end of the left one and the start of the right one is
    /// below this value.
    pub adjacent_gap_tolerance: f64,

    /// Rounded x-positions closer than this to the previous anchor collapse
    /// into the same column.
    pub column_tolerance: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            default_row_threshold: DEFAULT_ROW_THRESHOLD,
            row_threshold_divisor: DEFAULT_ROW_THRESHOLD_DIVISOR,
            cell_join_tolerance: DEFAULT_CELL_JOIN_TOLERANCE,
            adjacent_gap_tolerance: DEFAULT_ADJACENT_GAP_TOLERANCE,
            column_tolerance: DEFAULT_COLUMN_TOLERANCE,
        }
    }
}

impl LayoutParams {
    /// Creates layout parameters with the given tolerances.
    ///
    /// # Panics
    /// Panics if any tolerance is negative or not finite, or if
    /// `row_threshold_divisor` is not strictly positive.
    pub fn new(
        default_row_threshold: f64,
        row_threshold_divisor: f64,
        cell_join_tolerance: f64,
        adjacent_gap_tolerance: f64,
        column_tolerance: f64,
    ) -> Self {
        for (name, value) in [
            ("default_row_threshold", default_row_threshold),
            ("cell_join_tolerance", cell_join_tolerance),
            ("adjacent_gap_tolerance", adjacent_gap_tolerance),
            ("column_tolerance", column_tolerance),
        ] {
            assert!(
                value.is_finite() && value >= 0.0,
                "{name} should be a finite, non-negative number"
            );
        }
        assert!(
            row_threshold_divisor.is_finite() && row_threshold_divisor > 0.0,
            "row_threshold_divisor should be a positive number"
        );

        Self {
            default_row_threshold,
            row_threshold_divisor,
            cell_join_tolerance,
            adjacent_gap_tolerance,
            column_tolerance,
        }
    }

    pub fn with_column_tolerance(mut self, tolerance: f64) -> Self {
        self.column_tolerance = tolerance;
        self
    }

    pub fn with_adjacent_gap_tolerance(mut self, tolerance: f64) -> Self {
        self.adjacent_gap_tolerance = tolerance;
        self
    }
}
