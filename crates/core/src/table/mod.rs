//! Table layout inference.
//!
//! This module reconstructs table rows from the positioned text fragments of
//! a page: fragments are clustered into rows by baseline, joined into cells,
//! snapped to per-page column anchors, and tagged by header style.

mod cells;
mod columns;
mod header;
mod page;
mod params;
mod rows;
mod types;

// Re-export public types
pub use types::{Band, Cell, FontStyle, HeaderStyle, Row, TableRow, TextFragment};

pub use params::LayoutParams;

// Re-export pipeline stages
pub use cells::CellMerger;
pub use columns::{ColumnAligner, compute_anchors};
pub use header::{detect_header_style, mark_headers};
pub use page::{ExtractedRow, PageTable, layout_page};
pub use rows::{RowClusterer, row_threshold};
