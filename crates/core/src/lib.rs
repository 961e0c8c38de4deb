//! pdfgrid - reconstruct tables from positioned PDF text and export them as CSV.

pub mod api;
pub mod cleanup;
pub mod error;
pub mod export;
pub mod source;
pub mod table;

// Re-export high_level at the crate root
pub use api::high_level;

pub use error::{Result, TableError};
