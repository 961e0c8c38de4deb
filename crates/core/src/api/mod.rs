//! High-level API module for table conversion.
//!
//! # Example
//!
//! ```ignore
//! use pdfgrid_core::api::{ConvertOptions, convert_to_csv};
//! use pdfgrid_core::source::{JsonFragmentDecoder, SourceDocument};
//!
//! let input = SourceDocument::from_path("statement.json")?;
//! let csv = convert_to_csv(&JsonFragmentDecoder, &input, &ConvertOptions::default())?;
//! ```

pub mod builder;
pub mod high_level;

// Re-export for convenience
pub use builder::ConverterBuilder;
pub use high_level::{
    ConvertOptions, aggregate_rows, convert_to_csv, convert_to_writer, extract_page_tables,
    extract_raw_rows, extract_rows, open_document,
};
