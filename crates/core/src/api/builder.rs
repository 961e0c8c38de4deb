//! Builder pattern for document conversion.
//!
//! Provides a fluent API for configuring and running a conversion with the
//! bundled JSON fragment decoder.
//!
//! # Example
//! ```ignore
//! use pdfgrid_core::api::ConverterBuilder;
//!
//! let csv = ConverterBuilder::new("statement.json")
//!     .pages(0..5)
//!     .threads(4)
//!     .column_tolerance(8.0)
//!     .convert_to_csv()?;
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::{Result, TableError};
use crate::source::{JsonFragmentDecoder, SourceDocument};
use crate::table::{LayoutParams, TableRow};

use super::high_level::{ConvertOptions, convert_to_csv, convert_to_writer, extract_rows};

#[derive(Debug, Clone)]
enum Input {
    Path(PathBuf),
    Document(SourceDocument),
}

/// A builder for configuring document conversion.
///
/// This wraps `ConvertOptions` and the conversion functions of
/// [`high_level`](super::high_level).
#[derive(Debug, Clone)]
pub struct ConverterBuilder {
    input: Input,
    pages: Option<Range<usize>>,
    options: ConvertOptions,
}

impl ConverterBuilder {
    /// Creates a builder for a fragment document on disk.
    pub fn new(source: impl AsRef<Path>) -> Self {
        Self::with_input(Input::Path(source.as_ref().to_path_buf()))
    }

    /// Creates a builder for a document already held in memory.
    pub fn from_document(document: SourceDocument) -> Self {
        Self::with_input(Input::Document(document))
    }

    fn with_input(input: Input) -> Self {
        Self {
            input,
            pages: None,
            options: ConvertOptions::default(),
        }
    }

    /// Sets a range of pages to convert (zero-indexed).
    ///
    /// Replaces any previously set page_numbers.
    pub fn pages(mut self, range: Range<usize>) -> Self {
        self.pages = Some(range);
        self.options.page_numbers = None;
        self
    }

    /// Sets specific page numbers to convert (zero-indexed).
    ///
    /// Replaces any previously set pages range.
    pub fn page_numbers(mut self, numbers: Vec<usize>) -> Self {
        self.options.page_numbers = Some(numbers);
        self.pages = None;
        self
    }

    /// Sets the maximum number of pages to convert (0 means no limit).
    pub fn maxpages(mut self, max: usize) -> Self {
        self.options.maxpages = max;
        self
    }

    /// Sets the number of page workers. 1 processes pages serially.
    pub fn threads(mut self, thread_count: usize) -> Self {
        self.options.threads = Some(thread_count.max(1));
        self
    }

    /// Replaces all layout parameters.
    pub fn layout(mut self, params: LayoutParams) -> Self {
        self.options.layout = params;
        self
    }

    /// Sets the tolerance used to collapse x-positions into columns.
    pub fn column_tolerance(mut self, tolerance: f64) -> Self {
        self.options.layout = self.options.layout.with_column_tolerance(tolerance);
        self
    }

    /// Sets the largest gap across which same-font fragments are joined.
    pub fn gap_tolerance(mut self, tolerance: f64) -> Self {
        self.options.layout = self.options.layout.with_adjacent_gap_tolerance(tolerance);
        self
    }

    /// Fails any page holding more fragments than `limit` (0 means no limit).
    pub fn max_fragments_per_page(mut self, limit: usize) -> Self {
        self.options.decoder.max_fragments_per_page = limit;
        self
    }

    /// Skips undecodable fragments instead of failing their page.
    pub fn skip_malformed_fragments(mut self, skip: bool) -> Self {
        self.options.decoder.skip_malformed_fragments = skip;
        self
    }

    /// The `ConvertOptions` this builder will run with.
    pub fn options(&self) -> ConvertOptions {
        let mut options = self.options.clone();
        if let Some(range) = &self.pages {
            options.page_numbers = Some(range.clone().collect());
        }
        options
    }

    fn load(&self) -> Result<SourceDocument> {
        match &self.input {
            Input::Document(document) => Ok(document.clone()),
            Input::Path(path) => SourceDocument::from_path(path).map_err(|e| {
                TableError::InvalidInput(format!("cannot read {}: {e}", path.display()))
            }),
        }
    }

    /// Cleaned table rows of the document.
    pub fn extract_rows(self) -> Result<Vec<TableRow>> {
        let input = self.load()?;
        extract_rows(&JsonFragmentDecoder, &input, &self.options())
    }

    /// The document as CSV text.
    pub fn convert_to_csv(self) -> Result<String> {
        let input = self.load()?;
        convert_to_csv(&JsonFragmentDecoder, &input, &self.options())
    }

    /// Converts the document and writes the CSV to `path`.
    ///
    /// The file is only created once conversion has succeeded.
    pub fn write_csv_file(self, path: impl AsRef<Path>) -> Result<()> {
        let csv = self.convert_to_csv()?;
        let path = path.as_ref();
        std::fs::write(path, csv).map_err(|e| TableError::Serialization {
            source: Box::new(e),
        })
    }

    /// Converts the document and streams the CSV into a new file at `path`.
    pub fn stream_csv_file(self, path: impl AsRef<Path>) -> Result<()> {
        let input = self.load()?;
        let options = self.options();
        let file = File::create(path.as_ref()).map_err(|e| TableError::Serialization {
            source: Box::new(e),
        })?;
        convert_to_writer(&JsonFragmentDecoder, &input, &options, BufWriter::new(file))
    }
}
