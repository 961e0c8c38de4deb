//! High-level table conversion API.
//!
//! Provides the main public API for turning a decoded document into CSV:
//! - `extract_page_tables()` - per-page layout, in page order
//! - `extract_raw_rows()` - aggregated rows of a document before cleanup
//! - `extract_rows()` - cleaned rows of a document
//! - `convert_to_csv()` - cleaned rows encoded as CSV text

use std::io::Write;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cleanup::clean;
use crate::error::{Result, TableError};
use crate::export::{serialize, write_csv};
use crate::source::{DecodedDocument, DecoderConfig, DocumentDecoder, SourceDocument};
use crate::table::{LayoutParams, PageTable, TableRow, layout_page};

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Options for table conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// Layout inference tolerances.
    pub layout: LayoutParams,

    /// Settings forwarded to the decoder when the document is opened.
    pub decoder: DecoderConfig,

    /// Zero-indexed page numbers to convert. None means all pages.
    pub page_numbers: Option<Vec<usize>>,

    /// Maximum number of pages to convert. 0 means no limit.
    pub maxpages: usize,

    /// Worker threads for page layout. None uses available parallelism;
    /// `Some(1)` processes pages serially.
    pub threads: Option<usize>,
}

/// Zero-indexed pages selected by `options`, in page order.
fn selected_pages(page_count: usize, options: &ConvertOptions) -> Vec<usize> {
    let limit = if options.maxpages > 0 {
        options.maxpages
    } else {
        usize::MAX
    };
    (0..page_count)
        .filter(|idx| {
            options
                .page_numbers
                .as_ref()
                .is_none_or(|nums| nums.contains(idx))
        })
        .take(limit)
        .collect()
}

fn process_page<D: DecodedDocument>(
    doc: &D,
    page_index: usize,
    layout: &LayoutParams,
) -> Result<PageTable> {
    let fragments = doc.page_fragments(page_index).map_err(|err| {
        if err.is_recoverable() {
            err
        } else {
            TableError::page_caused_by(page_index + 1, "page could not be decoded", err)
        }
    })?;
    Ok(layout_page(page_index, &fragments, layout))
}

/// Lay out every selected page of an opened document.
///
/// Pages are processed in parallel but returned in page order. A page whose
/// fragments cannot be retrieved is logged and skipped.
pub fn extract_page_tables<D: DecodedDocument>(
    doc: &D,
    options: &ConvertOptions,
) -> Vec<PageTable> {
    let pages = selected_pages(doc.page_count(), options);
    let thread_count = options.threads.unwrap_or_else(default_thread_count).max(1);
    let layout = &options.layout;

    let serial = |pages: Vec<usize>| -> Vec<(usize, Result<PageTable>)> {
        pages
            .into_iter()
            .map(|idx| (idx, process_page(doc, idx, layout)))
            .collect()
    };

    let mut results = if thread_count == 1 || pages.len() < 2 {
        serial(pages)
    } else {
        match ThreadPoolBuilder::new().num_threads(thread_count).build() {
            Ok(pool) => pool.install(|| {
                pages
                    .into_par_iter()
                    .map(|idx| (idx, process_page(doc, idx, layout)))
                    .collect()
            }),
            Err(err) => {
                warn!(error = %err, "could not start page workers, processing serially");
                serial(pages)
            }
        }
    };
    results.sort_by_key(|(idx, _)| *idx);

    results
        .into_iter()
        .filter_map(|(idx, result)| match result {
            Ok(table) => Some(table),
            Err(err) => {
                warn!(page = idx + 1, error = %err, "skipping page");
                None
            }
        })
        .collect()
}

/// Concatenate the rows of all pages, in page order.
pub fn aggregate_rows(tables: &[PageTable]) -> Vec<TableRow> {
    tables.iter().flat_map(|table| table.string_rows()).collect()
}

/// Validate a source document and open it with `decoder`.
pub fn open_document<D: DocumentDecoder>(
    decoder: &D,
    input: &SourceDocument,
    config: &DecoderConfig,
) -> Result<D::Document> {
    if input.data.is_empty() {
        return Err(TableError::InvalidInput(format!(
            "document {:?} is empty",
            input.name
        )));
    }
    if !decoder.accepts(&input.media_type) {
        return Err(TableError::InvalidInput(format!(
            "unsupported document type {:?}",
            input.media_type
        )));
    }
    decoder.open(&input.data, config)
}

/// Rows of a whole document before cleanup.
pub fn extract_raw_rows<D: DocumentDecoder>(
    decoder: &D,
    input: &SourceDocument,
    options: &ConvertOptions,
) -> Result<Vec<TableRow>> {
    let doc = open_document(decoder, input, &options.decoder)?;
    let tables = extract_page_tables(&doc, options);
    let rows = aggregate_rows(&tables);
    debug!(
        document = %input.name,
        pages = doc.page_count(),
        laid_out = tables.len(),
        rows = rows.len(),
        "aggregated document rows"
    );
    Ok(rows)
}

/// Cleaned rows of a whole document.
///
/// Fails with `NoTableData` when nothing survives cleanup.
///
/// # Example
/// ```ignore
/// use pdfgrid_core::high_level::{ConvertOptions, extract_rows};
/// use pdfgrid_core::source::{JsonFragmentDecoder, SourceDocument};
///
/// let input = SourceDocument::from_path("statement.json")?;
/// let rows = extract_rows(&JsonFragmentDecoder, &input, &ConvertOptions::default())?;
/// ```
pub fn extract_rows<D: DocumentDecoder>(
    decoder: &D,
    input: &SourceDocument,
    options: &ConvertOptions,
) -> Result<Vec<TableRow>> {
    let rows = clean(extract_raw_rows(decoder, input, options)?);
    if rows.is_empty() {
        return Err(TableError::NoTableData);
    }
    Ok(rows)
}

/// Convert a document to CSV text.
pub fn convert_to_csv<D: DocumentDecoder>(
    decoder: &D,
    input: &SourceDocument,
    options: &ConvertOptions,
) -> Result<String> {
    serialize(&extract_rows(decoder, input, options)?)
}

/// Convert a document and write the CSV to `out`.
pub fn convert_to_writer<D: DocumentDecoder, W: Write>(
    decoder: &D,
    input: &SourceDocument,
    options: &ConvertOptions,
    out: W,
) -> Result<()> {
    write_csv(&extract_rows(decoder, input, options)?, out)
}
