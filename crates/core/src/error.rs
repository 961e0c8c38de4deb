//! Error types for pdfgrid table reconstruction.

use thiserror::Error;

/// Boxed error raised by a document decoder, kept for diagnostic chaining.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Primary error type for table reconstruction.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load document: {message}")]
    DocumentLoad {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("failed to process page {page}: {message}")]
    PageProcessing {
        /// One-indexed page number.
        page: usize,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("no table data found in the document")]
    NoTableData,

    #[error("no rows to serialize")]
    EmptyInput,

    #[error("CSV encoding failed: {source}")]
    Serialization {
        #[source]
        source: BoxError,
    },
}

impl TableError {
    pub fn document_load(message: impl Into<String>) -> Self {
        TableError::DocumentLoad {
            message: message.into(),
            source: None,
        }
    }

    pub fn document_load_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TableError::DocumentLoad {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn page(page: usize, message: impl Into<String>) -> Self {
        TableError::PageProcessing {
            page,
            message: message.into(),
            source: None,
        }
    }

    pub fn page_caused_by(
        page: usize,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        TableError::PageProcessing {
            page,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Stable message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            TableError::InvalidInput(_) => "Invalid file provided",
            TableError::DocumentLoad { .. } => "Failed to load document",
            TableError::PageProcessing { .. } => "Failed to process a page of the document",
            TableError::NoTableData => "No table data found in the document",
            TableError::EmptyInput => "No data to convert to CSV",
            TableError::Serialization { .. } => "Failed to convert data to CSV format",
        }
    }

    /// Page failures are skipped by the aggregator; everything else aborts the document.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TableError::PageProcessing { .. })
    }
}

impl From<csv::Error> for TableError {
    fn from(source: csv::Error) -> Self {
        TableError::Serialization {
            source: Box::new(source),
        }
    }
}

/// Convenience Result type alias for TableError.
pub type Result<T> = std::result::Result<T, TableError>;
