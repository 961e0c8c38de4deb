//! Document decoder boundary.
//!
//! Decoding a binary document into positioned text fragments is the job of
//! an external decoder. The pipeline only talks to it through
//! [`DocumentDecoder`] and [`DecodedDocument`]. A JSON decoder is bundled for
//! documents that were decoded ahead of time.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TableError};
use crate::table::{FontStyle, TextFragment};

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Decoder settings, passed explicitly on every `open` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum fragments accepted per page; a page over the limit fails.
    /// 0 means no limit.
    pub max_fragments_per_page: usize,

    /// Skip individual fragments that cannot be decoded instead of failing
    /// their whole page.
    pub skip_malformed_fragments: bool,
}

/// A document handed to the converter by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Read a document from disk, guessing its media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type_for_path(path), data))
    }
}

/// Media type implied by a file extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => JSON_MEDIA_TYPE,
        Some("pdf") => PDF_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

/// An opened document whose pages can be decoded independently.
pub trait DecodedDocument: Sync {
    fn page_count(&self) -> usize;

    /// Fragments of one page, in no particular order.
    ///
    /// A failure here is page-local; the caller skips the page.
    fn page_fragments(&self, page_index: usize) -> Result<Vec<TextFragment>>;
}

/// Opens documents of the media types it accepts.
pub trait DocumentDecoder {
    type Document: DecodedDocument;

    fn accepts(&self, media_type: &str) -> bool;

    /// Open a whole document. Failing here aborts the conversion.
    fn open(&self, data: &[u8], config: &DecoderConfig) -> Result<Self::Document>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDocument {
    // Bare must be tried first: a struct variant also accepts a sequence.
    Bare(Vec<Value>),
    Paged { pages: Vec<Value> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireWeight {
    Number(f64),
    Name(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFragment {
    #[serde(alias = "str")]
    text: String,
    #[serde(default)]
    transform: Option<[f64; 6]>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default, alias = "fontName")]
    font_family: Option<String>,
    #[serde(default)]
    font_size: Option<f64>,
    #[serde(default)]
    font_weight: Option<WireWeight>,
}

impl WireFragment {
    fn into_fragment(self) -> std::result::Result<TextFragment, String> {
        let weight = match self.font_weight {
            Some(WireWeight::Number(n)) => n.to_string(),
            Some(WireWeight::Name(name)) => name,
            None => String::new(),
        };
        let style = FontStyle::new(
            self.font_family.as_deref().unwrap_or(""),
            self.font_size.unwrap_or(0.0),
            &weight,
        );
        match (self.x, self.y, self.transform) {
            (Some(x), Some(y), _) => Ok(TextFragment::new(self.text, x, y)
                .with_size(self.width, self.height)
                .with_style(style)),
            (_, _, Some(transform)) => Ok(TextFragment::from_transform(
                self.text,
                transform,
                self.width,
                self.height,
                style,
            )),
            _ => Err(format!("fragment {:?} has no position", self.text)),
        }
    }
}

/// Decoder for fragment dumps: either `{"pages": [[fragment, ...], ...]}`
/// or a bare array of pages.
///
/// Fragments accept `text`/`str`, either `x`+`y` or a six-element
/// `transform`, `width`, `height`, `fontFamily`/`fontName`, `fontSize` and
/// `fontWeight` (number or string).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFragmentDecoder;

/// A parsed fragment dump. Pages are decoded lazily so one malformed page
/// does not prevent the others from being read.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    pages: Vec<Value>,
    config: DecoderConfig,
}

impl DocumentDecoder for JsonFragmentDecoder {
    type Document = JsonDocument;

    fn accepts(&self, media_type: &str) -> bool {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        essence.eq_ignore_ascii_case(JSON_MEDIA_TYPE) || essence.ends_with("+json")
    }

    fn open(&self, data: &[u8], config: &DecoderConfig) -> Result<JsonDocument> {
        let wire: WireDocument = serde_json::from_slice(data)
            .map_err(|e| TableError::document_load_caused_by("not a fragment document", e))?;
        let pages = match wire {
            WireDocument::Paged { pages } => pages,
            WireDocument::Bare(pages) => pages,
        };
        Ok(JsonDocument {
            pages,
            config: config.clone(),
        })
    }
}

impl DecodedDocument for JsonDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, page_index: usize) -> Result<Vec<TextFragment>> {
        let page_no = page_index + 1;
        let page = self
            .pages
            .get(page_index)
            .ok_or_else(|| TableError::page(page_no, "page index out of range"))?;
        let items = page
            .as_array()
            .ok_or_else(|| TableError::page(page_no, "page is not a list of fragments"))?;

        let limit = self.config.max_fragments_per_page;
        if limit > 0 && items.len() > limit {
            return Err(TableError::page(
                page_no,
                format!("{} fragments exceed the limit of {}", items.len(), limit),
            ));
        }

        let mut fragments = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let decoded = WireFragment::deserialize(item)
                .map_err(|e| e.to_string())
                .and_then(WireFragment::into_fragment);
            match decoded {
                Ok(fragment) => fragments.push(fragment),
                Err(reason) if self.config.skip_malformed_fragments => {
                    debug!(page = page_no, fragment = idx, %reason, "skipping fragment");
                }
                Err(reason) => {
                    return Err(TableError::page(
                        page_no,
                        format!("fragment {idx}: {reason}"),
                    ));
                }
            }
        }
        Ok(fragments)
    }
}
