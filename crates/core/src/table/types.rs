//! Table reconstruction types.

use ordered_float::OrderedFloat;
use smol_str::SmolStr;

/// Composite font key: family, size and weight.
///
/// Used as a map key when counting styles, so it hashes on the exact size
/// bits through `OrderedFloat` rather than on a formatted string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub family: SmolStr,
    pub size: OrderedFloat<f64>,
    pub weight: SmolStr,
}

impl FontStyle {
    pub fn new(family: &str, size: f64, weight: &str) -> Self {
        Self {
            family: SmolStr::new(family),
            size: OrderedFloat(size),
            weight: SmolStr::new(weight),
        }
    }

    pub fn font_size(&self) -> f64 {
        self.size.0
    }
}

/// Dominant style of a page's header row.
pub type HeaderStyle = FontStyle;

/// One positioned span of text produced by a document decoder.
///
/// `x`/`y` is the baseline origin with `y` growing upward, so rows near
/// the top of a page have the largest `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: FontStyle,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            height: 0.0,
            style: FontStyle::default(),
        }
    }

    /// Build a fragment from a text-space transform `[a, b, c, d, e, f]`;
    /// the translation components `e`/`f` are the baseline origin.
    pub fn from_transform(
        text: impl Into<String>,
        transform: [f64; 6],
        width: f64,
        height: f64,
        style: FontStyle,
    ) -> Self {
        Self {
            text: text.into(),
            x: transform[4],
            y: transform[5],
            width,
            height,
            style,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn font_family(&self) -> &str {
        &self.style.family
    }

    pub fn font_size(&self) -> f64 {
        self.style.font_size()
    }

    pub fn font_weight(&self) -> &str {
        &self.style.weight
    }

    /// Right edge of the rendered text.
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }

    pub(crate) fn has_finite_geometry(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}

/// Text merged from one or more fragments.
///
/// Carries the style of its first constituent fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub x: f64,
    pub width: f64,
    pub style: FontStyle,
}

impl Cell {
    pub fn from_fragment(fragment: &TextFragment) -> Self {
        Self {
            text: fragment.text.clone(),
            x: fragment.x,
            width: fragment.width,
            style: fragment.style.clone(),
        }
    }

    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }
}

/// Fragments sharing one rounded baseline.
#[derive(Clone, Debug)]
pub struct Band<'a> {
    pub y: i64,
    pub fragments: Vec<&'a TextFragment>,
}

/// A finalized vertical band of fragments believed to form one table row.
///
/// `y` is the key of the band that opened the row; later bands are merged
/// in when they fall within the row-height threshold of it.
#[derive(Clone, Debug)]
pub struct Row<'a> {
    pub y: f64,
    pub bands: Vec<Band<'a>>,
}

impl<'a> Row<'a> {
    pub fn fragments(&self) -> impl Iterator<Item = &'a TextFragment> + '_ {
        self.bands.iter().flat_map(|band| band.fragments.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.bands.iter().all(|band| band.fragments.is_empty())
    }
}

/// Final row: one string per column anchor, in column order.
pub type TableRow = Vec<String>;

/// Round half up, matching how decoders quantize baselines.
pub(crate) fn round_coord(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}
