//! Row clustering by baseline position.
//!
//! Fragments are bucketed by rounded baseline, the buckets are walked top to
//! bottom, and neighbouring buckets closer than an adaptive row-height
//! threshold are folded into the same row.

use indexmap::IndexMap;
use tracing::debug;

use super::params::LayoutParams;
use super::types::{Band, Row, TextFragment, round_coord};

/// Group fragments into bands keyed by rounded `y`, sorted top to bottom.
///
/// Within a band fragments keep their arrival order.
pub(crate) fn bucket_fragments<'a, I>(fragments: I) -> Vec<Band<'a>>
where
    I: IntoIterator<Item = &'a TextFragment>,
{
    let mut buckets: IndexMap<i64, Vec<&'a TextFragment>> = IndexMap::new();
    for fragment in fragments {
        buckets
            .entry(round_coord(fragment.y))
            .or_default()
            .push(fragment);
    }
    let mut bands: Vec<Band<'a>> = buckets
        .into_iter()
        .map(|(y, fragments)| Band { y, fragments })
        .collect();
    bands.sort_by(|a, b| b.y.cmp(&a.y));
    bands
}

/// Adaptive vertical tolerance for a page.
///
/// One `divisor`-th of the median positive spacing between consecutive
/// band keys; `default` when there is nothing to measure. For an even
/// number of spacings the upper median is used.
pub fn row_threshold(sorted_keys: &[i64], default: f64, divisor: f64) -> f64 {
    if sorted_keys.len() < 2 {
        return default;
    }
    // keys saturate at the i64 bounds for extreme baselines
    let mut gaps: Vec<u64> = sorted_keys
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]))
        .filter(|gap| *gap > 0)
        .collect();
    if gaps.is_empty() {
        return default;
    }
    gaps.sort_unstable();
    gaps[gaps.len() / 2] as f64 / divisor
}

/// Row being accumulated while walking bands top to bottom.
struct OpenRow<'a> {
    anchor_y: f64,
    bands: Vec<Band<'a>>,
}

impl<'a> OpenRow<'a> {
    fn open(band: Band<'a>) -> Self {
        Self {
            anchor_y: band.y as f64,
            bands: vec![band],
        }
    }

    /// Either absorb `band`, or close this row and open a new one with it.
    fn accept(mut self, band: Band<'a>, threshold: f64) -> (Option<Row<'a>>, OpenRow<'a>) {
        if (band.y as f64 - self.anchor_y).abs() <= threshold {
            self.bands.push(band);
            (None, self)
        } else {
            (Some(self.close()), OpenRow::open(band))
        }
    }

    fn close(self) -> Row<'a> {
        Row {
            y: self.anchor_y,
            bands: self.bands,
        }
    }
}

/// Groups the fragments of one page into rows.
#[derive(Debug, Clone)]
pub struct RowClusterer {
    default_threshold: f64,
    divisor: f64,
}

impl RowClusterer {
    pub fn new(params: &LayoutParams) -> Self {
        Self {
            default_threshold: params.default_row_threshold,
            divisor: params.row_threshold_divisor,
        }
    }

    /// Threshold this clusterer would use for the given sorted band keys.
    pub fn threshold(&self, sorted_keys: &[i64]) -> f64 {
        row_threshold(sorted_keys, self.default_threshold, self.divisor)
    }

    /// Cluster fragments into rows ordered top of page first.
    pub fn cluster<'a, I>(&self, fragments: I) -> Vec<Row<'a>>
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        let bands = bucket_fragments(fragments);
        let keys: Vec<i64> = bands.iter().map(|band| band.y).collect();
        let threshold = self.threshold(&keys);
        debug!(bands = bands.len(), threshold, "clustering rows");

        let (mut rows, open) = bands.into_iter().fold(
            (Vec::new(), None::<OpenRow<'a>>),
            |(mut rows, open), band| match open {
                None => (rows, Some(OpenRow::open(band))),
                Some(open) => {
                    let (closed, open) = open.accept(band, threshold);
                    rows.extend(closed);
                    (rows, Some(open))
                }
            },
        );
        rows.extend(open.map(OpenRow::close));
        rows
    }
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self::new(&LayoutParams::default())
    }
}
