use pdfgrid_core::table::{FontStyle, TextFragment};

/// Seeded splitmix64 stream for reproducible page noise.
#[derive(Debug, Clone)]
pub struct PageNoise(u64);

impl PageNoise {
    pub fn seeded(seed: u64) -> Self {
        Self(seed)
    }

    fn next_bits(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform offset in `[-amplitude, amplitude]`.
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        let unit = (self.next_bits() >> 11) as f64 / (1u64 << 53) as f64;
        amplitude * (2.0 * unit - 1.0)
    }

    /// Uniform index in `0..=max`.
    pub fn index_up_to(&mut self, max: usize) -> usize {
        (self.next_bits() % (max as u64 + 1)) as usize
    }
}

/// A page laid out as a `rows` x `columns` grid with sub-unit jitter,
/// a bold header row and a page number, shuffled like decoder output.
pub fn grid_page(noise: &mut PageNoise, rows: usize, columns: usize) -> Vec<TextFragment> {
    let header = FontStyle::new("Helvetica-Bold", 9.0, "700");
    let body = FontStyle::new("Helvetica", 9.0, "400");
    let mut fragments = Vec::with_capacity(rows * columns + 1);
    for r in 0..rows {
        let y = 760.0 - 14.0 * r as f64;
        for c in 0..columns {
            let x = 36.0 + 90.0 * c as f64 + noise.jitter(0.8);
            let style = if r == 0 { header.clone() } else { body.clone() };
            fragments.push(
                TextFragment::new(format!("r{r}c{c}"), x, y + noise.jitter(0.4))
                    .with_size(40.0, 9.0)
                    .with_style(style),
            );
        }
    }
    fragments.push(TextFragment::new("1", 300.0, 30.0).with_size(5.0, 8.0));

    for i in (1..fragments.len()).rev() {
        let j = noise.index_up_to(i);
        fragments.swap(i, j);
    }
    fragments
}

/// A fragment document in the bundled JSON format.
pub fn grid_document_json(pages: &[Vec<TextFragment>]) -> String {
    let pages: Vec<serde_json::Value> = pages
        .iter()
        .map(|page| {
            page.iter()
                .map(|f| {
                    serde_json::json!({
                        "text": f.text,
                        "x": f.x,
                        "y": f.y,
                        "width": f.width,
                        "height": f.height,
                        "fontFamily": f.font_family(),
                        "fontSize": f.font_size(),
                        "fontWeight": f.font_weight(),
                    })
                })
                .collect()
        })
        .collect();
    serde_json::json!({ "pages": pages }).to_string()
}
