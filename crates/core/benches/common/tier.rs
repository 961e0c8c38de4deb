use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

pub fn bench_tier() -> BenchTier {
    match env::var("PDFGRID_BENCH_TIER").as_deref() {
        Ok("full") => BenchTier::Full,
        _ => BenchTier::Quick,
    }
}

impl BenchTier {
    /// Synthetic pages per document for this tier.
    pub fn page_count(self) -> usize {
        match self {
            BenchTier::Quick => 16,
            BenchTier::Full => 128,
        }
    }
}
