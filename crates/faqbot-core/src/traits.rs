use crate::error::Result;
use crate::types::{Corpus, MatchResult, ScoredEntry};

/// Supplies the corpus snapshot once at startup.
pub trait CorpusSource {
    fn load(&self) -> Result<Corpus>;
}

impl CorpusSource for Corpus {
    fn load(&self) -> Result<Corpus> { Ok(self.clone()) }
}

pub trait Matcher: Send + Sync {
    /// Best entry for `query`, or the fallback answer when nothing reaches
    /// `threshold` (the matcher's configured default when `None`).
    fn find_best_match(&self, query: &str, threshold: Option<f64>) -> Result<MatchResult>;

    /// Up to `k` entries, best first; ties keep corpus order.
    fn rank(&self, query: &str, k: usize) -> Vec<ScoredEntry>;
}
