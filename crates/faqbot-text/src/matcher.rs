use tracing::debug;

use faqbot_core::config::MatcherSettings;
use faqbot_core::error::{Error, Result};
use faqbot_core::traits::{CorpusSource, Matcher};
use faqbot_core::types::{Corpus, MatchResult, ScoredEntry};

use crate::normalize::TextNormalizer;
use crate::vectorize::{cosine_similarity, TfIdfMatrix};

/// FAQ matcher over an immutable corpus snapshot.
///
/// Every call fits a fresh TF-IDF vocabulary over the corpus questions plus
/// the query, so query terms always take part in the IDF statistics. This
/// costs O(corpus x vocabulary) per call and is meant for small FAQ sets.
/// Normalized questions are computed once at construction; normalization is
/// deterministic so this does not change any score.
#[derive(Clone)]
pub struct TfIdfMatcher {
    corpus: Corpus,
    normalized_questions: Vec<String>,
    normalizer: TextNormalizer,
    settings: MatcherSettings,
}

impl TfIdfMatcher {
    /// Matcher with the default threshold (0.3) and fallback answer.
    pub fn new(corpus: Corpus) -> Self {
        Self::build(corpus, MatcherSettings::default())
    }

    pub fn with_settings(corpus: Corpus, settings: MatcherSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(corpus, settings))
    }

    pub fn from_source(source: &dyn CorpusSource, settings: MatcherSettings) -> Result<Self> {
        Self::with_settings(source.load()?, settings)
    }

    fn build(corpus: Corpus, settings: MatcherSettings) -> Self {
        let normalizer = TextNormalizer::new();
        let normalized_questions = corpus.questions().map(|q| normalizer.normalize(q)).collect();
        Self { corpus, normalized_questions, normalizer, settings }
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn settings(&self) -> &MatcherSettings { &self.settings }

    pub fn normalizer(&self) -> &TextNormalizer { &self.normalizer }

    pub fn normalized_questions(&self) -> &[String] { &self.normalized_questions }

    /// Cosine similarity of `query` against every corpus question, in corpus
    /// order. Empty for an empty corpus.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        if self.corpus.is_empty() { return Vec::new(); }
        let mut documents: Vec<&str> = self.normalized_questions.iter().map(String::as_str).collect();
        let normalized_query = self.normalizer.normalize(query);
        documents.push(&normalized_query);

        let matrix = TfIdfMatrix::fit_transform(documents.as_slice());
        let (query_vec, question_vecs) = match matrix.rows().split_last() {
            Some(split) => split,
            None => return Vec::new(),
        };
        debug!(query = %normalized_query, vocabulary = matrix.vocabulary_len(), "vectorized query");
        question_vecs.iter().map(|v| cosine_similarity(query_vec, v)).collect()
    }
}

/// Index and score of the first maximum.
fn first_best(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if b >= s => {}
            _ => best = Some((i, s)),
        }
    }
    best
}

impl Matcher for TfIdfMatcher {
    fn find_best_match(&self, query: &str, threshold: Option<f64>) -> Result<MatchResult> {
        let threshold = match threshold {
            Some(t) if !t.is_finite() => {
                return Err(Error::InvalidInput(format!("threshold must be a finite number, got {t}")))
            }
            Some(t) => t,
            None => self.settings.threshold,
        };

        let scores = self.scores(query);
        let best = first_best(&scores);
        let score = best.map_or(0.0, |(_, s)| s);
        debug!(best_index = ?best.map(|(i, _)| i), score, threshold, "scored faq corpus");

        if let Some((index, s)) = best.filter(|(_, s)| *s >= threshold) {
            if let Some(entry) = self.corpus.get(index) {
                return Ok(MatchResult { answer: entry.answer.clone(), score: s, matched_question: Some(entry.question.clone()) });
            }
        }
        Ok(MatchResult { answer: self.settings.fallback_answer.clone(), score, matched_question: None })
    }

    fn rank(&self, query: &str, k: usize) -> Vec<ScoredEntry> {
        let mut ranked: Vec<ScoredEntry> = self
            .scores(query)
            .into_iter()
            .enumerate()
            .map(|(index, score)| ScoredEntry { index, score })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
        ranked.truncate(k);
        ranked
    }
}
