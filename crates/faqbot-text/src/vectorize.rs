//! TF-IDF term vectors fitted jointly over a small document set.
//!
//! Weighting:
//! - `tf`: raw count of the term in the document
//! - `idf`: smoothed, `ln((1 + n) / (1 + df)) + 1`, where `n` is the number
//!   of documents in the set and `df` the number containing the term
//! - each document vector is L2-normalized
//!
//! Only whitespace-separated terms of two or more characters enter the
//! vocabulary.

use std::collections::BTreeMap;

/// Sparse term-weight vector; entries are sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    fn from_counts(counts: &BTreeMap<usize, usize>, idf: &[f64]) -> Self {
        let mut entries: Vec<(usize, f64)> = counts.iter().map(|(&term, &tf)| (term, tf as f64 * idf[term])).collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries { *w /= norm; }
        }
        Self { entries }
    }

    pub fn is_zero(&self) -> bool { self.entries.iter().all(|(_, w)| *w == 0.0) }

    pub fn norm(&self) -> f64 { self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt() }

    /// Weight of `term`, zero when absent.
    pub fn weight(&self, term: usize) -> f64 {
        self.entries.binary_search_by_key(&term, |(t, _)| *t).map_or(0.0, |i| self.entries[i].1)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => { acc += wa * wb; i += 1; j += 1; }
            }
        }
        acc
    }
}

/// Cosine of the angle between `a` and `b`, in `[0, 1]` for these
/// non-negative vectors. Zero when either vector has no magnitude.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 { return 0.0; }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Vocabulary, IDF weights and one vector per input document.
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<TermVector>,
}

impl TfIdfMatrix {
    /// Fit the vocabulary on `documents` and vectorize each of them.
    /// Row `i` corresponds to `documents[i]`.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<&str>> = documents.iter().map(|d| vector_terms(d.as_ref()).collect()).collect();

        let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &tokenized {
            for t in terms { vocabulary.entry((*t).to_string()).or_insert(0); }
        }
        // ids follow sorted term order
        for (id, slot) in vocabulary.values_mut().enumerate() { *slot = id; }

        let counts: Vec<BTreeMap<usize, usize>> = tokenized
            .iter()
            .map(|terms| {
                let mut c = BTreeMap::new();
                for t in terms {
                    if let Some(&id) = vocabulary.get(*t) { *c.entry(id).or_insert(0) += 1; }
                }
                c
            })
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for c in &counts {
            for &id in c.keys() { df[id] += 1; }
        }
        let n = documents.len() as f64;
        let idf: Vec<f64> = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();

        let rows = counts.iter().map(|c| TermVector::from_counts(c, &idf)).collect();
        Self { vocabulary, idf, rows }
    }

    pub fn rows(&self) -> &[TermVector] { &self.rows }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }

    pub fn term_id(&self, term: &str) -> Option<usize> { self.vocabulary.get(term).copied() }

    pub fn idf(&self, term: &str) -> Option<f64> { self.term_id(term).map(|id| self.idf[id]) }
}

fn vector_terms(doc: &str) -> impl Iterator<Item = &str> {
    doc.split_whitespace().filter(|t| t.chars().count() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    #[test]
    fn smoothed_idf_weights() {
        let m = TfIdfMatrix::fit_transform(&["reset password", "change password", "reset password please"]);
        assert_eq!(m.vocabulary_len(), 4);
        assert!(approx(m.idf("password").unwrap(), 1.0), "term in every doc gets idf 1");
        assert!(approx(m.idf("reset").unwrap(), (4.0f64 / 3.0).ln() + 1.0));
        assert!(approx(m.idf("change").unwrap(), 2.0f64.ln() + 1.0));
        assert_eq!(m.idf("missing"), None);
    }

    #[test]
    fn rows_are_unit_length() {
        let m = TfIdfMatrix::fit_transform(&["alpha beta beta", "beta gamma", ""]);
        assert!(approx(m.rows()[0].norm(), 1.0));
        assert!(approx(m.rows()[1].norm(), 1.0));
        assert!(m.rows()[2].is_zero());
        let beta = m.term_id("beta").unwrap();
        let alpha = m.term_id("alpha").unwrap();
        // beta: tf 2 but shared with doc 1; alpha: tf 1 and unique
        assert!(m.rows()[0].weight(beta) > m.rows()[0].weight(alpha));
        assert_eq!(m.rows()[1].weight(alpha), 0.0);
    }

    #[test]
    fn single_character_terms_are_ignored() {
        let m = TfIdfMatrix::fit_transform(&["a b c", "x yz"]);
        assert_eq!(m.vocabulary_len(), 1);
        assert!(m.rows()[0].is_zero());
    }

    #[test]
    fn cosine_edges() {
        let m = TfIdfMatrix::fit_transform(&["apple pie", "apple pie", "banana", ""]);
        let r = m.rows();
        assert!(approx(cosine_similarity(&r[0], &r[1]), 1.0));
        assert_eq!(cosine_similarity(&r[0], &r[2]), 0.0);
        assert_eq!(cosine_similarity(&r[0], &r[3]), 0.0);
        assert_eq!(cosine_similarity(&r[3], &r[3]), 0.0);
    }

    #[test]
    fn empty_document_set() {
        let docs: [&str; 0] = [];
        let m = TfIdfMatrix::fit_transform(&docs);
        assert_eq!(m.vocabulary_len(), 0);
        assert!(m.rows().is_empty());
    }
}
