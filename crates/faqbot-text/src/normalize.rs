//! Text normalization applied identically to stored questions and queries.

use tantivy::tokenizer::{TextAnalyzer, TokenStream};

use crate::tantivy_utils::build_analyzer;

/// Fused words split into two tokens before stopword removal, so that
/// `cannot` filters like `can not`.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("cannot", "can not"),
    ("gimme", "gim me"),
    ("gonna", "gon na"),
    ("gotta", "got ta"),
    ("lemme", "lem me"),
    ("wanna", "wan na"),
];

/// Lowercases, strips ASCII punctuation, tokenizes and removes English
/// stopwords. Surviving tokens keep their original order.
///
/// Punctuation is deleted rather than replaced by a space, so `"9am-5pm"`
/// becomes the single token `9am5pm` and `"don't"` becomes `dont`.
#[derive(Clone)]
pub struct TextNormalizer {
    analyzer: TextAnalyzer,
}

impl Default for TextNormalizer {
    fn default() -> Self { Self { analyzer: build_analyzer() } }
}

impl TextNormalizer {
    pub fn new() -> Self { Self::default() }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned: String = text.to_lowercase().chars().filter(|c| !c.is_ascii_punctuation()).collect();
        let cleaned = split_contractions(&cleaned);
        // token_stream needs &mut; a per-call clone keeps the normalizer shareable across threads
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(&cleaned);
        let mut tokens = Vec::new();
        while stream.advance() {
            tokens.push(stream.token().text.clone());
        }
        tokens
    }

    /// Space-joined [`tokens`](Self::tokens); empty when nothing survives.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

/// Rewrite whole alphanumeric words found in [`CONTRACTIONS`]; everything
/// else is copied through unchanged.
fn split_contractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut word = String::new();
    let flush = |word: &mut String, out: &mut String| {
        match CONTRACTIONS.iter().find(|(fused, _)| *fused == word.as_str()) {
            Some((_, split)) => out.push_str(split),
            None => out.push_str(word),
        }
        word.clear();
    };
    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}
