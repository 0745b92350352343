//! Domain types shared by the matcher, the corpus loaders and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};

/// One stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub question: String,
    pub answer: String,
}

impl CorpusEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// Ordered, immutable snapshot of FAQ entries.
///
/// Cloning shares the underlying entries, so a single snapshot can back any
/// number of matchers and threads. The position of an entry is the index
/// reported in [`ScoredEntry::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    entries: Arc<[CorpusEntry]>,
}

impl Corpus {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self { entries: entries.into() }
    }

    pub fn entries(&self) -> &[CorpusEntry] { &self.entries }

    pub fn get(&self, index: usize) -> Option<&CorpusEntry> { self.entries.get(index) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn questions(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.question.as_str())
    }
}

impl Default for Corpus {
    fn default() -> Self { Self::new(Vec::new()) }
}

impl FromIterator<CorpusEntry> for Corpus {
    fn from_iter<I: IntoIterator<Item = CorpusEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Outcome of a single match call.
///
/// `matched_question` is `None` when the best score stayed below the
/// threshold; `answer` then carries the fallback message. A missing match is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub answer: String,
    pub score: f64,
    pub matched_question: Option<String>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool { self.matched_question.is_some() }
}

/// A corpus entry scored against one query. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub index: usize,
    pub score: f64,
}

/// A chat request as received at the process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl ChatRequest {
    /// Parse one JSON document (e.g. a line of a JSONL stream).
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::InvalidInput(format!("request is not valid JSON: {e}")))?;
        Self::from_json(&value)
    }

    /// Validate a loosely-shaped JSON request.
    ///
    /// `question` must be a non-blank string; `threshold`, when present and
    /// not null, must be a number.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::InvalidInput("request must be a JSON object".to_string()))?;
        let question = match obj.get("question") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return Err(Error::InvalidInput("missing 'question'".to_string())),
            Some(other) => {
                return Err(Error::InvalidInput(format!("'question' must be a string, got {other}")))
            }
        };
        if question.trim().is_empty() {
            return Err(Error::InvalidInput("Please enter a question".to_string()));
        }
        let threshold = match obj.get("threshold") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(other) => {
                return Err(Error::InvalidInput(format!("'threshold' must be a number, got {other}")))
            }
        };
        Ok(Self { question, threshold })
    }
}

/// Wire shape of a chat reply; `confidence` is the similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub confidence: f64,
    pub matched_question: Option<String>,
}

impl From<MatchResult> for ChatResponse {
    fn from(r: MatchResult) -> Self {
        Self { answer: r.answer, confidence: r.score, matched_question: r.matched_question }
    }
}
