//! Loading FAQ corpora from disk.
//!
//! The on-disk format is a JSON object with a `faqs` array:
//!
//! ```json
//! { "faqs": [ { "question": "What are your hours?", "answer": "9am-5pm" } ] }
//! ```

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::traits::CorpusSource;
use crate::types::{Corpus, CorpusEntry};

#[derive(Debug, Deserialize)]
struct FaqFile {
    faqs: Vec<CorpusEntry>,
}

#[derive(Debug, Clone)]
pub struct JsonFileCorpus {
    path: PathBuf,
}

impl JsonFileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// Parse the contents of a FAQ file. Entry order is kept as written.
    pub fn parse(content: &str) -> Result<Corpus> {
        let file: FaqFile = serde_json::from_str(content).map_err(|e| Error::MalformedCorpus(e.to_string()))?;
        Ok(Corpus::new(file.faqs))
    }

    fn read_file_content(&self) -> Result<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(self.path.display().to_string())),
            Err(e) => Err(Error::MalformedCorpus(format!("failed to read {}: {}", self.path.display(), e))),
        }
    }
}

impl CorpusSource for JsonFileCorpus {
    fn load(&self) -> Result<Corpus> {
        debug!(path = %self.path.display(), "reading faq corpus");
        let content = self.read_file_content()?;
        let corpus = Self::parse(&content).map_err(|e| match e {
            Error::MalformedCorpus(msg) => Error::MalformedCorpus(format!("{}: {}", self.path.display(), msg)),
            other => other,
        })?;
        info!(path = %self.path.display(), entries = corpus.len(), "loaded faq corpus");
        Ok(corpus)
    }
}
