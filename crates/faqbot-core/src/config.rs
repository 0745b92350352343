//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `FAQBOT_*` env vars (`__` separates nested keys, e.g.
//! `FAQBOT_MATCHER__THRESHOLD=0.4`). Provides helpers to expand `~` and
//! `${VAR}` and to resolve relative paths against the config directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_FALLBACK_ANSWER: &str = "I'm sorry, I couldn't find a relevant answer to your question. Please try rephrasing or contact our support team for assistance.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub matcher: MatcherSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherSettings {
    /// Minimum cosine similarity for a stored question to count as a match.
    pub threshold: f64,
    /// Answer returned when nothing reaches `threshold`.
    pub fallback_answer: String,
}

impl Default for CorpusSettings {
    fn default() -> Self { Self { path: "faqs.json".to_string() } }
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string() }
    }
}

impl MatcherSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!("matcher.threshold must be within [0, 1], got {}", self.threshold)));
        }
        if self.fallback_answer.trim().is_empty() {
            return Err(Error::InvalidConfig("matcher.fallback_answer must not be empty".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current directory using `RUST_ENV` (default `dev`).
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(base_dir: &Path) -> anyhow::Result<Self> {
        Self::load_for_env(base_dir, None)
    }

    pub fn load_for_env(base_dir: &Path, env: Option<&str>) -> anyhow::Result<Self> {
        let env_name = match env {
            Some(e) => e.to_string(),
            None => env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()),
        };

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("FAQBOT_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    pub fn matcher_settings(&self) -> anyhow::Result<MatcherSettings> {
        self.get("matcher")
    }

    /// Corpus file location, with `~`/env expansion and relative paths
    /// resolved against the directory the config was loaded from.
    pub fn corpus_path(&self) -> anyhow::Result<PathBuf> {
        let raw: String = self.get("corpus.path")?;
        Ok(resolve_with_base(&self.base_dir, raw))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.matcher.validate()?;
        if settings.corpus.path.trim().is_empty() {
            return Err(Error::InvalidConfig("corpus.path must not be empty".to_string()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
