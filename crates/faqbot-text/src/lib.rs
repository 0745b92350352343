//! faqbot-text
//!
//! Text normalization and TF-IDF matching of free-text questions against a
//! FAQ corpus. Tokenization runs through a tantivy analyzer so stored
//! questions and live queries are processed identically.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod tantivy_utils;
pub mod normalize;
pub mod vectorize;
pub mod matcher;

pub use matcher::TfIdfMatcher;
pub use normalize::TextNormalizer;
