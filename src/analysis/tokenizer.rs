//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split one normalized line into tokens. The set of tokenization
//! modes is closed and described by [`TokenizerMode`], which builds the
//! matching tokenizer:
//!
//! - [`word::WordTokenizer`] - single words on Unicode word boundaries
//! - [`ngram::NgramTokenizer`] - sliding windows of `n` consecutive words
//! - [`regex::RegexTokenizer`] - regex matches or a per-line match indicator
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::tokenizer::{Tokenizer, TokenizerMode};
//!
//! let tokenizer = TokenizerMode::Ngram { n: 2 }.build().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("the cat sat").unwrap().map(|t| t.text).collect();
//! assert_eq!(tokens, vec!["the cat", "cat sat"]);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::{Result, TextmineError};

/// Trait for tokenizers that convert one line of text into tokens.
///
/// The trait requires `Send + Sync` so a built tokenizer can be shared
/// behind an `Arc` by every document of a corpus.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given line into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod ngram;
pub mod regex;
pub mod word;

pub use ngram::NgramTokenizer;
pub use regex::{RegexReturn, RegexTokenizer};
pub use word::WordTokenizer;

/// The closed set of tokenization modes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TokenizerMode {
    /// One token per word.
    #[default]
    Word,
    /// One token per window of `n` consecutive words within a line.
    Ngram { n: usize },
    /// One token per regex match, or one indicator per line.
    Regex {
        pattern: String,
        #[serde(rename = "return", default)]
        regex_return: RegexReturn,
    },
}

impl TokenizerMode {
    /// Build the tokenizer for this mode, validating its parameters.
    pub fn build(&self) -> Result<Arc<dyn Tokenizer>> {
        Ok(match self {
            TokenizerMode::Word => Arc::new(WordTokenizer::new()),
            TokenizerMode::Ngram { n } => Arc::new(NgramTokenizer::new(*n)?),
            TokenizerMode::Regex {
                pattern,
                regex_return,
            } => Arc::new(RegexTokenizer::new(pattern, *regex_return)?),
        })
    }
}

impl FromStr for TokenizerMode {
    type Err = TextmineError;

    /// Parse `word`, `ngram:<n>` (bare `ngram` means bigrams) or `regex:<pattern>`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match (name, arg) {
            ("word", None) => Ok(TokenizerMode::Word),
            ("ngram", None) => Ok(TokenizerMode::Ngram { n: 2 }),
            ("ngram", Some(n)) => {
                let n = n.parse::<usize>().map_err(|_| {
                    TextmineError::invalid_config(format!("n-gram size {n:?} is not a number"))
                })?;
                Ok(TokenizerMode::Ngram { n })
            }
            ("regex", Some(pattern)) if !pattern.is_empty() => Ok(TokenizerMode::Regex {
                pattern: pattern.to_string(),
                regex_return: RegexReturn::Match,
            }),
            _ => Err(TextmineError::invalid_config(format!(
                "unknown tokenization mode {s:?} (expected word, ngram:<n> or regex:<pattern>)"
            ))),
        }
    }
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerMode::Word => write!(f, "word"),
            TokenizerMode::Ngram { n } => write!(f, "ngram:{n}"),
            TokenizerMode::Regex { pattern, .. } => write!(f, "regex:{pattern}"),
        }
    }
}
