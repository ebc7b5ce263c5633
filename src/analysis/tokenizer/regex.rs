//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, TextmineError};

/// What the regex tokenizer emits for each line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegexReturn {
    /// One token per match, carrying the matched substring.
    #[default]
    Match,
    /// Exactly one token per line whose `matched` flag tells whether the
    /// pattern occurs in it. The token text is the whole line.
    Indicator,
}

/// A tokenizer that applies a regular expression to each line.
///
/// Used for structural markers such as chapter headings rather than words.
///
/// # Examples
///
/// ```
/// use textmine::analysis::tokenizer::Tokenizer;
/// use textmine::analysis::tokenizer::regex::{RegexReturn, RegexTokenizer};
///
/// let tokenizer = RegexTokenizer::new(r"(?i)^chapter [\divxlc]", RegexReturn::Indicator).unwrap();
/// assert!(tokenizer.is_match("CHAPTER XII"));
/// let token = tokenizer.tokenize("Emma Woodhouse").unwrap().next().unwrap();
/// assert_eq!(token.matched, Some(false));
/// ```
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
    regex_return: RegexReturn,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the pattern does not compile.
    pub fn new(pattern: &str, regex_return: RegexReturn) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| TextmineError::regex(pattern, e))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
            regex_return,
        })
    }

    /// Create a tokenizer that returns matched substrings.
    pub fn matches(pattern: &str) -> Result<Self> {
        Self::new(pattern, RegexReturn::Match)
    }

    /// Create a tokenizer that returns one match indicator per line.
    pub fn indicator(pattern: &str) -> Result<Self> {
        Self::new(pattern, RegexReturn::Indicator)
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Get the return mode.
    pub fn regex_return(&self) -> RegexReturn {
        self.regex_return
    }

    /// Check whether the pattern occurs in the line.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = match self.regex_return {
            RegexReturn::Match => self
                .pattern
                .find_iter(text)
                .enumerate()
                .map(|(position, mat)| {
                    Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
                })
                .collect(),
            RegexReturn::Indicator => {
                vec![Token::with_offsets(text, 0, 0, text.len()).with_matched(self.is_match(text))]
            }
        };

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
