//! Word n-gram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::word::WordTokenizer;
use crate::error::{Result, TextmineError};

/// A tokenizer that emits every window of `n` consecutive words in a line.
///
/// Windows never cross line boundaries; a line with fewer than `n` words
/// produces no tokens at all.
///
/// # Examples
///
/// ```
/// use textmine::analysis::tokenizer::ngram::NgramTokenizer;
/// use textmine::analysis::tokenizer::Tokenizer;
///
/// let tokenizer = NgramTokenizer::bigram();
/// let tokens: Vec<_> = tokenizer.tokenize("the cat sat").unwrap().collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].parts, vec!["the", "cat"]);
/// assert_eq!(tokens[1].text, "cat sat");
///
/// assert_eq!(tokenizer.tokenize("hi").unwrap().count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct NgramTokenizer {
    n: usize,
}

impl NgramTokenizer {
    /// Create a new n-gram tokenizer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `n` is 0.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(TextmineError::invalid_config("n-gram size must be at least 1"));
        }
        Ok(Self { n })
    }

    /// Create a bigram tokenizer (n=2).
    pub fn bigram() -> Self {
        Self { n: 2 }
    }

    /// Create a trigram tokenizer (n=3).
    pub fn trigram() -> Self {
        Self { n: 3 }
    }

    /// The window size.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl Tokenizer for NgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let words: Vec<(usize, &str)> = WordTokenizer::words(text).collect();

        let tokens: Vec<Token> = words
            .windows(self.n)
            .enumerate()
            .map(|(position, window)| {
                let (start, _) = window[0];
                let (last_start, last) = window[window.len() - 1];
                let parts = window.iter().map(|(_, w)| w.to_string()).collect();
                Token::ngram(parts, position, start, last_start + last.len())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}
