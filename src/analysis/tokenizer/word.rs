//! Word tokenizer implementation.
//!
//! Splits a line on Unicode word boundaries (UAX #29) and drops the
//! punctuation and whitespace segments, so `don't` stays one word while
//! `heart-break` yields two.
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::tokenizer::Tokenizer;
//! use textmine::analysis::tokenizer::word::WordTokenizer;
//!
//! let tokenizer = WordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens[0].text, "Hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that emits one token per word.
#[derive(Clone, Debug, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new word tokenizer.
    pub fn new() -> Self {
        WordTokenizer
    }

    /// Split a line into words without building tokens.
    pub(crate) fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
        text.unicode_word_indices()
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = Self::words(text)
            .enumerate()
            .map(|(position, (offset, word))| {
                Token::with_offsets(word, position, offset, offset + word.len())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "word"
    }
}
