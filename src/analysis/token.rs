//! Token types for the analysis pipeline.
//!
//! Two shapes flow through the pipeline:
//!
//! - [`Token`] - what a tokenizer produces for a single line of text: the
//!   token text, its position within the line, byte offsets and, for n-grams,
//!   the constituent words.
//! - [`TokenRecord`] - a row of the token table: a token tagged with the line
//!   number, chapter and feature key of the document it came from.
//!
//! A [`TokenTable`] is the materialized, restartable sequence of records
//! handed from the filter stage to the aggregator.
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert!(!token.is_ngram());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single unit of text produced by a tokenizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text. For n-grams this is the space-joined display form.
    pub text: String,

    /// The position of the token within its line (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the line
    pub start_offset: usize,

    /// The byte offset where this token ends in the line
    pub end_offset: usize,

    /// Constituent words of an n-gram (token_1..token_n); empty for words.
    pub parts: Vec<String>,

    /// Match indicator emitted by the regex tokenizer in indicator mode.
    pub matched: Option<bool>,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            parts: Vec::new(),
            matched: None,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            start_offset,
            end_offset,
            ..Token::new(text, position)
        }
    }

    /// Create an n-gram token whose display text is the space-joined parts.
    pub fn ngram(parts: Vec<String>, position: usize, start_offset: usize, end_offset: usize) -> Self {
        Token {
            text: parts.join(" "),
            position,
            start_offset,
            end_offset,
            parts,
            matched: None,
        }
    }

    /// Set the match indicator.
    pub fn with_matched(mut self, matched: bool) -> Self {
        self.matched = Some(matched);
        self
    }

    /// Check whether this token is an n-gram.
    pub fn is_ngram(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream is the per-line output of a tokenizer.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// A row of the token table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Line number in the source document (1-based)
    pub line: usize,

    /// Chapter index of the line (0 for front matter)
    pub chapter: usize,

    /// Feature key of the document (e.g. a book title)
    pub feature: Option<Arc<str>>,

    /// The token text (display form for n-grams)
    pub word: String,

    /// Constituent words of an n-gram; empty for words and regex matches
    pub parts: Vec<String>,

    /// Regex indicator value, when produced in indicator mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
}

impl TokenRecord {
    /// Create a record for a bare word, outside of any document.
    pub fn word<S: Into<String>>(word: S, line: usize) -> Self {
        TokenRecord {
            line,
            chapter: 0,
            feature: None,
            word: word.into(),
            parts: Vec::new(),
            matched: None,
        }
    }

    /// Tag a tokenizer token with its source line.
    pub fn from_token(token: Token, line: usize, chapter: usize, feature: Option<Arc<str>>) -> Self {
        TokenRecord {
            line,
            chapter,
            feature,
            word: token.text,
            parts: token.parts,
            matched: token.matched,
        }
    }

    /// Set the feature key.
    pub fn with_feature(mut self, feature: &str) -> Self {
        self.feature = Some(Arc::from(feature));
        self
    }

    /// Get the feature key as a string slice.
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    /// Get the n-th constituent (1-based), falling back to the word itself
    /// for single-word records when `n == 1`.
    pub fn part(&self, n: usize) -> Option<&str> {
        if self.parts.is_empty() {
            return (n == 1).then_some(self.word.as_str());
        }
        n.checked_sub(1)
            .and_then(|i| self.parts.get(i))
            .map(String::as_str)
    }
}

/// A stream of token records flowing through the filter stage.
pub type RecordStream = Box<dyn Iterator<Item = TokenRecord>>;

/// A materialized token table. Iteration can be restarted any number of times.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTable {
    records: Vec<TokenRecord>,
}

impl TokenTable {
    /// Create an empty table.
    pub fn new() -> Self {
        TokenTable::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate the records in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, TokenRecord> {
        self.records.iter()
    }

    /// Borrow the records as a slice.
    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    /// Iterate the token text of each record.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.word.as_str())
    }

    /// Hand the records to a filter as a stream.
    pub fn into_stream(self) -> RecordStream {
        Box::new(self.records.into_iter())
    }

    /// Concatenate another table after this one.
    pub fn extend(&mut self, other: TokenTable) {
        self.records.extend(other.records);
    }
}

impl From<Vec<TokenRecord>> for TokenTable {
    fn from(records: Vec<TokenRecord>) -> Self {
        TokenTable { records }
    }
}

impl FromIterator<TokenRecord> for TokenTable {
    fn from_iter<I: IntoIterator<Item = TokenRecord>>(iter: I) -> Self {
        TokenTable {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TokenTable {
    type Item = TokenRecord;
    type IntoIter = std::vec::IntoIter<TokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenTable {
    type Item = &'a TokenRecord;
    type IntoIter = std::slice::Iter<'a, TokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello", 0);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 0);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 0);
        assert!(token.parts.is_empty());
        assert!(token.matched.is_none());
    }

    #[test]
    fn test_ngram_token() {
        let token = Token::ngram(vec!["the".into(), "cat".into()], 0, 0, 7);
        assert_eq!(token.text, "the cat");
        assert!(token.is_ngram());
        assert_eq!(format!("{token}"), "the cat");
    }

    #[test]
    fn test_record_parts() {
        let record = TokenRecord::from_token(
            Token::ngram(vec!["not".into(), "good".into()], 0, 0, 8),
            3,
            1,
            Some(Arc::from("emma")),
        );
        assert_eq!(record.part(1), Some("not"));
        assert_eq!(record.part(2), Some("good"));
        assert_eq!(record.part(3), None);
        assert_eq!(record.part(0), None);
        assert_eq!(record.feature(), Some("emma"));

        let word = TokenRecord::word("death", 1);
        assert_eq!(word.part(1), Some("death"));
        assert_eq!(word.part(2), None);
    }

    #[test]
    fn test_table_is_restartable() {
        let table: TokenTable = vec![TokenRecord::word("a", 1), TokenRecord::word("b", 1)]
            .into_iter()
            .collect();

        let first: Vec<_> = table.words().collect();
        let second: Vec<_> = table.words().collect();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(first, second);
    }
}
