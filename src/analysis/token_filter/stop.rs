//! Stop filter implementation.
//!
//! Removes records whose token is a stop word. For n-gram records an
//! [`NgramStopPolicy`] decides which constituents are checked.
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::token::{Token, TokenRecord};
//! use textmine::analysis::token_filter::stop::{NgramStopPolicy, StopFilter};
//!
//! let filter = StopFilter::new();
//! assert!(filter.is_stop_word("the"));
//!
//! let bigram = TokenRecord::from_token(
//!     Token::ngram(vec!["of".into(), "pride".into()], 0, 0, 8),
//!     1,
//!     0,
//!     None,
//! );
//! assert!(filter.is_stopped(&bigram));
//! assert!(!filter.clone().with_ngram_policy(NgramStopPolicy::All).is_stopped(&bigram));
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::token::{RecordStream, TokenRecord};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list (the Snowball list).
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "would",
    "should", "could", "ought", "i'm", "you're", "he's", "she's", "it's", "we're", "they're",
    "i've", "you've", "we've", "they've", "i'd", "you'd", "he'd", "she'd", "we'd", "they'd",
    "i'll", "you'll", "he'll", "she'll", "we'll", "they'll", "isn't", "aren't", "wasn't",
    "weren't", "hasn't", "haven't", "hadn't", "doesn't", "don't", "didn't", "won't",
    "wouldn't", "shan't", "shouldn't", "can't", "cannot", "couldn't", "mustn't", "let's",
    "that's", "who's", "what's", "here's", "there's", "when's", "where's", "why's", "how's",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at",
    "by", "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor",
    "not", "only", "own", "same", "so", "than", "too", "very",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// Which constituents of an n-gram decide whether it is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramStopPolicy {
    /// Remove when either boundary token (first or last) is a stop word.
    #[default]
    Either,
    /// Remove when any constituent is a stop word.
    Any,
    /// Remove only when every constituent is a stop word.
    All,
    /// Never remove n-grams.
    Keep,
}

/// A filter that removes stop words from the token stream.
///
/// The stop word set is held behind an `Arc` so a single set can be shared
/// across every pipeline of a run without copying. Regex indicator records
/// are never removed.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
    ngram_policy: NgramStopPolicy,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        Self::with_shared(Arc::clone(&DEFAULT_ENGLISH_STOP_WORDS_SET))
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        Self::with_shared(Arc::new(stop_words))
    }

    /// Create a stop filter over an already shared set.
    pub fn with_shared(stop_words: Arc<HashSet<String>>) -> Self {
        StopFilter {
            stop_words,
            ngram_policy: NgramStopPolicy::default(),
        }
    }

    /// Create a new stop filter from a list of stop words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words.into_iter().map(|s| s.into()).collect();
        Self::with_stop_words(stop_words)
    }

    /// Set the n-gram policy.
    pub fn with_ngram_policy(mut self, policy: NgramStopPolicy) -> Self {
        self.ngram_policy = policy;
        self
    }

    /// Make the stop set comparable with lowercased tokens.
    ///
    /// The set is only rebuilt when it actually contains uppercase words, so
    /// the common case keeps sharing the original `Arc`.
    pub fn lowercased(self) -> Self {
        if self.stop_words.iter().all(|w| !w.chars().any(char::is_uppercase)) {
            return self;
        }
        let lowered = self.stop_words.iter().map(|w| w.to_lowercase()).collect();
        StopFilter {
            stop_words: Arc::new(lowered),
            ngram_policy: self.ngram_policy,
        }
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Check whether this filter would remove the record.
    pub fn is_stopped(&self, record: &TokenRecord) -> bool {
        if record.matched.is_some() {
            return false;
        }
        if record.parts.is_empty() {
            return self.is_stop_word(&record.word);
        }

        let parts = &record.parts;
        match self.ngram_policy {
            NgramStopPolicy::Either => {
                self.is_stop_word(&parts[0]) || self.is_stop_word(&parts[parts.len() - 1])
            }
            NgramStopPolicy::Any => parts.iter().any(|p| self.is_stop_word(p)),
            NgramStopPolicy::All => parts.iter().all(|p| self.is_stop_word(p)),
            NgramStopPolicy::Keep => false,
        }
    }

    /// The n-gram policy in effect.
    pub fn ngram_policy(&self) -> NgramStopPolicy {
        self.ngram_policy
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, records: RecordStream) -> Result<RecordStream> {
        let mut removed = 0usize;
        let kept: Vec<TokenRecord> = records
            .filter(|record| {
                let stopped = self.is_stopped(record);
                removed += usize::from(stopped);
                !stopped
            })
            .collect();

        debug!("stop filter kept {} records, removed {}", kept.len(), removed);
        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{Token, TokenTable};

    fn bigram(a: &str, b: &str) -> TokenRecord {
        TokenRecord::from_token(Token::ngram(vec![a.into(), b.into()], 0, 0, 0), 1, 0, None)
    }

    fn trigram(a: &str, b: &str, c: &str) -> TokenRecord {
        TokenRecord::from_token(
            Token::ngram(vec![a.into(), b.into(), c.into()], 0, 0, 0),
            1,
            0,
            None,
        )
    }

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["the", "and", "or"]);
        let table: TokenTable = ["hello", "the", "world", "and", "test"]
            .iter()
            .map(|w| TokenRecord::word(*w, 1))
            .collect();

        let result = filter.apply(&table).unwrap();

        assert_eq!(result.words().collect::<Vec<_>>(), vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_ngram_policies() {
        let filter = StopFilter::from_words(vec!["of", "the"]);

        let edge = bigram("of", "pride");
        let clean = bigram("miss", "bennet");
        let both = bigram("of", "the");
        let middle = trigram("pride", "of", "place");

        assert!(filter.is_stopped(&edge));
        assert!(!filter.is_stopped(&clean));
        assert!(filter.is_stopped(&both));
        assert!(!filter.is_stopped(&middle));

        let any = filter.clone().with_ngram_policy(NgramStopPolicy::Any);
        assert!(any.is_stopped(&middle));

        let all = filter.clone().with_ngram_policy(NgramStopPolicy::All);
        assert!(!all.is_stopped(&edge));
        assert!(all.is_stopped(&both));

        let keep = filter.with_ngram_policy(NgramStopPolicy::Keep);
        assert!(!keep.is_stopped(&both));
    }

    #[test]
    fn test_indicator_records_are_kept() {
        let filter = StopFilter::from_words(vec!["the"]);
        let record = TokenRecord::from_token(Token::new("the", 0).with_matched(false), 1, 0, None);
        assert!(!filter.is_stopped(&record));
    }

    #[test]
    fn test_lowercased() {
        let filter = StopFilter::from_words(vec!["The", "AND"]).lowercased();
        assert!(filter.is_stop_word("the"));
        assert!(filter.is_stop_word("and"));
        assert!(!filter.is_stop_word("The"));

        let shared = StopFilter::new();
        let before = Arc::as_ptr(&shared.stop_words);
        let after = shared.lowercased();
        assert_eq!(before, Arc::as_ptr(&after.stop_words));
    }

    #[test]
    fn test_default_list() {
        let filter = StopFilter::new();
        for word in ["i", "for", "me", "not", "the", "don't"] {
            assert!(filter.is_stop_word(word), "{word} should be a stop word");
        }
        assert!(!filter.is_stop_word("death"));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
