//! Inner join of token records against a sentiment lexicon.
//!
//! The join is one-to-many: a word with several lexicon entries produces one
//! joined record per entry, so the result can be larger than the input (at
//! most input size times the lexicon's largest fan-out).

use log::{debug, warn};
use serde::Serialize;

use crate::aggregate::column::{Column, Key, Row};
use crate::analysis::token::{TokenRecord, TokenTable};
use crate::error::{Result, TextmineError};
use crate::lexicon::{Lexicon, LexiconEntry};

/// A token record with the lexicon fields of one matching entry appended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub token: TokenRecord,
    #[serde(flatten)]
    pub entry: LexiconEntry,
}

impl Row for JoinedRecord {
    fn key(&self, column: &Column) -> Option<Key> {
        match column {
            Column::Sentiment => self.entry.sentiment.as_deref().map(Key::from),
            Column::Value => self.entry.value.map(Key::Int),
            other => self.token.key(other),
        }
    }
}

/// Join on the token text.
///
/// # Examples
///
/// ```
/// use textmine::aggregate::join;
/// use textmine::analysis::token::{TokenRecord, TokenTable};
/// use textmine::lexicon::Lexicon;
///
/// let nrc = Lexicon::from_labels("nrc", vec![("death", "fear"), ("death", "sadness")]);
/// let tokens: TokenTable = vec![TokenRecord::word("death", 1), TokenRecord::word("carriage", 2)]
///     .into_iter()
///     .collect();
///
/// let joined = join(&tokens, &nrc);
/// assert_eq!(joined.len(), 2);
/// assert_eq!(joined[1].entry.sentiment.as_deref(), Some("sadness"));
/// ```
pub fn join(tokens: &TokenTable, lexicon: &Lexicon) -> Vec<JoinedRecord> {
    let joined: Vec<JoinedRecord> = tokens
        .iter()
        .flat_map(|record| attach(record, lexicon.get(&record.word)))
        .collect();
    report(tokens, lexicon, &joined);
    joined
}

/// Join on any text column, such as the second word of a bigram.
pub fn join_on(tokens: &TokenTable, lexicon: &Lexicon, column: &Column) -> Result<Vec<JoinedRecord>> {
    let mut joined = Vec::new();
    for record in tokens {
        let key = record.key(column);
        let word = key.as_ref().and_then(Key::as_text).ok_or_else(|| {
            TextmineError::invalid_config(format!(
                "cannot join on column {column}: not a text column of record {:?}",
                record.word
            ))
        })?;
        joined.extend(attach(record, lexicon.get(word)));
    }
    report(tokens, lexicon, &joined);
    Ok(joined)
}

fn attach<'a>(
    record: &'a TokenRecord,
    entries: &'a [LexiconEntry],
) -> impl Iterator<Item = JoinedRecord> + 'a {
    entries.iter().map(move |entry| JoinedRecord {
        token: record.clone(),
        entry: entry.clone(),
    })
}

fn report(tokens: &TokenTable, lexicon: &Lexicon, joined: &[JoinedRecord]) {
    if joined.is_empty() && !tokens.is_empty() {
        warn!(
            "no token of {} matched lexicon {}; joined table is empty",
            tokens.len(),
            lexicon.name()
        );
    } else {
        debug!(
            "joined {} tokens with {} into {} records",
            tokens.len(),
            lexicon.name(),
            joined.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::count::{count, sum_values};
    use crate::analysis::token::Token;

    fn tokens(words: &[&str]) -> TokenTable {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| TokenRecord::word(*w, i + 1))
            .collect()
    }

    #[test]
    fn test_afinn_sum() {
        let afinn = Lexicon::from_values("afinn", vec![("good", 3), ("bad", -3)]);
        let joined = join(&tokens(&["good", "bad", "good"]), &afinn);

        assert_eq!(joined.len(), 3);
        let sums = sum_values(&joined, &[]).unwrap();
        assert_eq!(sums.get(&[]), Some(3));
    }

    #[test]
    fn test_one_to_many_fan_out() {
        let nrc = Lexicon::from_labels(
            "nrc",
            vec![("death", "fear"), ("death", "negative"), ("death", "sadness")],
        );
        let input = tokens(&["death", "and", "death"]);
        let joined = join(&input, &nrc);

        assert_eq!(joined.len(), 6);
        assert!(joined.len() <= input.len() * nrc.max_fan_out());

        let by_sentiment = count(&joined, &[Column::Sentiment]).unwrap();
        assert_eq!(by_sentiment.get(&[Key::text("fear")]), Some(2));
        assert_eq!(by_sentiment.get(&[Key::text("sadness")]), Some(2));
    }

    #[test]
    fn test_no_match_is_empty() {
        let bing = Lexicon::from_labels("bing", vec![("happy", "positive")]);
        let joined = join(&tokens(&["carriage", "horses"]), &bing);
        assert!(joined.is_empty());

        let sums = sum_values(&joined, &[Column::Feature]).unwrap();
        assert!(sums.is_empty());
    }

    #[test]
    fn test_sum_requires_values() {
        let bing = Lexicon::from_labels("bing", vec![("happy", "positive")]);
        let joined = join(&tokens(&["happy"]), &bing);
        let err = sum_values(&joined, &[]).unwrap_err();
        assert!(matches!(err, TextmineError::InvalidInput(_)));
    }

    #[test]
    fn test_join_on_second_word() {
        let afinn = Lexicon::from_values("afinn", vec![("like", 2), ("happy", 3)]);
        let bigrams: TokenTable = vec![
            TokenRecord::from_token(Token::ngram(vec!["not".into(), "like".into()], 0, 0, 8), 1, 0, None),
            TokenRecord::from_token(Token::ngram(vec!["very".into(), "happy".into()], 0, 0, 10), 2, 0, None),
            TokenRecord::from_token(Token::ngram(vec!["not".into(), "sure".into()], 0, 0, 8), 3, 0, None),
        ]
        .into();

        let joined = join_on(&bigrams, &afinn, &Column::Part(2)).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].token.word, "not like");
        assert_eq!(joined[0].entry.value, Some(2));

        assert!(join_on(&bigrams, &afinn, &Column::Line).is_err());
    }

    #[test]
    fn test_joined_record_serializes_flat() {
        let bing = Lexicon::from_labels("bing", vec![("happy", "positive")]);
        let joined = join(&tokens(&["happy"]), &bing);
        let value = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(value["word"], "happy");
        assert_eq!(value["sentiment"], "positive");
    }
}
