//! Grouping columns and key values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::analysis::token::TokenRecord;
use crate::error::{Result, TextmineError};

/// Default bucket size for `index`, in lines.
pub const DEFAULT_BUCKET_LINES: usize = 80;

/// A column a record can be grouped by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Feature key of the source document
    Feature,
    /// Token text (display form for n-grams)
    Word,
    /// Source line number
    Line,
    /// Chapter index
    Chapter,
    /// Line bucket: `line / size`
    Bucket(usize),
    /// The n-th constituent of an n-gram (1-based)
    Part(usize),
    /// Lexicon sentiment label (joined records only)
    Sentiment,
    /// Lexicon polarity value (joined records only)
    Value,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Feature => write!(f, "feature"),
            Column::Word => write!(f, "word"),
            Column::Line => write!(f, "line"),
            Column::Chapter => write!(f, "chapter"),
            Column::Bucket(_) => write!(f, "index"),
            Column::Part(n) => write!(f, "word{n}"),
            Column::Sentiment => write!(f, "sentiment"),
            Column::Value => write!(f, "value"),
        }
    }
}

impl FromStr for Column {
    type Err = TextmineError;

    /// Parse a column name. `index` is an 80-line bucket, `index:N` an
    /// N-line bucket, and `wordN` / `token_N` the N-th n-gram constituent.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let column = match name.as_str() {
            "feature" | "book" | "document" => Column::Feature,
            "word" | "term" | "token" => Column::Word,
            "line" | "linenumber" => Column::Line,
            "chapter" => Column::Chapter,
            "index" => Column::Bucket(DEFAULT_BUCKET_LINES),
            "sentiment" => Column::Sentiment,
            "value" => Column::Value,
            other => {
                if let Some(size) = other
                    .strip_prefix("index:")
                    .or_else(|| other.strip_prefix("bucket:"))
                {
                    match size.parse::<usize>() {
                        Ok(size) if size > 0 => Column::Bucket(size),
                        _ => {
                            return Err(TextmineError::invalid_config(format!(
                                "bucket size in {s:?} must be a positive integer"
                            )));
                        }
                    }
                } else if let Some(n) = other
                    .strip_prefix("token_")
                    .or_else(|| other.strip_prefix("word"))
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                {
                    Column::Part(n)
                } else {
                    return Err(TextmineError::invalid_config(format!(
                        "unknown column {s:?}"
                    )));
                }
            }
        };
        Ok(column)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One component of a grouping key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    /// A missing value (e.g. a record with no feature key)
    Null,
    Int(i64),
    Text(String),
}

impl Key {
    /// Build a text key.
    pub fn text<S: Into<String>>(s: S) -> Self {
        Key::Text(s.into())
    }

    /// Build an integer key from a count or index.
    pub fn int(n: usize) -> Self {
        Key::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }

    /// The text, if this is a text key.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => write!(f, "NA"),
            Key::Int(n) => write!(f, "{n}"),
            Key::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

/// A grouping key tuple, one [`Key`] per grouping column.
pub type GroupKey = Vec<Key>;

/// A record type that can be grouped by columns.
pub trait Row {
    /// The value of a column, or `None` if this record type has no such column.
    fn key(&self, column: &Column) -> Option<Key>;

    /// Build the grouping key for a set of columns.
    fn group_key(&self, columns: &[Column]) -> Result<GroupKey> {
        columns
            .iter()
            .map(|column| {
                self.key(column).ok_or_else(|| {
                    TextmineError::invalid_config(format!(
                        "column {column} is not available on this table"
                    ))
                })
            })
            .collect()
    }
}

impl Row for TokenRecord {
    fn key(&self, column: &Column) -> Option<Key> {
        match column {
            Column::Feature => Some(self.feature().map_or(Key::Null, Key::from)),
            Column::Word => Some(Key::text(self.word.as_str())),
            Column::Line => Some(Key::int(self.line)),
            Column::Chapter => Some(Key::int(self.chapter)),
            Column::Bucket(size) => Some(Key::int(self.line / (*size).max(1))),
            Column::Part(n) => self.part(*n).map(Key::from),
            Column::Sentiment | Column::Value => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_parse_columns() {
        assert_eq!("word".parse::<Column>().unwrap(), Column::Word);
        assert_eq!("Book".parse::<Column>().unwrap(), Column::Feature);
        assert_eq!("index".parse::<Column>().unwrap(), Column::Bucket(80));
        assert_eq!("index:100".parse::<Column>().unwrap(), Column::Bucket(100));
        assert_eq!("word2".parse::<Column>().unwrap(), Column::Part(2));
        assert_eq!("token_1".parse::<Column>().unwrap(), Column::Part(1));
        assert!("index:0".parse::<Column>().is_err());
        assert!("word0".parse::<Column>().is_err());
        assert!("colour".parse::<Column>().is_err());
    }

    #[test]
    fn test_record_keys() {
        let record = TokenRecord::from_token(
            Token::ngram(vec!["not".into(), "happy".into()], 0, 0, 9),
            161,
            3,
            None,
        );

        assert_eq!(record.key(&Column::Feature), Some(Key::Null));
        assert_eq!(record.key(&Column::Word), Some(Key::text("not happy")));
        assert_eq!(record.key(&Column::Bucket(80)), Some(Key::Int(2)));
        assert_eq!(record.key(&Column::Chapter), Some(Key::Int(3)));
        assert_eq!(record.key(&Column::Part(2)), Some(Key::text("happy")));
        assert_eq!(record.key(&Column::Part(3)), None);
        assert_eq!(record.key(&Column::Sentiment), None);
    }

    #[test]
    fn test_group_key_reports_missing_column() {
        let record = TokenRecord::word("good", 1);
        let err = record
            .group_key(&[Column::Word, Column::Sentiment])
            .unwrap_err();
        assert!(matches!(err, TextmineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_key_serialization() {
        let key = vec![Key::Null, Key::Int(3), Key::text("joy")];
        assert_eq!(serde_json::to_string(&key).unwrap(), r#"[null,3,"joy"]"#);
        assert_eq!(serde_json::to_string(&Column::Bucket(80)).unwrap(), r#""index""#);
    }
}
