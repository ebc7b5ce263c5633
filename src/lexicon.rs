//! Sentiment lexicons: read-only word to sentiment/polarity mappings.
//!
//! A word may carry several entries (an NRC-style lexicon lists one row per
//! emotion), which is why lookups return a slice and joins fan out.
//!
//! # Examples
//!
//! ```
//! use textmine::lexicon::Lexicon;
//!
//! let afinn = Lexicon::from_values("afinn", vec![("good", 3), ("bad", -3)]);
//! assert_eq!(afinn.get("good")[0].value, Some(3));
//! assert!(afinn.get("meh").is_empty());
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::AHashMap;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextmineError};

/// One lexicon row for a word.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Sentiment label (`positive`, `negative`, `joy`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Integer polarity value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl LexiconEntry {
    /// An entry carrying only a label.
    pub fn label<S: Into<String>>(sentiment: S) -> Self {
        LexiconEntry {
            sentiment: Some(sentiment.into()),
            value: None,
        }
    }

    /// An entry carrying only a polarity value.
    pub fn value(value: i64) -> Self {
        LexiconEntry {
            sentiment: None,
            value: Some(value),
        }
    }
}

/// A word to sentiment mapping with one-to-many entries.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    name: String,
    entries: AHashMap<String, Vec<LexiconEntry>>,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Lexicon {
            name: name.into(),
            entries: AHashMap::new(),
        }
    }

    /// Build a lexicon of integer polarities (AFINN style).
    pub fn from_values<I, W>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (W, i64)>,
        W: Into<String>,
    {
        let mut lexicon = Lexicon::new(name);
        for (word, value) in values {
            lexicon.insert(word, LexiconEntry::value(value));
        }
        lexicon
    }

    /// Build a lexicon of sentiment labels (Bing / NRC style).
    pub fn from_labels<I, W, S>(name: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = (W, S)>,
        W: Into<String>,
        S: Into<String>,
    {
        let mut lexicon = Lexicon::new(name);
        for (word, label) in labels {
            lexicon.insert(word, LexiconEntry::label(label));
        }
        lexicon
    }

    /// Add an entry for a word. Exact duplicate entries are ignored.
    pub fn insert<W: Into<String>>(&mut self, word: W, entry: LexiconEntry) {
        let entries = self.entries.entry(word.into()).or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }

    /// All entries for a word, in insertion order.
    pub fn get(&self, word: &str) -> &[LexiconEntry] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether the word is present.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Lexicon name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The largest number of entries any single word carries.
    pub fn max_fan_out(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Load a tab-separated lexicon file.
    ///
    /// Each line is `word<TAB>field[<TAB>field...]`. A field that parses as an
    /// integer is a polarity value, anything else a sentiment label. A row
    /// with several labels adds one entry per label, each carrying the row's
    /// value if it has one. Blank lines and lines starting with `#` are
    /// skipped.
    pub fn from_tsv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_tsv_reader(&name, File::open(path)?)
    }

    /// Load a tab-separated lexicon from any reader.
    pub fn from_tsv_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);

        let mut lexicon = Lexicon::new(name);
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let bad_row = |reason: &str| {
                TextmineError::invalid_input(format!("lexicon {name} line {line}: {reason}"))
            };

            let mut fields = record.iter().filter(|f| !f.is_empty());
            let Some(word) = fields.next() else {
                continue;
            };

            let mut labels = Vec::new();
            let mut value = None;
            for field in fields {
                match field.parse::<i64>() {
                    Ok(_) if value.is_some() => {
                        return Err(bad_row("more than one polarity value"));
                    }
                    Ok(v) => value = Some(v),
                    Err(_) => labels.push(field),
                }
            }

            match (labels.is_empty(), value) {
                (true, None) => {
                    return Err(bad_row("expected word<TAB>sentiment or word<TAB>value"));
                }
                (true, Some(v)) => lexicon.insert(word, LexiconEntry::value(v)),
                (false, _) => {
                    for label in labels {
                        lexicon.insert(
                            word,
                            LexiconEntry {
                                sentiment: Some(label.to_string()),
                                value,
                            },
                        );
                    }
                }
            }
        }

        Ok(lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_many_entries() {
        let nrc = Lexicon::from_labels(
            "nrc",
            vec![
                ("abandon", "fear"),
                ("abandon", "negative"),
                ("abandon", "sadness"),
                ("able", "positive"),
                ("abandon", "fear"),
            ],
        );

        assert_eq!(nrc.len(), 2);
        assert_eq!(nrc.get("abandon").len(), 3);
        assert_eq!(nrc.max_fan_out(), 3);
        assert_eq!(nrc.name(), "nrc");
    }

    #[test]
    fn test_from_tsv() {
        let data = "# afinn subset\nabandon\t-2\ngood\t3\nhappy\tpositive\t3\n\n";
        let lexicon = Lexicon::from_tsv_reader("mixed", data.as_bytes()).unwrap();

        assert_eq!(lexicon.get("abandon")[0].value, Some(-2));
        assert_eq!(lexicon.get("happy")[0].sentiment.as_deref(), Some("positive"));
        assert_eq!(lexicon.get("happy")[0].value, Some(3));
    }

    #[test]
    fn test_from_tsv_rejects_bare_words() {
        let err = Lexicon::from_tsv_reader("bad", "lonely\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TextmineError::InvalidInput(_)));
    }

    #[test]
    fn test_from_tsv_row_with_several_labels() {
        let data = "abandon\tfear\tnegative\nabandon\tsadness\n";
        let lexicon = Lexicon::from_tsv_reader("nrc", data.as_bytes()).unwrap();

        let labels: Vec<_> = lexicon
            .get("abandon")
            .iter()
            .map(|e| e.sentiment.as_deref().unwrap())
            .collect();
        assert_eq!(labels, vec!["fear", "negative", "sadness"]);
        assert_eq!(lexicon.max_fan_out(), 3);
    }

    #[test]
    fn test_from_tsv_labels_share_value() {
        let data = "bliss\tjoy\tpositive\t3\n";
        let lexicon = Lexicon::from_tsv_reader("mixed", data.as_bytes()).unwrap();

        assert_eq!(lexicon.get("bliss").len(), 2);
        assert!(lexicon.get("bliss").iter().all(|e| e.value == Some(3)));
    }

    #[test]
    fn test_from_tsv_rejects_two_values() {
        let err = Lexicon::from_tsv_reader("bad", "good\t3\t2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TextmineError::InvalidInput(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_missing_word() {
        let lexicon = Lexicon::new("empty");
        assert!(lexicon.get("anything").is_empty());
        assert_eq!(lexicon.max_fan_out(), 0);
    }
}
