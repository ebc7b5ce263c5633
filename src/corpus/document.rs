//! Document and corpus types.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

/// Default pattern for chapter headings such as `Chapter 1` or `CHAPTER XII`.
pub const DEFAULT_CHAPTER_PATTERN: &str = r"(?i)^chapter [\divxlc]";

/// One line of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line number (1-based, stable)
    pub index: usize,
    /// Chapter the line belongs to (0 for front matter)
    pub chapter: usize,
    /// Raw text
    pub text: String,
}

/// An ordered sequence of lines, optionally keyed by a feature (book title).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    feature: Option<Arc<str>>,
    lines: Vec<Line>,
}

impl Document {
    /// Create a document from raw lines. Every line starts in chapter 0.
    pub fn new<I, S>(feature: Option<&str>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| Line {
                index: i + 1,
                chapter: 0,
                text: text.into(),
            })
            .collect();

        Document {
            feature: feature.map(Arc::from),
            lines,
        }
    }

    /// Assign chapter indices using a heading pattern.
    ///
    /// The chapter counter starts at 0 and is incremented on every line the
    /// pattern matches, so indices never decrease.
    pub fn with_chapters(self, pattern: &str) -> Result<Self> {
        let detector = RegexTokenizer::indicator(pattern)?;
        self.with_chapter_detector(&detector)
    }

    /// Assign chapter indices using an indicator-mode regex tokenizer.
    pub fn with_chapter_detector(mut self, detector: &RegexTokenizer) -> Result<Self> {
        let mut chapter = 0;
        for line in &mut self.lines {
            let heading = detector
                .tokenize(&line.text)?
                .any(|token| token.matched == Some(true));
            if heading {
                chapter += 1;
            }
            line.chapter = chapter;
        }
        Ok(self)
    }

    /// The feature key, if any.
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    /// A shared handle on the feature key, for tagging token records.
    pub fn feature_handle(&self) -> Option<Arc<str>> {
        self.feature.clone()
    }

    /// The lines in order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of chapters detected (the highest chapter index).
    pub fn chapter_count(&self) -> usize {
        self.lines.last().map_or(0, |l| l.chapter)
    }
}

/// A collection of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Create a corpus from documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Corpus { documents }
    }

    /// Group `(feature_key, line_text)` rows into documents.
    ///
    /// Documents appear in order of first appearance of their feature key,
    /// and lines keep their relative order within each document.
    pub fn from_rows<I, K, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut grouped: AHashMap<String, Vec<String>> = AHashMap::new();

        for (feature, text) in rows {
            let feature = feature.as_ref();
            match grouped.get_mut(feature) {
                Some(lines) => lines.push(text.into()),
                None => {
                    order.push(feature.to_string());
                    grouped.insert(feature.to_string(), vec![text.into()]);
                }
            }
        }

        let documents = order
            .into_iter()
            .map(|feature| {
                let lines = grouped.remove(&feature).unwrap_or_default();
                Document::new(Some(&feature), lines)
            })
            .collect();

        Corpus { documents }
    }

    /// Assign chapters to every document.
    pub fn with_chapters(self, pattern: &str) -> Result<Self> {
        let detector = RegexTokenizer::indicator(pattern)?;
        let documents = self
            .documents
            .into_iter()
            .map(|doc| doc.with_chapter_detector(&detector))
            .collect::<Result<Vec<_>>>()?;
        Ok(Corpus { documents })
    }

    /// Add a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// The documents in order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check whether the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of lines across documents.
    pub fn line_count(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_numbers_are_one_based() {
        let doc = Document::new(None, vec!["a", "b"]);
        assert_eq!(doc.lines()[0].index, 1);
        assert_eq!(doc.lines()[1].index, 2);
        assert!(doc.feature().is_none());
    }

    #[test]
    fn test_chapters() {
        let doc = Document::new(
            Some("emma"),
            vec![
                "EMMA",
                "By Jane Austen",
                "CHAPTER I",
                "Emma Woodhouse, handsome, clever, and rich",
                "CHAPTER II",
                "Mr. Weston was a native of Highbury",
            ],
        )
        .with_chapters(DEFAULT_CHAPTER_PATTERN)
        .unwrap();

        let chapters: Vec<usize> = doc.lines().iter().map(|l| l.chapter).collect();
        assert_eq!(chapters, vec![0, 0, 1, 1, 2, 2]);
        assert_eq!(doc.chapter_count(), 2);
    }

    #[test]
    fn test_chapter_pattern_must_compile() {
        let doc = Document::new(None, vec!["x"]);
        assert!(doc.with_chapters("(").is_err());
    }

    #[test]
    fn test_from_rows_groups_by_feature() {
        let corpus = Corpus::from_rows(vec![
            ("sense", "line one"),
            ("pride", "first"),
            ("sense", "line two"),
        ]);

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents()[0].feature(), Some("sense"));
        assert_eq!(corpus.documents()[0].len(), 2);
        assert_eq!(corpus.documents()[0].lines()[1].text, "line two");
        assert_eq!(corpus.documents()[0].lines()[1].index, 2);
        assert_eq!(corpus.documents()[1].feature(), Some("pride"));
        assert_eq!(corpus.line_count(), 3);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::from_rows(Vec::<(&str, &str)>::new());
        assert!(corpus.is_empty());
        assert_eq!(corpus.line_count(), 0);
    }
}
