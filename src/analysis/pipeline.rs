//! The analysis pipeline: normalize, tokenize, filter.
//!
//! # Architecture
//!
//! Each line of a document goes through, in order:
//! 1. Char filters (pattern replacement on the raw line)
//! 2. The [`Normalizer`] (lowercasing, punctuation and digit stripping)
//! 3. The tokenizer selected by [`TokenizerMode`]
//!
//! The resulting tokens are tagged with line, chapter and feature into a
//! [`TokenTable`], which then passes through the stop filter and any extra
//! filters, in the order they were added.
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::char_filter::Normalizer;
//! use textmine::analysis::pipeline::Pipeline;
//! use textmine::analysis::token_filter::StopFilter;
//! use textmine::analysis::tokenizer::TokenizerMode;
//! use textmine::corpus::Document;
//!
//! let pipeline = Pipeline::with_mode(&TokenizerMode::Word)
//!     .unwrap()
//!     .with_normalizer(Normalizer::default())
//!     .with_stop_filter(StopFilter::new());
//!
//! let doc = Document::new(Some("poem"), vec!["Because I could not stop for Death"]);
//! let table = pipeline.run(&doc).unwrap();
//! assert_eq!(table.words().collect::<Vec<_>>(), vec!["stop", "death"]);
//! ```

use std::sync::Arc;

use log::debug;

use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::char_filter::{CharFilter, Normalizer};
use crate::analysis::token::{TokenRecord, TokenStream, TokenTable};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::{Tokenizer, TokenizerMode};
use crate::config::{PipelineConfig, StopWordSource};
use crate::corpus::loader::load_stop_words;
use crate::corpus::{Corpus, Document};
use crate::error::Result;

/// A configured normalize -> tokenize -> filter pipeline.
#[derive(Clone)]
pub struct Pipeline {
    char_filters: Vec<Arc<dyn CharFilter>>,
    normalizer: Normalizer,
    tokenizer: Arc<dyn Tokenizer>,
    stop_filter: Option<StopFilter>,
    filters: Vec<Arc<dyn Filter>>,
}

impl Pipeline {
    /// Create a pipeline around a tokenizer, with no normalization and no filters.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Pipeline {
            char_filters: Vec::new(),
            normalizer: Normalizer::new(),
            tokenizer,
            stop_filter: None,
            filters: Vec::new(),
        }
    }

    /// Create a pipeline for a tokenization mode.
    pub fn with_mode(mode: &TokenizerMode) -> Result<Self> {
        Ok(Self::new(mode.build()?))
    }

    /// Build a pipeline from configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let mut pipeline = Self::with_mode(&config.tokenizer)?.with_normalizer(config.normalizer);

        for rule in &config.replace {
            pipeline = pipeline.add_char_filter(Arc::new(PatternReplaceCharFilter::new(
                &rule.pattern,
                &rule.replacement,
            )?));
        }

        let stop_filter = match &config.stop_words.source {
            StopWordSource::Builtin => Some(StopFilter::new()),
            StopWordSource::None => None,
            StopWordSource::File(path) => Some(StopFilter::with_stop_words(load_stop_words(path)?)),
        };
        if let Some(filter) = stop_filter {
            pipeline =
                pipeline.with_stop_filter(filter.with_ngram_policy(config.stop_words.ngram_policy));
        }

        debug!("built pipeline {pipeline:?}");
        Ok(pipeline)
    }

    /// Set the normalizer.
    ///
    /// When the normalizer lowercases, an already configured stop filter is
    /// lowercased too so both sides compare in the same case.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        if let Some(filter) = self.stop_filter.take() {
            self.stop_filter = Some(self.case_consistent(filter));
        }
        self
    }

    /// Add a char filter, applied before normalization.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Set the stop filter, lowercasing its words if the normalizer lowercases.
    pub fn with_stop_filter(mut self, filter: StopFilter) -> Self {
        self.stop_filter = Some(self.case_consistent(filter));
        self
    }

    /// Add a filter, applied after the stop filter.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    fn case_consistent(&self, filter: StopFilter) -> StopFilter {
        if self.normalizer.lowercase {
            filter.lowercased()
        } else {
            filter
        }
    }

    /// Get the tokenizer used by this pipeline.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Get the stop filter, if any.
    pub fn stop_filter(&self) -> Option<&StopFilter> {
        self.stop_filter.as_ref()
    }

    /// Apply char filters and the normalizer to one line.
    pub fn normalize_line(&self, text: &str) -> String {
        let mut line = text.to_string();
        for char_filter in &self.char_filters {
            line = char_filter.filter(&line);
        }
        self.normalizer.filter(&line)
    }

    /// Normalize and tokenize one line, without filtering.
    pub fn tokenize_line(&self, text: &str) -> Result<TokenStream> {
        self.tokenizer.tokenize(&self.normalize_line(text))
    }

    /// Tokenize a document without running the filters.
    pub fn tokenize(&self, document: &Document) -> Result<TokenTable> {
        let feature = document.feature_handle();
        let mut records = Vec::new();

        for line in document.lines() {
            for token in self.tokenize_line(&line.text)? {
                records.push(TokenRecord::from_token(
                    token,
                    line.index,
                    line.chapter,
                    feature.clone(),
                ));
            }
        }

        Ok(TokenTable::from(records))
    }

    /// Apply the stop filter and extra filters to a token table.
    pub fn filter(&self, table: TokenTable) -> Result<TokenTable> {
        let mut stream = table.into_stream();
        if let Some(stop) = &self.stop_filter {
            stream = stop.filter(stream)?;
        }
        for filter in &self.filters {
            stream = filter.filter(stream)?;
        }
        Ok(stream.collect())
    }

    /// Run the full pipeline over one document.
    pub fn run(&self, document: &Document) -> Result<TokenTable> {
        let tokens = self.tokenize(document)?;
        let produced = tokens.len();
        let kept = self.filter(tokens)?;

        debug!(
            "{}: {} lines -> {} tokens, {} kept",
            document.feature().unwrap_or("<document>"),
            document.len(),
            produced,
            kept.len()
        );
        Ok(kept)
    }

    /// Run the pipeline over every document of a corpus, concatenating results
    /// in document order.
    pub fn run_corpus(&self, corpus: &Corpus) -> Result<TokenTable> {
        let mut table = TokenTable::new();
        for document in corpus.documents() {
            table.extend(self.run(document)?);
        }
        Ok(table)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "char_filters",
                &self
                    .char_filters
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>(),
            )
            .field("normalizer", &self.normalizer)
            .field("tokenizer", &self.tokenizer.name())
            .field("stop_words", &self.stop_filter.as_ref().map(StopFilter::len))
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
