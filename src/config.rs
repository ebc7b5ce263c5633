//! Pipeline configuration.
//!
//! A [`PipelineConfig`] describes a whole run and can be read from JSON:
//!
//! ```json
//! {
//!   "normalizer": { "lowercase": true, "strip_punct": true, "strip_numeric": false },
//!   "tokenizer": { "mode": "ngram", "n": 2 },
//!   "stop_words": { "source": "builtin", "ngram_policy": "either" },
//!   "chapter_pattern": "(?i)^chapter [\\divxlc]",
//!   "replace": [ { "pattern": "_", "replacement": "" } ]
//! }
//! ```
//!
//! Every field is optional. Parameters are validated when the configuration
//! is turned into a [`Pipeline`](crate::analysis::pipeline::Pipeline).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::Normalizer;
use crate::analysis::token_filter::stop::NgramStopPolicy;
use crate::analysis::tokenizer::TokenizerMode;
use crate::corpus::Corpus;
use crate::error::Result;

/// Where stop words come from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWordSource {
    /// The built-in English list.
    #[default]
    Builtin,
    /// No stop word filtering.
    None,
    /// One word per line from a local file.
    File(PathBuf),
}

/// Stop word settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopWordsConfig {
    pub source: StopWordSource,
    pub ngram_policy: NgramStopPolicy,
}

/// A regex replacement applied to raw lines before normalization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// Configuration for one analysis run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalizer: Normalizer,
    pub tokenizer: TokenizerMode,
    pub stop_words: StopWordsConfig,
    /// Heading pattern used to assign chapter indices, if any.
    pub chapter_pattern: Option<String>,
    pub replace: Vec<ReplaceRule>,
}

impl PipelineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Assign chapters to the corpus when a chapter pattern is configured.
    pub fn prepare(&self, corpus: Corpus) -> Result<Corpus> {
        match &self.chapter_pattern {
            Some(pattern) => corpus.with_chapters(pattern),
            None => Ok(corpus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::regex::RegexReturn;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.normalizer.lowercase);
        assert_eq!(config.tokenizer, TokenizerMode::Word);
        assert_eq!(config.stop_words.source, StopWordSource::Builtin);
        assert_eq!(config.stop_words.ngram_policy, NgramStopPolicy::Either);
    }

    #[test]
    fn test_full_config() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "normalizer": { "lowercase": false, "strip_numeric": true },
                "tokenizer": { "mode": "regex", "pattern": "^CHAPTER", "return": "indicator" },
                "stop_words": { "source": { "file": "stop.txt" }, "ngram_policy": "all" },
                "chapter_pattern": "^CHAPTER",
                "replace": [ { "pattern": "_" } ]
            }"#,
        )
        .unwrap();

        assert!(!config.normalizer.lowercase);
        assert!(config.normalizer.strip_punct);
        assert!(config.normalizer.strip_numeric);
        assert_eq!(
            config.tokenizer,
            TokenizerMode::Regex {
                pattern: "^CHAPTER".into(),
                regex_return: RegexReturn::Indicator
            }
        );
        assert_eq!(
            config.stop_words.source,
            StopWordSource::File(PathBuf::from("stop.txt"))
        );
        assert_eq!(config.stop_words.ngram_policy, NgramStopPolicy::All);
        assert_eq!(config.replace[0].replacement, "");
    }

    #[test]
    fn test_none_source() {
        let config =
            PipelineConfig::from_json_str(r#"{ "stop_words": { "source": "none" } }"#).unwrap();
        assert_eq!(config.stop_words.source, StopWordSource::None);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(PipelineConfig::from_json_str(r#"{ "tokenizer": { "mode": "sentence" } }"#).is_err());
    }

    #[test]
    fn test_prepare_assigns_chapters() {
        let mut config = PipelineConfig::default();
        config.chapter_pattern = Some("^Chapter".into());
        let corpus = Corpus::from_rows(vec![("b", "Title"), ("b", "Chapter 1"), ("b", "text")]);

        let corpus = config.prepare(corpus).unwrap();
        let chapters: Vec<_> = corpus.documents()[0].lines().iter().map(|l| l.chapter).collect();
        assert_eq!(chapters, vec![0, 1, 1]);
    }
}
