//! Command line argument parsing for the textmine CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::TokenizerMode;

/// textmine - tokenization and frequency analysis for literary corpora
#[derive(Parser, Debug, Clone)]
#[command(name = "textmine")]
#[command(about = "Tokenize, count, join and score literary corpora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TextmineArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TextmineArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the token table of a corpus
    Tokens(TokensArgs),

    /// Count tokens by one or more columns
    Count(CountArgs),

    /// Join tokens with a sentiment lexicon and summarize per group
    Sentiment(SentimentArgs),

    /// Score terms per document with tf-idf
    #[command(name = "tf-idf")]
    TfIdf(TfIdfArgs),

    /// Correlate words that share line sections
    Correlate(CorrelateArgs),
}

/// Pipeline overrides shared by every command.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Corpus file or directory (.jsonl rows or plain text files)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Tokenization mode: word, ngram, ngram:N or regex:PATTERN
    #[arg(short, long)]
    pub mode: Option<TokenizerMode>,

    /// Keep stop words
    #[arg(long)]
    pub keep_stop_words: bool,
}

/// Arguments for printing tokens
#[derive(Parser, Debug, Clone)]
pub struct TokensArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Maximum number of records to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for counting
#[derive(Parser, Debug, Clone)]
pub struct CountArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Grouping columns (comma-separated): feature, word, line, chapter,
    /// index, index:N, wordN
    #[arg(short, long, value_delimiter = ',', default_value = "word")]
    pub by: Vec<String>,

    /// Only print the N most frequent groups
    #[arg(short, long)]
    pub top: Option<usize>,
}

/// Arguments for sentiment analysis
#[derive(Parser, Debug, Clone)]
pub struct SentimentArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Lexicon file (TSV: word, sentiment and/or integer value)
    #[arg(short, long, value_name = "LEXICON_FILE")]
    pub lexicon: PathBuf,

    /// Grouping columns (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "feature,index")]
    pub by: Vec<String>,

    /// Lines per bucket for a bare `index` column (`index:N` keeps its own size)
    #[arg(long, default_value = "80")]
    pub bucket: usize,

    /// How to summarize each group
    #[arg(short, long, default_value = "net")]
    pub summary: SentimentSummary,
}

/// Arguments for tf-idf scoring
#[derive(Parser, Debug, Clone)]
pub struct TfIdfArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Column identifying documents
    #[arg(short, long, default_value = "feature")]
    pub document: String,

    /// Only print the N highest-scoring terms of each document
    #[arg(short, long)]
    pub top: Option<usize>,
}

/// Arguments for pairwise correlation
#[derive(Parser, Debug, Clone)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Lines per section
    #[arg(short, long, default_value = "10")]
    pub section: usize,

    /// Minimum number of occurrences for a word to be correlated
    #[arg(long, default_value = "20")]
    pub min_count: u64,

    /// Only print pairs whose first item is this word
    #[arg(short, long)]
    pub word: Option<String>,

    /// Only print the N most correlated pairs
    #[arg(short, long)]
    pub top: Option<usize>,
}

/// Sentiment summaries
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentSummary {
    /// Positive minus negative label counts per group
    Net,
    /// Label counts per group
    Counts,
    /// Sum of polarity values per group
    Sum,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}
