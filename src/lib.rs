//! # textmine
//!
//! Tokenization and frequency aggregation over literary corpora.
//!
//! ## Features
//!
//! - Word, n-gram and regex tokenization with stop-word filtering
//! - Chapter detection and line buckets
//! - Frequency counts, one-to-many lexicon joins and long-to-wide pivots
//! - Pairwise co-occurrence and correlation
//! - tf-idf scoring, rank/frequency series and Zipf fits
//!
//! ## Example
//!
//! ```
//! use textmine::aggregate::{Column, Key, count};
//! use textmine::analysis::pipeline::Pipeline;
//! use textmine::analysis::tokenizer::TokenizerMode;
//! use textmine::corpus::Document;
//!
//! let doc = Document::new(
//!     Some("dickinson"),
//!     vec![
//!         "Because I could not stop for Death -",
//!         "He kindly stopped for me -",
//!     ],
//! );
//! let tokens = Pipeline::with_mode(&TokenizerMode::Word).unwrap().run(&doc).unwrap();
//! let counts = count(&tokens, &[Column::Word]).unwrap();
//! assert_eq!(counts.get(&[Key::text("for")]), Some(2));
//! ```

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod scoring;

pub mod prelude {
    pub use crate::aggregate::{Column, Fill, Key, count, join, pivot};
    pub use crate::analysis::pipeline::Pipeline;
    pub use crate::analysis::tokenizer::TokenizerMode;
    pub use crate::config::PipelineConfig;
    pub use crate::corpus::{Corpus, Document};
    pub use crate::error::{Result, TextmineError};
    pub use crate::lexicon::Lexicon;
    pub use crate::scoring::{bind_tf_idf, rank_terms};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
