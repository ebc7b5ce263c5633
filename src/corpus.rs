//! Documents and document collections fed to the analysis pipeline.
//!
//! A corpus arrives as rows of `(feature_key, line_text)`; rows sharing a
//! feature key become one [`Document`], in order of first appearance.
//! Fetching the text is the caller's business; [`loader`] only reads local
//! files.

pub mod document;
pub mod loader;

pub use document::{Corpus, Document, Line};
