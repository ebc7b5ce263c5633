//! Char filters that normalize a raw text line before it is tokenized.
//!
//! # Available Filters
//!
//! - [`normalize::Normalizer`] - Lowercasing and punctuation/digit stripping
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::char_filter::CharFilter;
//! use textmine::analysis::char_filter::normalize::Normalizer;
//!
//! let normalizer = Normalizer::new().lowercase(true).strip_punct(true);
//! assert_eq!(normalizer.filter("Hope, is the THING"), "hope  is the thing");
//! ```

/// Trait for character filters that transform text before tokenization.
///
/// Char filters are pure: the same input always yields the same output and
/// an empty line yields an empty line.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to one line of input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod normalize;
pub mod pattern_replace;

pub use normalize::Normalizer;
pub use pattern_replace::PatternReplaceCharFilter;
