use regex::Regex;

use crate::analysis::char_filter::CharFilter;
use crate::error::{Result, TextmineError};

/// A char filter that replaces every match of a regex pattern.
///
/// Useful for dropping markup that survives in public-domain texts, such as
/// the `_underscore_` emphasis used by Project Gutenberg transcriptions.
#[derive(Clone, Debug)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern).map_err(|e| TextmineError::regex(pattern, e))?,
            replacement: replacement.to_string(),
        })
    }

    /// Get the pattern as a string.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_replace() {
        let filter = PatternReplaceCharFilter::new(r"(\d+)", "NUM").unwrap();
        assert_eq!(filter.filter("Year 2024"), "Year NUM");
    }

    #[test]
    fn test_remove_pattern() {
        let filter = PatternReplaceCharFilter::new(r"_", "").unwrap();
        assert_eq!(filter.filter("_very_ well"), "very well");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternReplaceCharFilter::new("(", "").is_err());
    }
}
