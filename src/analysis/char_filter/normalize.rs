//! Line normalizer: lowercasing plus punctuation and digit stripping.
//!
//! The token alphabet kept by [`Normalizer`] when `strip_punct` is set is:
//! letters, digits (unless `strip_numeric`), whitespace, and apostrophes
//! that sit between two alphanumeric characters (`don't`, `o'clock`).
//! Every other character, hyphens included, is replaced by a space so it acts
//! as a token boundary. Replacing instead of deleting keeps `heart-break`
//! from collapsing into `heartbreak`.

use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::CharFilter;

/// Normalization flags applied to each raw line.
///
/// With `strip_punct`, intra-word hyphens are not kept: `heart-break` comes
/// out as `heart break`, matching where the word tokenizer splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalizer {
    /// Lowercase the line before tokenization
    pub lowercase: bool,
    /// Replace characters outside the token alphabet (hyphens included) with spaces
    pub strip_punct: bool,
    /// Replace digits with spaces
    pub strip_numeric: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer {
            lowercase: true,
            strip_punct: true,
            strip_numeric: false,
        }
    }
}

impl Normalizer {
    /// Create a normalizer that leaves text untouched.
    pub fn new() -> Self {
        Normalizer {
            lowercase: false,
            strip_punct: false,
            strip_numeric: false,
        }
    }

    /// Set lowercasing.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Set punctuation stripping.
    pub fn strip_punct(mut self, strip: bool) -> Self {
        self.strip_punct = strip;
        self
    }

    /// Set digit stripping.
    pub fn strip_numeric(mut self, strip: bool) -> Self {
        self.strip_numeric = strip;
        self
    }

    /// Whether this normalizer changes anything at all.
    pub fn is_identity(&self) -> bool {
        !self.lowercase && !self.strip_punct && !self.strip_numeric
    }

    fn keeps(&self, chars: &[char], i: usize) -> bool {
        let c = chars[i];
        if c.is_whitespace() || c.is_alphabetic() {
            return true;
        }
        if c.is_numeric() {
            return !self.strip_numeric;
        }
        if !self.strip_punct {
            return true;
        }
        if is_apostrophe(c) {
            let before = i > 0 && self.is_word_char(chars[i - 1]);
            let after = chars.get(i + 1).is_some_and(|&n| self.is_word_char(n));
            return before && after;
        }
        false
    }

    fn is_word_char(&self, c: char) -> bool {
        c.is_alphabetic() || (c.is_numeric() && !self.strip_numeric)
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

impl CharFilter for Normalizer {
    fn filter(&self, input: &str) -> String {
        let text = if self.lowercase {
            input.to_lowercase()
        } else {
            input.to_string()
        };

        if !self.strip_punct && !self.strip_numeric {
            return text;
        }

        let chars: Vec<char> = text.chars().collect();
        (0..chars.len())
            .map(|i| if self.keeps(&chars, i) { chars[i] } else { ' ' })
            .collect()
    }

    fn name(&self) -> &'static str {
        "normalize"
    }
}
