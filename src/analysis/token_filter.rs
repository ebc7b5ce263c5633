//! Token filters that remove records from a token stream.
//!
//! Filters run after tokenization and only ever drop records; they never add
//! or rewrite one. This makes them idempotent and conserving: the retained
//! records plus the removed ones always equal the input.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words (with an n-gram policy)
//!
//! # Examples
//!
//! ```
//! use textmine::analysis::token::{TokenRecord, TokenTable};
//! use textmine::analysis::token_filter::Filter;
//! use textmine::analysis::token_filter::stop::StopFilter;
//!
//! let filter = StopFilter::from_words(vec!["the"]);
//! let table: TokenTable = vec![TokenRecord::word("the", 1), TokenRecord::word("carriage", 1)]
//!     .into_iter()
//!     .collect();
//! let kept = filter.apply(&table).unwrap();
//! assert_eq!(kept.words().collect::<Vec<_>>(), vec!["carriage"]);
//! ```

use crate::analysis::token::{RecordStream, TokenTable};
use crate::error::Result;

/// Trait for filters that remove records from a record stream.
pub trait Filter: Send + Sync {
    /// Apply this filter to a record stream.
    fn filter(&self, records: RecordStream) -> Result<RecordStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Apply this filter to a table, returning a new table.
    fn apply(&self, table: &TokenTable) -> Result<TokenTable> {
        Ok(self.filter(table.clone().into_stream())?.collect())
    }
}

pub mod stop;

pub use stop::{NgramStopPolicy, StopFilter};
