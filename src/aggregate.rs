//! Aggregation over token tables: counting, lexicon joins, pivots and
//! pairwise co-occurrence.
//!
//! Every operation takes its input by reference and returns a new table.
//! Grouping is expressed with [`Column`]s; any record type that implements
//! [`Row`] can be grouped.
//!
//! # Examples
//!
//! ```
//! use textmine::aggregate::{count, Column, Key};
//! use textmine::analysis::token::{TokenRecord, TokenTable};
//!
//! let table: TokenTable = ["for", "death", "for"]
//!     .iter()
//!     .map(|w| TokenRecord::word(*w, 1))
//!     .collect();
//!
//! let counts = count(&table, &[Column::Word]).unwrap();
//! assert_eq!(counts.get(&[Key::text("for")]), Some(2));
//! assert_eq!(counts.total(), 3);
//! ```

pub mod column;
pub mod count;
pub mod join;
pub mod pairwise;
pub mod pivot;

pub use column::{Column, GroupKey, Key, Row};
pub use count::{FrequencyTable, Measure, Table, ValueTable, count, sum_values};
pub use join::{JoinedRecord, join, join_on};
pub use pairwise::{PairCorrelation, PairCount, pairwise_cor, pairwise_count};
pub use pivot::{Fill, WideTable, pivot};
