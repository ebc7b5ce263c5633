//! Text analysis: turning raw lines into a table of token records.
//!
//! Lines pass through char filters and the normalizer, are split by a
//! tokenizer, tagged with their source position, and finally thinned out by
//! token filters. [`pipeline::Pipeline`] wires the stages together.

pub mod char_filter;
pub mod pipeline;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
