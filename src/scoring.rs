//! Term weighting: tf-idf and rank/frequency series.
//!
//! Both scorers consume per-document term counts ([`TermCount`]) and return
//! new record vectors; nothing is updated in place.
//!
//! # Examples
//!
//! ```
//! use textmine::scoring::{TermCount, bind_tf_idf};
//!
//! let counts = vec![
//!     TermCount::new("a", "the", 3),
//!     TermCount::new("a", "whale", 1),
//!     TermCount::new("b", "the", 2),
//! ];
//! let scored = bind_tf_idf(&counts).unwrap();
//! assert_eq!(scored[0].tf_idf, 0.0);
//! assert!(scored[1].tf_idf > 0.0);
//! ```

pub mod rank;
pub mod tf_idf;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextmineError};

pub use rank::{PowerLaw, RankRecord, fit_power_law, rank_terms};
pub use tf_idf::{TfIdfRecord, bind_tf_idf, bind_tf_idf_with_totals, sort_by_tf_idf, tf_idf};

/// The count of one term in one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub document: String,
    pub term: String,
    pub count: u64,
}

impl TermCount {
    pub fn new<D: Into<String>, T: Into<String>>(document: D, term: T, count: u64) -> Self {
        TermCount {
            document: document.into(),
            term: term.into(),
            count,
        }
    }
}

/// Term counts of one document, merged, with zero counts dropped.
#[derive(Debug)]
pub(crate) struct DocumentTerms {
    pub(crate) document: String,
    pub(crate) terms: Vec<(String, u64)>,
    pub(crate) total: u64,
}

/// Group counts by document in first-appearance order, summing duplicate
/// (document, term) entries.
pub(crate) fn group_by_document(counts: &[TermCount]) -> Result<Vec<DocumentTerms>> {
    let mut documents: Vec<DocumentTerms> = Vec::new();
    let mut doc_index: AHashMap<&str, usize> = AHashMap::new();
    let mut term_index: AHashMap<(usize, &str), usize> = AHashMap::new();

    for count in counts.iter().filter(|c| c.count > 0) {
        let d = *doc_index.entry(count.document.as_str()).or_insert_with(|| {
            documents.push(DocumentTerms {
                document: count.document.clone(),
                terms: Vec::new(),
                total: 0,
            });
            documents.len() - 1
        });
        let doc = &mut documents[d];

        doc.total = doc.total.checked_add(count.count).ok_or_else(|| {
            TextmineError::invariant(count.document.as_str(), "document total overflows")
        })?;
        match term_index.get(&(d, count.term.as_str())) {
            Some(&t) => doc.terms[t].1 += count.count,
            None => {
                term_index.insert((d, count.term.as_str()), doc.terms.len());
                doc.terms.push((count.term.clone(), count.count));
            }
        }
    }
    Ok(documents)
}
