//! tf-idf over per-document term counts.

use ahash::AHashMap;
use log::debug;
use serde::Serialize;

use crate::aggregate::{Column, count};
use crate::analysis::token::TokenTable;
use crate::error::{Result, TextmineError};
use crate::scoring::{DocumentTerms, TermCount, group_by_document};

/// One scored (document, term) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TfIdfRecord {
    pub document: String,
    pub term: String,
    /// Occurrences of the term in the document
    pub n: u64,
    /// Occurrences of every term in the document
    pub total: u64,
    pub tf: f64,
    /// Number of documents containing the term
    pub df: u64,
    pub idf: f64,
    pub tf_idf: f64,
}

/// Score term counts, taking each document's total from its own counts.
///
/// The number of documents is the number of distinct documents with a
/// positive count. Scoring zero documents is an error.
pub fn bind_tf_idf(counts: &[TermCount]) -> Result<Vec<TfIdfRecord>> {
    let documents = group_by_document(counts)?;
    score(documents)
}

/// Score term counts against explicit document totals.
///
/// `totals` lists every document of the collection, including ones with no
/// counted terms; its length is the number of documents. A count for an
/// unlisted document, a zero total with counted terms, or a count above the
/// total is an error.
pub fn bind_tf_idf_with_totals(counts: &[TermCount], totals: &[(String, u64)]) -> Result<Vec<TfIdfRecord>> {
    let mut listed: AHashMap<&str, u64> = AHashMap::with_capacity(totals.len());
    for (document, total) in totals {
        if listed.insert(document.as_str(), *total).is_some() {
            return Err(TextmineError::invalid_input(format!(
                "document {document:?} listed twice in totals"
            )));
        }
    }

    let mut documents = group_by_document(counts)?;
    for doc in &mut documents {
        let total = *listed.get(doc.document.as_str()).ok_or_else(|| {
            TextmineError::invalid_input(format!("no total for document {:?}", doc.document))
        })?;
        if total == 0 {
            return Err(TextmineError::invalid_input(format!(
                "document {:?} has term counts but a total of 0",
                doc.document
            )));
        }
        doc.total = total;
    }

    score_with(documents, totals.len())
}

/// Count words per document and score them in one step.
///
/// `document` names the column identifying documents, typically
/// `Column::Feature`.
pub fn tf_idf(tokens: &TokenTable, document: &Column) -> Result<Vec<TfIdfRecord>> {
    let counts = count(tokens, &[document.clone(), Column::Word])?;
    bind_tf_idf(&counts.term_counts(document, &Column::Word)?)
}

fn score(documents: Vec<DocumentTerms>) -> Result<Vec<TfIdfRecord>> {
    let n = documents.len();
    score_with(documents, n)
}

fn score_with(documents: Vec<DocumentTerms>, n_documents: usize) -> Result<Vec<TfIdfRecord>> {
    if n_documents == 0 {
        return Err(TextmineError::invalid_input("tf-idf over zero documents"));
    }
    let n_documents = n_documents as u64;

    let mut df: AHashMap<&str, u64> = AHashMap::new();
    for doc in &documents {
        for (term, _) in &doc.terms {
            *df.entry(term.as_str()).or_default() += 1;
        }
    }

    let mut records = Vec::with_capacity(documents.iter().map(|d| d.terms.len()).sum());
    for doc in &documents {
        for (term, n) in &doc.terms {
            if *n > doc.total {
                return Err(TextmineError::invariant(
                    format!("{}/{}", doc.document, term),
                    format!("count {} exceeds document total {}", n, doc.total),
                ));
            }
            let df = df.get(term.as_str()).copied().unwrap_or_default();
            if df > n_documents {
                return Err(TextmineError::invariant(
                    term.as_str(),
                    format!("document frequency {df} exceeds {n_documents} documents"),
                ));
            }

            let tf = *n as f64 / doc.total as f64;
            let idf = if df == n_documents {
                0.0
            } else {
                (n_documents as f64 / df as f64).ln()
            };
            let tf_idf = if idf == 0.0 { 0.0 } else { tf * idf };

            records.push(TfIdfRecord {
                document: doc.document.clone(),
                term: term.clone(),
                n: *n,
                total: doc.total,
                tf,
                df,
                idf,
                tf_idf,
            });
        }
    }

    debug!("scored {} terms over {} documents", records.len(), n_documents);
    Ok(records)
}

/// Sort scored records by descending tf-idf; ties keep input order.
pub fn sort_by_tf_idf(records: &mut [TfIdfRecord]) {
    records.sort_by(|a, b| b.tf_idf.total_cmp(&a.tf_idf));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::TokenRecord;

    fn find<'a>(records: &'a [TfIdfRecord], doc: &str, term: &str) -> &'a TfIdfRecord {
        records
            .iter()
            .find(|r| r.document == doc && r.term == term)
            .unwrap()
    }

    #[test]
    fn test_ubiquitous_term_scores_zero() {
        let counts = vec![
            TermCount::new("a", "x", 3),
            TermCount::new("a", "y", 1),
            TermCount::new("b", "x", 2),
        ];
        let records = bind_tf_idf(&counts).unwrap();

        let x = find(&records, "a", "x");
        assert_eq!(x.tf, 0.75);
        assert_eq!(x.df, 2);
        assert_eq!(x.idf, 0.0);
        assert_eq!(x.tf_idf, 0.0);

        let y = find(&records, "a", "y");
        assert_eq!(y.tf, 0.25);
        assert!((y.idf - 2f64.ln()).abs() < 1e-12);
        assert!((y.tf_idf - 0.25 * 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_documents() {
        let err = bind_tf_idf(&[]).unwrap_err();
        assert!(matches!(err, TextmineError::InvalidInput(_)));
    }

    #[test]
    fn test_with_totals() {
        let counts = vec![TermCount::new("a", "whale", 2)];
        let totals = vec![("a".to_string(), 10), ("b".to_string(), 5), ("c".to_string(), 0)];
        let records = bind_tf_idf_with_totals(&counts, &totals).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tf, 0.2);
        assert!((records[0].idf - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_with_totals_errors() {
        let counts = vec![TermCount::new("a", "whale", 2)];

        let zero = vec![("a".to_string(), 0)];
        assert!(matches!(
            bind_tf_idf_with_totals(&counts, &zero).unwrap_err(),
            TextmineError::InvalidInput(_)
        ));

        let short = vec![("a".to_string(), 1)];
        assert!(matches!(
            bind_tf_idf_with_totals(&counts, &short).unwrap_err(),
            TextmineError::InvariantViolation { .. }
        ));

        let missing = vec![("b".to_string(), 5)];
        assert!(bind_tf_idf_with_totals(&counts, &missing).is_err());
        assert!(bind_tf_idf_with_totals(&counts, &[]).is_err());
    }

    #[test]
    fn test_tf_idf_from_tokens() {
        let tokens: TokenTable = [("a", "sea"), ("a", "the"), ("b", "the")]
            .iter()
            .map(|(book, word)| TokenRecord::word(*word, 1).with_feature(book))
            .collect();
        let mut records = tf_idf(&tokens, &Column::Feature).unwrap();
        sort_by_tf_idf(&mut records);

        assert_eq!(records[0].term, "sea");
        assert_eq!(records[0].document, "a");
        assert!(records[1..].iter().all(|r| r.tf_idf == 0.0));
    }
}
