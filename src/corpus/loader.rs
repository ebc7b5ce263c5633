//! Local file loaders for corpora and stop word lists.
//!
//! Supported corpus layouts:
//!
//! - `*.jsonl` - one `{"feature": "...", "text": "..."}` object per line
//! - any other file - plain text, one document whose feature is the file stem
//! - a directory - every file in it, in file name order

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::corpus::document::{Corpus, Document};
use crate::error::{Result, TextmineError};

/// One row of a JSONL corpus.
#[derive(Debug, Deserialize)]
struct CorpusRow {
    feature: String,
    text: String,
}

/// Load a corpus from a file or directory.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let corpus = if path.is_dir() {
        let mut files = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<PathBuf>>>()?;
        files.retain(|p| p.is_file());
        files.sort();

        let mut corpus = Corpus::default();
        for file in files {
            for document in load_file(&file)?.documents() {
                corpus.push(document.clone());
            }
        }
        corpus
    } else {
        load_file(path)?
    };

    info!(
        "loaded {} documents ({} lines) from {}",
        corpus.len(),
        corpus.line_count(),
        path.display()
    );
    Ok(corpus)
}

fn load_file(path: &Path) -> Result<Corpus> {
    if path.extension().is_some_and(|ext| ext == "jsonl") {
        load_jsonl(path)
    } else {
        load_text(path).map(|doc| Corpus::new(vec![doc]))
    }
}

/// Load a JSONL corpus of `(feature, text)` rows.
pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut rows = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: CorpusRow = serde_json::from_str(&line).map_err(|e| {
            TextmineError::invalid_input(format!(
                "{}:{}: malformed corpus row: {e}",
                path.as_ref().display(),
                line_num + 1
            ))
        })?;
        rows.push((row.feature, row.text));
    }

    debug!("read {} corpus rows", rows.len());
    Ok(Corpus::from_rows(rows))
}

/// Load a plain text file as one document keyed by the file stem.
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let feature = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    Ok(Document::new(feature.as_deref(), content.lines()))
}

/// Load a stop word list: one word per line, `#` starts a comment.
pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut words = HashSet::new();

    for line in reader.lines() {
        let line = line?;
        let word = line.split('#').next().unwrap_or_default().trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }

    Ok(words)
}
