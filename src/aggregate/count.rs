//! Frequency tables and grouped sums.

use std::fmt::Debug;
use std::ops::Add;

use ahash::AHashMap;
use log::debug;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::aggregate::column::{Column, GroupKey, Key, Row};
use crate::error::{Result, TextmineError};
use crate::scoring::TermCount;

/// A numeric cell type that tables can hold.
pub trait Measure:
    Copy + Default + PartialEq + PartialOrd + Add<Output = Self> + Debug + Serialize
{
    /// Convert to a signed integer, if it fits.
    fn to_i64(self) -> Option<i64>;
}

impl Measure for u64 {
    fn to_i64(self) -> Option<i64> {
        i64::try_from(self).ok()
    }
}

impl Measure for i64 {
    fn to_i64(self) -> Option<i64> {
        Some(self)
    }
}

/// A long table: one row per distinct grouping key, rows in order of first
/// appearance, each carrying one measure.
#[derive(Clone, Debug, PartialEq)]
pub struct Table<V> {
    columns: Vec<Column>,
    measure: String,
    rows: Vec<(GroupKey, V)>,
    index: AHashMap<GroupKey, usize>,
}

/// Token counts per grouping key.
pub type FrequencyTable = Table<u64>;

/// Summed polarity values per grouping key.
pub type ValueTable = Table<i64>;

impl<V: Measure> Table<V> {
    /// Create an empty table with the given key columns and measure name.
    pub fn new<S: Into<String>>(columns: Vec<Column>, measure: S) -> Self {
        Table {
            columns,
            measure: measure.into(),
            rows: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Build a table from rows, summing rows that share a key.
    pub fn from_rows<S, I>(columns: Vec<Column>, measure: S, rows: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (GroupKey, V)>,
    {
        let mut table = Table::new(columns, measure);
        for (key, value) in rows {
            table.add(key, value)?;
        }
        Ok(table)
    }

    /// Add a value to a key, creating the row if needed.
    pub fn add(&mut self, key: GroupKey, value: V) -> Result<()> {
        if key.len() != self.columns.len() {
            return Err(TextmineError::invariant(
                format!("{key:?}"),
                format!("key has {} parts, table has {} columns", key.len(), self.columns.len()),
            ));
        }
        match self.index.get(&key) {
            Some(&i) => {
                let cell = &mut self.rows[i].1;
                *cell = *cell + value;
            }
            None => {
                self.index.insert(key.clone(), self.rows.len());
                self.rows.push((key, value));
            }
        }
        Ok(())
    }

    /// The value for a key.
    pub fn get(&self, key: &[Key]) -> Option<V> {
        self.index.get(key).map(|&i| self.rows[i].1)
    }

    /// The key columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Name of the measure column (`n` for counts, `value` for sums).
    pub fn measure(&self) -> &str {
        &self.measure
    }

    /// Position of a column among the key columns.
    pub fn column_position(&self, column: &Column) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// The rows in table order.
    pub fn rows(&self) -> &[(GroupKey, V)] {
        &self.rows
    }

    /// Iterate the rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, V)> {
        self.rows.iter().map(|(k, v)| (k, *v))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every cell.
    pub fn total(&self) -> V {
        self.rows
            .iter()
            .fold(V::default(), |acc, (_, value)| acc + *value)
    }

    /// A copy sorted by descending value; ties keep table order.
    pub fn sorted_desc(&self) -> Self {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.with_rows(rows)
    }

    /// The `n` highest rows, ties kept in table order.
    pub fn top(&self, n: usize) -> Self {
        let mut sorted = self.sorted_desc().rows;
        sorted.truncate(n);
        self.with_rows(sorted)
    }

    /// Keep only rows matching a predicate.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&GroupKey, V) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|(k, v)| keep(k, *v))
            .cloned()
            .collect();
        self.with_rows(rows)
    }

    fn with_rows(&self, rows: Vec<(GroupKey, V)>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
        Table {
            columns: self.columns.clone(),
            measure: self.measure.clone(),
            rows,
            index,
        }
    }
}

impl FrequencyTable {
    /// Turn a (document, term) frequency table into scorer input.
    ///
    /// `document` and `term` must both be key columns of this table; any
    /// other key columns are summed over.
    pub fn term_counts(&self, document: &Column, term: &Column) -> Result<Vec<TermCount>> {
        let position = |column: &Column| {
            self.column_position(column).ok_or_else(|| {
                TextmineError::invalid_config(format!(
                    "column {column} is not part of this frequency table"
                ))
            })
        };
        let doc_pos = position(document)?;
        let term_pos = position(term)?;

        let mut merged: Table<u64> =
            Table::new(vec![document.clone(), term.clone()], self.measure.clone());
        for (key, n) in &self.rows {
            merged.add(vec![key[doc_pos].clone(), key[term_pos].clone()], *n)?;
        }

        Ok(merged
            .rows
            .into_iter()
            .map(|(key, count)| TermCount {
                document: key[0].to_string(),
                term: key[1].to_string(),
                count,
            })
            .collect())
    }
}

impl<V: Measure> Serialize for Table<V> {
    /// Serializes as a list of row objects: key columns then the measure.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for (key, value) in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                key,
                measure: &self.measure,
                value,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a, V> {
    columns: &'a [Column],
    key: &'a [Key],
    measure: &'a str,
    value: &'a V,
}

impl<V: Serialize> Serialize for RowView<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        for (column, key) in self.columns.iter().zip(self.key) {
            map.serialize_entry(&column.to_string(), key)?;
        }
        map.serialize_entry(self.measure, self.value)?;
        map.end()
    }
}

/// Count records per grouping key.
///
/// The counts of the resulting table always sum to the number of input
/// records. An empty group-by yields a single row with an empty key (unless
/// the input is empty, which yields an empty table).
pub fn count<'a, R, I>(records: I, group_by: &[Column]) -> Result<FrequencyTable>
where
    R: Row + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut table = Table::new(group_by.to_vec(), "n");
    for record in records {
        table.add(record.group_key(group_by)?, 1)?;
    }
    debug!("counted {} groups by {:?}", table.len(), group_by);
    Ok(table)
}

/// Sum the lexicon polarity value of joined records per grouping key.
///
/// Fails with `InvalidInput` if a record carries no polarity value (e.g. a
/// label-only lexicon was joined).
pub fn sum_values<'a, R, I>(records: I, group_by: &[Column]) -> Result<ValueTable>
where
    R: Row + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut table = Table::new(group_by.to_vec(), "value");
    for record in records {
        let value = match record.key(&Column::Value) {
            Some(Key::Int(v)) => v,
            _ => {
                return Err(TextmineError::invalid_input(format!(
                    "record {:?} carries no polarity value",
                    record.key(&Column::Word).unwrap_or(Key::Null)
                )));
            }
        };
        table.add(record.group_key(group_by)?, value)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{TokenRecord, TokenTable};

    fn table(words: &[(&str, &str)]) -> TokenTable {
        words
            .iter()
            .enumerate()
            .map(|(i, (book, word))| TokenRecord::word(*word, i + 1).with_feature(book))
            .collect()
    }

    #[test]
    fn test_count_by_word() {
        let tokens = table(&[("a", "for"), ("a", "death"), ("b", "for")]);
        let counts = count(&tokens, &[Column::Word]).unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&[Key::text("for")]), Some(2));
        assert_eq!(counts.get(&[Key::text("death")]), Some(1));
        assert_eq!(counts.get(&[Key::text("me")]), None);
        assert_eq!(counts.total() as usize, tokens.len());
    }

    #[test]
    fn test_count_by_feature_and_word() {
        let tokens = table(&[("a", "for"), ("a", "death"), ("b", "for")]);
        let counts = count(&tokens, &[Column::Feature, Column::Word]).unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get(&[Key::text("b"), Key::text("for")]), Some(1));
        assert_eq!(counts.measure(), "n");
    }

    #[test]
    fn test_count_without_group() {
        let tokens = table(&[("a", "x"), ("a", "y")]);
        let counts = count(&tokens, &[]).unwrap();
        assert_eq!(counts.get(&[]), Some(2));

        let empty = count(&TokenTable::new(), &[]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_count_unknown_column() {
        let tokens = table(&[("a", "x")]);
        assert!(count(&tokens, &[Column::Sentiment]).is_err());
    }

    #[test]
    fn test_sorted_desc_is_stable() {
        let tokens = table(&[("a", "b"), ("a", "a"), ("a", "c"), ("a", "c")]);
        let counts = count(&tokens, &[Column::Word]).unwrap().sorted_desc();

        let order: Vec<String> = counts.iter().map(|(k, _)| k[0].to_string()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
        assert_eq!(counts.get(&[Key::text("b")]), Some(1));

        let top = counts.top(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top.get(&[Key::text("c")]), Some(2));
    }

    #[test]
    fn test_term_counts() {
        let tokens = table(&[("a", "x"), ("a", "x"), ("b", "x")]);
        let counts = count(&tokens, &[Column::Feature, Column::Word, Column::Line]).unwrap();

        let terms = counts.term_counts(&Column::Feature, &Column::Word).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].document, "a");
        assert_eq!(terms[0].count, 2);

        assert!(counts.term_counts(&Column::Chapter, &Column::Word).is_err());
    }

    #[test]
    fn test_serialize_rows() {
        let tokens = table(&[("emma", "miss")]);
        let counts = count(&tokens, &[Column::Feature, Column::Word]).unwrap();
        assert_eq!(
            serde_json::to_string(&counts).unwrap(),
            r#"[{"feature":"emma","word":"miss","n":1}]"#
        );
    }
}
