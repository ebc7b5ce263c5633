//! Long-to-wide pivots.
//!
//! Pivoting spreads one key column of a long [`Table`] into columns of a
//! [`WideTable`]. Combinations absent from the long table are filled per call
//! site with an explicit [`Fill`]: zero when downstream arithmetic such as
//! `positive - negative` needs it, absent otherwise.
//!
//! # Examples
//!
//! ```
//! use textmine::aggregate::{Column, Fill, Key, Table, pivot};
//!
//! let long = Table::from_rows(
//!     vec![Column::Bucket(80), Column::Sentiment],
//!     "n",
//!     vec![
//!         (vec![Key::Int(0), Key::text("positive")], 5u64),
//!         (vec![Key::Int(0), Key::text("negative")], 2),
//!         (vec![Key::Int(1), Key::text("positive")], 1),
//!     ],
//! )
//! .unwrap();
//!
//! let wide = pivot(&long, &Column::Sentiment, Fill::Zero).unwrap();
//! let net = wide.difference(&Key::text("positive"), &Key::text("negative")).unwrap();
//! assert_eq!(net, vec![(vec![Key::Int(0)], 3), (vec![Key::Int(1)], 1)]);
//! ```

use ahash::AHashMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::aggregate::column::{Column, GroupKey, Key};
use crate::aggregate::count::{Measure, Table};
use crate::error::{Result, TextmineError};

/// How missing (row, column) combinations read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Missing cells read as the measure's zero.
    Zero,
    /// Missing cells read as `None` (null when serialized).
    Absent,
}

/// A wide table: one row per distinct row key, one column per distinct value
/// of the pivoted column, both in order of first appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct WideTable<V> {
    row_columns: Vec<Column>,
    column: Column,
    column_position: usize,
    measure: String,
    row_keys: Vec<GroupKey>,
    column_keys: Vec<Key>,
    row_index: AHashMap<GroupKey, usize>,
    col_index: AHashMap<Key, usize>,
    cells: Vec<Vec<Option<V>>>,
    fill: Fill,
}

/// Pivot `column` of a long table into wide columns.
///
/// The remaining key columns form the row key. Duplicate (row, column) pairs
/// are summed.
pub fn pivot<V: Measure>(long: &Table<V>, column: &Column, fill: Fill) -> Result<WideTable<V>> {
    let position = long.column_position(column).ok_or_else(|| {
        TextmineError::invalid_config(format!("cannot pivot on {column}: not a key column"))
    })?;

    let row_columns: Vec<Column> = long
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != position)
        .map(|(_, c)| c.clone())
        .collect();

    let mut row_index: AHashMap<GroupKey, usize> = AHashMap::new();
    let mut col_index: AHashMap<Key, usize> = AHashMap::new();
    let mut row_keys = Vec::new();
    let mut column_keys = Vec::new();
    let mut cells: Vec<Vec<Option<V>>> = Vec::new();

    for (key, value) in long.iter() {
        let mut row_key = key.clone();
        let col_key = row_key.remove(position);

        let r = *row_index.entry(row_key.clone()).or_insert_with(|| {
            row_keys.push(row_key);
            cells.push(vec![None; column_keys.len()]);
            row_keys.len() - 1
        });
        let c = *col_index.entry(col_key.clone()).or_insert_with(|| {
            column_keys.push(col_key);
            for row in cells.iter_mut() {
                row.push(None);
            }
            column_keys.len() - 1
        });

        let cell = &mut cells[r][c];
        *cell = Some(cell.map_or(value, |existing| existing + value));
    }

    Ok(WideTable {
        row_columns,
        column: column.clone(),
        column_position: position,
        measure: long.measure().to_string(),
        row_keys,
        column_keys,
        row_index,
        col_index,
        cells,
        fill,
    })
}

impl<V: Measure> WideTable<V> {
    /// The row key columns.
    pub fn row_columns(&self) -> &[Column] {
        &self.row_columns
    }

    /// The row keys in order.
    pub fn row_keys(&self) -> &[GroupKey] {
        &self.row_keys
    }

    /// The pivoted column values, in order.
    pub fn column_keys(&self) -> &[Key] {
        &self.column_keys
    }

    /// The fill policy.
    pub fn fill(&self) -> Fill {
        self.fill
    }

    fn read(&self, cell: Option<V>) -> Option<V> {
        match (cell, self.fill) {
            (Some(v), _) => Some(v),
            (None, Fill::Zero) => Some(V::default()),
            (None, Fill::Absent) => None,
        }
    }

    /// The cell for a row and column, with the fill applied.
    ///
    /// Unknown rows always read as `None`; a column never seen in the long
    /// table reads like any other missing combination.
    pub fn get(&self, row: &[Key], column: &Key) -> Option<V> {
        let r = *self.row_index.get(row)?;
        let cell = self.col_index.get(column).and_then(|&c| self.cells[r][c]);
        self.read(cell)
    }

    /// Iterate rows with the fill applied.
    pub fn rows(&self) -> impl Iterator<Item = (&GroupKey, Vec<Option<V>>)> {
        self.row_keys
            .iter()
            .zip(&self.cells)
            .map(|(key, row)| (key, row.iter().map(|c| self.read(*c)).collect()))
    }

    /// `a - b` per row, e.g. net sentiment as positive minus negative.
    ///
    /// Requires a zero-filled pivot; a missing column counts as all zeros.
    pub fn difference(&self, a: &Key, b: &Key) -> Result<Vec<(GroupKey, i64)>> {
        if self.fill != Fill::Zero {
            return Err(TextmineError::invalid_config(
                "difference requires a zero-filled pivot",
            ));
        }

        let a = self.col_index.get(a).copied();
        let b = self.col_index.get(b).copied();

        self.row_keys
            .iter()
            .zip(&self.cells)
            .map(|(row, cells)| {
                let signed = |c: Option<usize>| -> Result<i64> {
                    let value = c.and_then(|c| cells[c]).unwrap_or_default();
                    value.to_i64().ok_or_else(|| {
                        TextmineError::invariant(
                            format!("{row:?}"),
                            "cell does not fit a signed integer",
                        )
                    })
                };
                let diff = signed(a)?.checked_sub(signed(b)?).ok_or_else(|| {
                    TextmineError::invariant(format!("{row:?}"), "difference overflows")
                })?;
                Ok((row.clone(), diff))
            })
            .collect()
    }

    /// Back to long form, dropping combinations that were filled.
    ///
    /// Key columns come back in their original order, so pivoting and
    /// unpivoting reproduces the original rows.
    pub fn to_long(&self) -> Result<Table<V>> {
        let mut columns = self.row_columns.clone();
        columns.insert(self.column_position, self.column.clone());

        let mut table = Table::new(columns, self.measure.clone());
        for (row_key, row) in self.row_keys.iter().zip(&self.cells) {
            for (col_key, cell) in self.column_keys.iter().zip(row) {
                if let Some(value) = cell {
                    let mut key = row_key.clone();
                    key.insert(self.column_position, col_key.clone());
                    table.add(key, *value)?;
                }
            }
        }
        Ok(table)
    }
}

impl<V: Measure> Serialize for WideTable<V> {
    /// Serializes as a list of row objects: row key columns, then one entry
    /// per pivoted value.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.row_keys.len()))?;
        for (key, row) in self.rows() {
            seq.serialize_element(&WideRow {
                row_columns: &self.row_columns,
                key,
                column_keys: &self.column_keys,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct WideRow<'a, V> {
    row_columns: &'a [Column],
    key: &'a [Key],
    column_keys: &'a [Key],
    cells: Vec<Option<V>>,
}

impl<V: Serialize> Serialize for WideRow<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row_columns.len() + self.cells.len()))?;
        for (column, key) in self.row_columns.iter().zip(self.key) {
            map.serialize_entry(&column.to_string(), key)?;
        }
        for (column, cell) in self.column_keys.iter().zip(&self.cells) {
            map.serialize_entry(&column.to_string(), cell)?;
        }
        map.end()
    }
}
