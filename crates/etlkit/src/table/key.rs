//! Hashable cell and row keys supporting row-to-row equality for joining,
//! grouping and de-duplication.
//!
//! A CellKey normalizes a Value so that equal cells hash equally: integral
//! Numeric values key as Integer, and -0.0 keys as 0. Missing is its own key
//! value, so grouping buckets missing together, while joins must check
//! `RowKey::has_missing` and refuse to match such rows.

// dependencies
use chrono::NaiveDateTime;
use super::{Table, Value};
use crate::error::Result;

/// A CellKey is a hashable, normalized form of one cell value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellKey {
    Missing,
    Integer(i64),
    Numeric(u64), // f64 bits
    Logical(bool),
    Timestamp(NaiveDateTime),
    Text(String),
}
impl CellKey {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Missing      => CellKey::Missing,
            Value::Integer(x)   => CellKey::Integer(*x),
            Value::Numeric(x)   => {
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                    CellKey::Integer(*x as i64)
                } else if x.is_nan() {
                    CellKey::Numeric(f64::NAN.to_bits())
                } else {
                    CellKey::Numeric(x.to_bits())
                }
            },
            Value::Logical(x)   => CellKey::Logical(*x),
            Value::Timestamp(x) => CellKey::Timestamp(*x),
            Value::Text(x)      => CellKey::Text(x.clone()),
        }
    }
}

/// A RowKey collects the CellKeys of one row over a list of key columns.
/// The first CellKey is the major key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey(pub Vec<CellKey>);
impl RowKey {
    pub fn has_missing(&self) -> bool {
        self.0.iter().any(|k| *k == CellKey::Missing)
    }
}

/// Calculate one RowKey per table row over the named key columns.
/// An empty column list keys every column.
pub fn row_keys<S: AsRef<str>>(table: &Table, key_cols: &[S]) -> Result<Vec<RowKey>> {
    let cols = if key_cols.is_empty() {
        table.col_names().iter()
            .map(|name| table.column(name))
            .collect::<Result<Vec<_>>>()?
    } else {
        key_cols.iter()
            .map(|name| table.column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?
    };
    Ok((0..table.n_row()).map(|i| {
        RowKey(cols.iter().map(|col| CellKey::from_value(&col.cell(i))).collect())
    }).collect())
}
