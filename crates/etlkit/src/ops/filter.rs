//! Row filters. Each filter keeps the rows whose predicate is true, as a
//! stable subsequence of the input with the column set unchanged.
//!
//! Predicates are three-valued: a missing cell yields "unknown", which never
//! matches. With `complement` set, a filter returns the exact set difference
//! of its match set, so rows with unknown predicates always land in the
//! complement and every input row lands in exactly one of the two results.

// dependencies
use std::collections::HashSet;
use crate::table::{Row, Table, Value, key::CellKey};
use crate::error::{EtlError, Result};

// select rows by a three-valued cell predicate over one column
fn kept_rows(
    table:      &Table,
    col_name:   &str,
    complement: bool,
    predicate:  impl Fn(&Value) -> Option<bool>,
) -> Result<Table> {
    let col = table.column(col_name)?;
    let rows: Vec<usize> = (0..table.n_row())
        .filter(|&i| predicate(&col.cell(i)).unwrap_or(false) != complement)
        .collect();
    Ok(table.take_rows(&rows))
}

/// Keep rows where the column equals `value`.
pub fn equal(table: &Table, col_name: &str, value: impl Into<Value>, complement: bool) -> Result<Table> {
    let value = value.into();
    kept_rows(table, col_name, complement, |cell| cell.equals(&value))
}

/// Keep rows where the column does not equal `value`; the exact complement
/// of `equal`, so rows with missing values are kept.
pub fn not_equal(table: &Table, col_name: &str, value: impl Into<Value>, complement: bool) -> Result<Table> {
    equal(table, col_name, value, !complement)
}

/// Keep rows where `low <= value <= high`. Both bounds must be numeric.
pub fn in_range(
    table:      &Table,
    col_name:   &str,
    low:        impl Into<Value>,
    high:       impl Into<Value>,
    complement: bool,
) -> Result<Table> {
    let (low, high) = (low.into(), high.into());
    if !low.is_numeric() || !high.is_numeric() {
        return Err(EtlError::type_error(format!(
            "in_range bounds must be numeric, got {low} and {high}"
        )));
    }
    kept_rows(table, col_name, complement, |cell| {
        let above = cell.compare(&low)?.is_ge();
        let below = cell.compare(&high)?.is_le();
        Some(above && below)
    })
}

/// Keep rows whose value, coerced to text, contains `pattern`.
pub fn contains(table: &Table, col_name: &str, pattern: &str, complement: bool) -> Result<Table> {
    kept_rows(table, col_name, complement, |cell| {
        cell.to_text().map(|text| text.contains(pattern))
    })
}

/// Keep rows whose value is one of `values`.
pub fn in_set<I, V>(table: &Table, col_name: &str, values: I, complement: bool) -> Result<Table>
where I: IntoIterator<Item = V>, V: Into<Value> {
    let set: HashSet<CellKey> = values.into_iter()
        .map(|v| CellKey::from_value(&v.into()))
        .filter(|k| *k != CellKey::Missing)
        .collect();
    kept_rows(table, col_name, complement, |cell| {
        if cell.is_missing() { None } else { Some(set.contains(&CellKey::from_value(cell))) }
    })
}

/// Keep rows where the column is missing.
pub fn is_null(table: &Table, col_name: &str, complement: bool) -> Result<Table> {
    kept_rows(table, col_name, complement, |cell| Some(cell.is_missing()))
}

/// Keep rows where the column is not missing.
pub fn not_null(table: &Table, col_name: &str, complement: bool) -> Result<Table> {
    is_null(table, col_name, !complement)
}

/// Keep rows where `op(cell, value)` is true. The operation is only invoked
/// for non-missing cells.
pub fn by_operation(
    table:      &Table,
    col_name:   &str,
    op:         impl Fn(&Value, &Value) -> bool,
    value:      impl Into<Value>,
    complement: bool,
) -> Result<Table> {
    let value = value.into();
    kept_rows(table, col_name, complement, |cell| {
        if cell.is_missing() { None } else { Some(op(cell, &value)) }
    })
}

/// Keep rows for which a row-wise condition holds. Errors raised by the
/// condition, e.g., an unknown column, abort the filter.
pub fn by_condition(
    table:      &Table,
    condition:  impl Fn(&Row) -> Result<bool>,
    complement: bool,
) -> Result<Table> {
    let mut rows = Vec::new();
    for row in table.rows() {
        if condition(&row)? != complement {
            rows.push(row.index());
        }
    }
    Ok(table.take_rows(&rows))
}

/// Keep rows where any column's text contains `pattern`.
pub fn search_in_table(table: &Table, pattern: &str, complement: bool) -> Result<Table> {
    let cols = table.col_names().iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>>>()?;
    let rows: Vec<usize> = (0..table.n_row())
        .filter(|&i| {
            let found = cols.iter().any(|col| {
                !col.is_missing(i) && col.cell_string(i).contains(pattern)
            });
            found != complement
        })
        .collect();
    Ok(table.take_rows(&rows))
}

/// Return the distinct non-missing values of a column in first-seen order.
pub fn unique_values(table: &Table, col_name: &str) -> Result<Vec<Value>> {
    let mut seen: HashSet<CellKey> = HashSet::new();
    Ok(table.column(col_name)?.values()
        .filter(|value| !value.is_missing())
        .filter(|value| seen.insert(CellKey::from_value(value)))
        .collect())
}
