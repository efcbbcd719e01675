//! Row transforms: computed columns, elementwise updates, sorting,
//! de-duplication, value replacement and string splitting.

// dependencies
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use crate::table::{Column, Row, Table, Value, key::{CellKey, row_keys}};
use crate::error::{EtlError, Result};

// infer a column from computed values, keeping a fallback type when nothing
// but missing values were produced
fn column_or_type(values: Vec<Value>, fallback: &Column) -> Column {
    if values.iter().all(Value::is_missing) {
        Column::missing(fallback.data_type(), values.len())
    } else {
        Column::from_values(values)
    }
}

/// Evaluate `f` once per row and store the results as column `name`,
/// appended to the table or overwriting an existing column of that name.
pub fn add_column(table: &Table, name: &str, f: impl Fn(&Row) -> Result<Value>) -> Result<Table> {
    let values = table.rows().map(|row| f(&row)).collect::<Result<Vec<Value>>>()?;
    let col = match table.column(name) {
        Ok(existing) => column_or_type(values, existing),
        Err(_) => Column::from_values(values),
    };
    let mut added = table.clone();
    added.replace_or_add_col(name, col)?;
    Ok(added)
}

/// Replace a column's values by applying `f` to every cell, missing included.
pub fn apply_to_column(table: &Table, name: &str, f: impl Fn(&Value) -> Value) -> Result<Table> {
    let col = table.column(name)?;
    let values: Vec<Value> = col.values().map(|value| f(&value)).collect();
    let mut applied = table.clone();
    applied.replace_or_add_col(name, column_or_type(values, col))?;
    Ok(applied)
}

/* -----------------------------------------------------------------------------
sorting
----------------------------------------------------------------------------- */
// values used as sort keys; ordered categories sort by category rank
fn sort_values(col: &Column) -> Vec<Value> {
    match col {
        Column::Category(f) if f.ordered => (0..f.data.len())
            .map(|i| f.code(i).map_or(Value::Missing, |code| Value::Integer(code as i64)))
            .collect(),
        col => col.values().collect(),
    }
}

/// Stable multi-key sort. `ascending` holds one flag for all keys or one
/// flag per key. Missing values sort last in both directions.
pub fn sort<S: AsRef<str>>(table: &Table, keys: &[S], ascending: &[bool]) -> Result<Table> {
    if ascending.len() != 1 && ascending.len() != keys.len() {
        return Err(EtlError::shape(format!(
            "sort got {} ascending flags for {} keys", ascending.len(), keys.len()
        )));
    }
    let key_values = keys.iter()
        .map(|key| table.column(key.as_ref()).map(sort_values))
        .collect::<Result<Vec<_>>>()?;
    let mut rows: Vec<usize> = (0..table.n_row()).collect();
    rows.sort_by(|&a, &b| {
        for (j, values) in key_values.iter().enumerate() {
            let asc = if ascending.len() == 1 { ascending[0] } else { ascending[j] };
            let (va, vb) = (&values[a], &values[b]);
            let ord = match (va.is_missing(), vb.is_missing()) {
                (true, true)   => Ordering::Equal,
                (true, false)  => Ordering::Greater,
                (false, true)  => Ordering::Less,
                (false, false) => {
                    let ord = va.sort_cmp(vb);
                    if asc { ord } else { ord.reverse() }
                },
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(table.take_rows(&rows))
}

/// Keep the first row per distinct combination of `subset` values, or of
/// all columns when `subset` is empty. Missing values compare equal here.
pub fn drop_duplicates<S: AsRef<str>>(table: &Table, subset: &[S]) -> Result<Table> {
    let mut seen = HashSet::new();
    let rows: Vec<usize> = row_keys(table, subset)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, key)| seen.insert(key).then_some(i))
        .collect();
    Ok(table.take_rows(&rows))
}

/// Substitute values in a column. With equal-length `old` and `new`, pairs
/// are matched positionally; a single `new` value replaces every `old`
/// value. Any other combination is a ShapeError.
pub fn replace_values<V, W>(
    table: &Table,
    name:  &str,
    old:   impl IntoIterator<Item = V>,
    new:   impl IntoIterator<Item = W>,
) -> Result<Table>
where V: Into<Value>, W: Into<Value> {
    let old: Vec<Value> = old.into_iter().map(Into::into).collect();
    let new: Vec<Value> = new.into_iter().map(Into::into).collect();
    let lookup: HashMap<CellKey, Value> = match new.len() {
        n if n == old.len() => old.iter().zip(new).map(|(o, n)| (CellKey::from_value(o), n)).collect(),
        1 => old.iter().map(|o| (CellKey::from_value(o), new[0].clone())).collect(),
        n => return Err(EtlError::shape(format!(
            "replace_values got {} old values and {n} new values", old.len()
        ))),
    };
    apply_to_column(table, name, |value| {
        lookup.get(&CellKey::from_value(value)).cloned().unwrap_or_else(|| value.clone())
    })
}

/* -----------------------------------------------------------------------------
string splitting
----------------------------------------------------------------------------- */
/// Explode a delimited text column into one row per part; other columns
/// are repeated. Missing cells keep a single row with a missing value.
pub fn split_column_into_rows(table: &Table, name: &str, delimiter: &str) -> Result<Table> {
    let mut rows: Vec<usize> = Vec::new();
    let mut parts: Vec<Option<String>> = Vec::new();
    for (i, value) in table.column(name)?.values().enumerate() {
        match value.to_text() {
            None => {
                rows.push(i);
                parts.push(None);
            },
            Some(text) => for part in text.split(delimiter) {
                rows.push(i);
                parts.push(Some(part.trim().to_string()));
            },
        }
    }
    let mut exploded = table.take_rows(&rows);
    exploded.replace_or_add_col(name, parts)?;
    Ok(exploded)
}

/// Split a delimited text column into new Text columns appended to the
/// table, named by `new_names` or `<name>_1..n` when none are given. Rows
/// with fewer parts are filled with missing values.
pub fn split_string_column<S: AsRef<str>>(
    table:     &Table,
    name:      &str,
    delimiter: &str,
    new_names: &[S],
) -> Result<Table> {
    let split: Vec<Option<Vec<String>>> = table.column(name)?.values()
        .map(|value| value.to_text().map(|text| {
            text.split(delimiter).map(|part| part.trim().to_string()).collect()
        }))
        .collect();
    let n_parts = split.iter().flatten().map(Vec::len).max().unwrap_or(0);
    let new_names: Vec<String> = if new_names.is_empty() {
        (1..=n_parts).map(|j| format!("{name}_{j}")).collect()
    } else if new_names.len() == n_parts {
        new_names.iter().map(|s| s.as_ref().to_string()).collect()
    } else {
        return Err(EtlError::shape(format!(
            "column '{name}' splits into {n_parts} parts, {} names supplied", new_names.len()
        )));
    };
    let mut expanded = table.clone();
    for (j, new_name) in new_names.into_iter().enumerate() {
        let data: Vec<Option<String>> = split.iter()
            .map(|parts| parts.as_ref().and_then(|parts| parts.get(j).cloned()))
            .collect();
        expanded.replace_or_add_col(new_name, data)?;
    }
    Ok(expanded)
}
