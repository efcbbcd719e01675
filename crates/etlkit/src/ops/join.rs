//! Relational joins by the hash join algorithm.
//!
//! Output columns are all left columns followed by the right columns, minus
//! right key columns that share their name with the left key. Other name
//! collisions are disambiguated with `_x` (left) and `_y` (right) suffixes.
//! Key values containing missing never match.

// dependencies
use std::collections::{HashMap, HashSet};
use crate::table::{Column, Table, Value, key::{RowKey, row_keys}};
use crate::error::{EtlError, Result};

pub const LEFT_SUFFIX:  &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

/// Enumeration of supported join types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Outer,
}

/// Join key columns as parallel lists of left and right column names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinKeys {
    left:  Vec<String>,
    right: Vec<String>,
}
impl JoinKeys {
    /// Join on a single column name present in both tables.
    pub fn on(name: &str) -> Self {
        Self::shared(&[name])
    }
    /// Join on several column names present in both tables.
    pub fn shared<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        Self { left: names.clone(), right: names }
    }
    /// Join a left column to a differently named right column.
    pub fn pair(left: &str, right: &str) -> Self {
        Self::pairs(&[(left, right)])
    }
    /// Join on several (left, right) column name pairs.
    pub fn pairs<S: AsRef<str>, T: AsRef<str>>(pairs: &[(S, T)]) -> Self {
        Self {
            left:  pairs.iter().map(|(l, _)| l.as_ref().to_string()).collect(),
            right: pairs.iter().map(|(_, r)| r.as_ref().to_string()).collect(),
        }
    }
    // right key columns merged into the same-named left key column
    fn shared_names(&self) -> HashSet<&str> {
        self.left.iter().zip(&self.right)
            .filter(|(l, r)| l == r)
            .map(|(l, _)| l.as_str())
            .collect()
    }
}

// map each usable key to its row indices, in table order
fn key_index(keys: &[RowKey]) -> HashMap<&RowKey, Vec<usize>> {
    let mut index: HashMap<&RowKey, Vec<usize>> = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        if !key.has_missing() {
            index.entry(key).or_default().push(i);
        }
    }
    index
}

// pair up left and right row indices in output order
fn match_rows(left_keys: &[RowKey], right_keys: &[RowKey], kind: JoinKind) -> Vec<(Option<usize>, Option<usize>)> {
    let mut pairs = Vec::new();
    if kind == JoinKind::Right {
        let left_index = key_index(left_keys);
        for (i_r, key) in right_keys.iter().enumerate() {
            match left_index.get(key) {
                Some(is_l) => is_l.iter().for_each(|i_l| pairs.push((Some(*i_l), Some(i_r)))),
                None => pairs.push((None, Some(i_r))),
            }
        }
        return pairs;
    }
    let right_index = key_index(right_keys);
    let mut matched_r = vec![false; right_keys.len()];
    for (i_l, key) in left_keys.iter().enumerate() {
        match right_index.get(key) {

            // inner joined rows
            Some(is_r) => is_r.iter().for_each(|i_r| {
                matched_r[*i_r] = true;
                pairs.push((Some(i_l), Some(*i_r)));
            }),

            // left join rows with no right side match
            None if kind != JoinKind::Inner => pairs.push((Some(i_l), None)),
            None => {},
        }
    }

    // fill in the tail of unmatched right rows on outer joins
    if kind == JoinKind::Outer {
        matched_r.iter().enumerate()
            .filter(|(_, matched)| !**matched)
            .for_each(|(i_r, _)| pairs.push((None, Some(i_r))));
    }
    pairs
}

/// Merge two tables by key columns, i.e., left, right, inner, and outer joins.
pub fn join(left: &Table, right: &Table, keys: &JoinKeys, kind: JoinKind) -> Result<Table> {
    if keys.left.is_empty() || keys.left.len() != keys.right.len() {
        return Err(EtlError::shape("join requires one or more key columns on each side"));
    }
    let pairs = match_rows(&row_keys(left, &keys.left)?, &row_keys(right, &keys.right)?, kind);
    let rows_l: Vec<Option<usize>> = pairs.iter().map(|(l, _)| *l).collect();
    let rows_r: Vec<Option<usize>> = pairs.iter().map(|(_, r)| *r).collect();

    // establish output column names, suffixing colliding non-key columns
    let shared = keys.shared_names();
    let cols_r: Vec<&String> = right.col_names().iter()
        .filter(|name| !shared.contains(name.as_str()))
        .collect();
    let collides = |name: &str| {
        !shared.contains(name) && left.has_col(name) && cols_r.iter().any(|r| *r == name)
    };

    // assemble left columns, filling shared keys from the right for right-only rows
    let mut joined = Table::new();
    for name in left.col_names() {
        let col_l = left.column(name)?;
        let col = if shared.contains(name.as_str()) {
            let col_r = right.column(name)?;
            let values: Vec<Value> = pairs.iter().map(|pair| match pair {
                (Some(i_l), _)    => col_l.cell(*i_l),
                (None, Some(i_r)) => col_r.cell(*i_r),
                (None, None)      => Value::Missing,
            }).collect();
            Column::from_values_as(col_l.data_type().widen(col_r.data_type()), values)
        } else {
            col_l.take_opt(&rows_l)
        };
        let out_name = if collides(name.as_str()) { format!("{name}{LEFT_SUFFIX}") } else { name.clone() };
        joined.add_col(out_name, col)?;
    }

    // assemble right columns
    for name in &cols_r {
        let out_name = if collides(name.as_str()) { format!("{name}{RIGHT_SUFFIX}") } else { name.to_string() };
        joined.add_col(out_name, right.column(name)?.take_opt(&rows_r))?;
    }
    Ok(joined)
}
