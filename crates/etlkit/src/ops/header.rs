//! Column header operations: renaming, replacing, dropping and selecting
//! columns. Every operation returns a new table.

// dependencies
use std::collections::{HashMap, HashSet};
use crate::table::Table;
use crate::error::{EtlError, Result};

/// Rename columns per a `(from, to)` mapping; unmapped columns pass through.
/// Fails if any source name is absent, or if a new name collides with
/// another column.
pub fn rename<S: AsRef<str>, T: AsRef<str>>(table: &Table, mapping: &[(S, T)]) -> Result<Table> {
    let mut lookup: HashMap<&str, &str> = HashMap::with_capacity(mapping.len());
    for (from, to) in mapping {
        let from = from.as_ref();
        if !table.has_col(from) {
            return Err(EtlError::column_not_found(from));
        }
        lookup.insert(from, to.as_ref());
    }
    let col_names = table.col_names().iter()
        .map(|name| lookup.get(name.as_str()).map_or_else(|| name.clone(), |to| to.to_string()))
        .collect();
    let mut renamed = table.clone();
    renamed.set_col_names(col_names)?;
    Ok(renamed)
}

/// Replace every column name in positional order.
pub fn replace_all_headers<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let mut renamed = table.clone();
    renamed.set_col_names(names.iter().map(|s| s.as_ref().to_string()).collect())?;
    Ok(renamed)
}

/// Remove named columns; unknown names are silently ignored.
pub fn drop<S: AsRef<str>>(table: &Table, names: &[S]) -> Table {
    let mut dropped = table.clone();
    for name in names {
        // absent columns are a no-op
        let _ = dropped.drop_col(name.as_ref());
    }
    dropped
}

pub fn add_prefix(table: &Table, prefix: &str) -> Table {
    table.map_col_names(|name| format!("{prefix}{name}"))
}

pub fn add_suffix(table: &Table, suffix: &str) -> Table {
    table.map_col_names(|name| format!("{name}{suffix}"))
}

/// Keep the listed columns in the listed order, failing on unknown names.
/// With `complement`, keep every column not listed, in table order, and
/// ignore unknown names.
pub fn select<S: AsRef<str>>(table: &Table, names: &[S], complement: bool) -> Result<Table> {
    if complement {
        let excluded: HashSet<&str> = names.iter().map(|s| s.as_ref()).collect();
        let kept: Vec<&String> = table.col_names().iter()
            .filter(|name| !excluded.contains(name.as_str()))
            .collect();
        table.retain_cols(&kept)
    } else {
        table.retain_cols(names)
    }
}
