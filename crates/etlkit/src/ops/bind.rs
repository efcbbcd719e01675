//! Vertical concatenation of tables.

// dependencies
use crate::table::{Column, DataType, Table};
use crate::error::{EtlError, Result};

/// Append the rows of several tables in order. The output columns are the
/// union of input columns in first-seen order; tables lacking a column
/// contribute missing values. Mismatched column types widen to a common type.
pub fn union_all(tables: &[&Table]) -> Result<Table> {
    if tables.is_empty() {
        return Err(EtlError::type_error("union_all requires a non-empty list of tables"));
    }

    // first-seen union of column names, with the first type seen for each
    let mut col_names: Vec<&String> = Vec::new();
    for table in tables {
        for name in table.col_names() {
            if !col_names.contains(&name) {
                col_names.push(name);
            }
        }
    }

    let mut bound = Table::new();
    for name in col_names {
        let fill_type = tables.iter()
            .find_map(|table| table.col_type(name).ok())
            .unwrap_or(DataType::Text);
        let parts = tables.iter()
            .map(|table| match table.column(name) {
                Ok(col) => col.clone(),
                Err(_) => Column::missing(fill_type, table.n_row()),
            })
            .collect::<Vec<Column>>();
        bound.add_col(name.as_str(), Column::concat(&parts))?;
    }
    Ok(bound)
}
