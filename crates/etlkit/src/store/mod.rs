//! Collaborators that move tables into and out of external stores.
//!
//! `Extractor` reads tables, `Loader` writes them, and `Spreadsheet` reads
//! and writes named sheets. The reference implementations are file- and
//! memory-backed; real database drivers implement the same traits outside
//! this crate. Every call made before `connect` fails with a connection
//! error, and `close` is idempotent.

// modules
pub mod sql;
mod session;
mod memory;
mod csv_dir;
mod workbook;

// dependencies
use std::collections::HashSet;
use std::str::FromStr;
use crate::table::{Table, key::CellKey};
use crate::error::{EtlError, Result};

// exports
pub use session::Session;
pub use memory::MemoryStore;
pub use csv_dir::CsvStore;
pub use workbook::CsvWorkbook;

/// How a loaded table combines with an existing destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Discard any existing destination rows.
    Replace,
    /// Add rows after the existing destination rows.
    #[default]
    Append,
}
impl FromStr for LoadMode {
    type Err = EtlError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(LoadMode::Replace),
            "append"  => Ok(LoadMode::Append),
            _ => Err(EtlError::Config(format!("unknown load mode '{s}', expected replace or append"))),
        }
    }
}

/// Read access to a store of named tables.
pub trait Extractor {
    /// Open the connection, failing with a connection error if the store
    /// is unreachable.
    fn connect(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;
    /// Fetch a whole table by name.
    fn get_table(&self, name: &str) -> Result<Table>;
    /// Run one SQL query against the store.
    fn execute_query(&self, sql: &str) -> Result<Table>;
    /// Release the connection; calling close more than once is harmless.
    fn close(&mut self);
}

/// Write access to a store of named tables.
pub trait Loader {
    fn load_table(&mut self, table: &Table, dest: &str, mode: LoadMode) -> Result<()>;
    /// Remove every row of a table while keeping its columns.
    fn truncate_table(&mut self, name: &str) -> Result<()>;
}

/// A workbook of named sheets, each holding one table.
pub trait Spreadsheet {
    fn sheet_names(&self) -> Result<Vec<String>>;
    fn read_sheet(&self, name: &str) -> Result<Table>;
    /// Read several sheets in the order requested.
    fn read_sheets(&self, names: &[&str]) -> Result<Vec<(String, Table)>> {
        names.iter()
            .map(|name| self.read_sheet(name).map(|table| (name.to_string(), table)))
            .collect()
    }
    fn write_sheet(&mut self, table: &Table, name: &str, mode: LoadMode) -> Result<()>;
    /// Empty a sheet, creating it if needed.
    fn clear_sheet(&mut self, name: &str) -> Result<()>;
}

// shared guard for calls made on a closed store
pub(crate) fn require_connected(connected: bool, store: &str) -> Result<()> {
    if connected {
        Ok(())
    } else {
        Err(EtlError::Connection(format!("{store} is not connected; call connect first")))
    }
}

/* -----------------------------------------------------------------------------
referential integrity and star schema loading
----------------------------------------------------------------------------- */
/// A local column whose values must exist in a column of another table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub column:     String,
    pub ref_table:  String,
    pub ref_column: String,
}
impl ForeignKey {
    pub fn new(column: &str, ref_table: &str, ref_column: &str) -> Self {
        Self {
            column:     column.to_string(),
            ref_table:  ref_table.to_string(),
            ref_column: ref_column.to_string(),
        }
    }
}

/// Verify that every non-missing value of each foreign key column exists in
/// its referenced column. The error names the distinct offending values in
/// first-seen order.
pub fn validate_foreign_keys(table: &Table, fks: &[ForeignKey], store: &impl Extractor) -> Result<()> {
    for fk in fks {
        let local = table.column(&fk.column)?;
        let referenced = store.get_table(&fk.ref_table)?;
        let ref_col = referenced.column(&fk.ref_column)?;
        let known: HashSet<CellKey> = (0..ref_col.len())
            .map(|i| CellKey::from_value(&ref_col.cell(i)))
            .collect();
        let mut seen = HashSet::new();
        let mut offending = Vec::new();
        for i in 0..local.len() {
            let value = local.cell(i);
            if value.is_missing() {
                continue;
            }
            let key = CellKey::from_value(&value);
            if !known.contains(&key) && seen.insert(key) {
                offending.push(value.to_string());
            }
        }
        if !offending.is_empty() {
            return Err(EtlError::ReferentialIntegrity {
                column:     fk.column.clone(),
                ref_table:  fk.ref_table.clone(),
                ref_column: fk.ref_column.clone(),
                values:     offending,
            });
        }
    }
    Ok(())
}

/// Load a fact table after validating its foreign keys.
pub fn load_fact<S: Extractor + Loader>(
    store: &mut S,
    table: &Table,
    dest:  &str,
    fks:   &[ForeignKey],
    mode:  LoadMode
) -> Result<()> {
    validate_foreign_keys(table, fks, store)?;
    store.load_table(table, dest, mode)
}

/// Load a dimension table, replacing any existing rows.
pub fn load_dimension<L: Loader + ?Sized>(store: &mut L, table: &Table, dest: &str) -> Result<()> {
    store.load_table(table, dest, LoadMode::Replace)
}
