//! An in-memory store of named tables.

// dependencies
use std::collections::HashMap;
use super::{Extractor, Loader, LoadMode, require_connected, sql};
use crate::table::Table;
use crate::ops::bind::union_all;
use crate::error::{EtlError, Result};

const STORE: &str = "memory store";

/// MemoryStore keeps named tables in a HashMap. It serves tests and demos,
/// and can be built unreachable to exercise connection failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables:      HashMap<String, Table>,
    reachable:   bool,
    connected:   bool,
    n_closes:    usize,
}
impl MemoryStore {
    pub fn new() -> Self {
        Self { reachable: true, ..Default::default() }
    }
    /// A store whose `connect` always fails.
    pub fn unreachable() -> Self {
        Self::default()
    }
    /// Add a table before connecting, builder style.
    pub fn with_table(mut self, name: &str, table: Table) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }
    /// Inspect a stored table without connecting.
    pub fn peek(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
    /// Sorted names of all stored tables.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }
    /// How many times `close` has been called.
    pub fn n_closes(&self) -> usize {
        self.n_closes
    }
}

impl Extractor for MemoryStore {
    fn connect(&mut self) -> Result<()> {
        if !self.reachable {
            return Err(EtlError::Connection(format!("{STORE} is unreachable")));
        }
        self.connected = true;
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
    fn get_table(&self, name: &str) -> Result<Table> {
        require_connected(self.connected, STORE)?;
        self.tables.get(name)
            .cloned()
            .ok_or_else(|| EtlError::Query(format!("table '{name}' does not exist")))
    }
    fn execute_query(&self, sql: &str) -> Result<Table> {
        require_connected(self.connected, STORE)?;
        sql::execute(sql, |name| self.get_table(name))
    }
    fn close(&mut self) {
        self.connected = false;
        self.n_closes += 1;
    }
}

impl Loader for MemoryStore {
    fn load_table(&mut self, table: &Table, dest: &str, mode: LoadMode) -> Result<()> {
        require_connected(self.connected, STORE)?;
        let loaded = match (mode, self.tables.get(dest)) {
            (LoadMode::Append, Some(existing)) => union_all(&[existing, table])?,
            _ => table.clone(),
        };
        self.tables.insert(dest.to_string(), loaded);
        Ok(())
    }
    fn truncate_table(&mut self, name: &str) -> Result<()> {
        require_connected(self.connected, STORE)?;
        let table = self.tables.get_mut(name)
            .ok_or_else(|| EtlError::Query(format!("table '{name}' does not exist")))?;
        *table = table.take_rows(&[]);
        Ok(())
    }
}
