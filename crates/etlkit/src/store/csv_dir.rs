//! A store backed by a directory of CSV files, one file per table.

// dependencies
use std::path::{Path, PathBuf};
use super::{Extractor, Loader, LoadMode, require_connected, sql};
use crate::table::Table;
use crate::ops::bind::union_all;
use crate::error::{EtlError, Result};

const STORE: &str = "CSV store";

/// CsvStore reads and writes tables as `<table>.csv` or `<table>.csv.gz`
/// files in a root directory. New tables are written uncompressed.
#[derive(Debug)]
pub struct CsvStore {
    root:      PathBuf,
    connected: bool,
}
impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), connected: false }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    // locate an existing table file, preferring plain csv
    fn find(&self, name: &str) -> Result<Option<PathBuf>> {
        check_name(name)?;
        for ext in ["csv", "csv.gz"] {
            let path = self.root.join(format!("{name}.{ext}"));
            if path.is_file() {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
    fn existing(&self, name: &str) -> Result<PathBuf> {
        self.find(name)?
            .ok_or_else(|| EtlError::Query(format!("table '{name}' does not exist in {}", self.root.display())))
    }
}

// table names map to file stems, so they cannot walk out of the root
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        Err(EtlError::Query(format!("invalid table name '{name}'")))
    } else {
        Ok(())
    }
}

impl Extractor for CsvStore {
    fn connect(&mut self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(EtlError::Connection(format!(
                "{STORE} directory {} does not exist", self.root.display()
            )));
        }
        self.connected = true;
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
    fn get_table(&self, name: &str) -> Result<Table> {
        require_connected(self.connected, STORE)?;
        Table::read_csv_file(&self.existing(name)?)
    }
    fn execute_query(&self, sql: &str) -> Result<Table> {
        require_connected(self.connected, STORE)?;
        sql::execute(sql, |name| self.get_table(name))
    }
    fn close(&mut self) {
        self.connected = false;
    }
}

impl Loader for CsvStore {
    fn load_table(&mut self, table: &Table, dest: &str, mode: LoadMode) -> Result<()> {
        require_connected(self.connected, STORE)?;
        match (mode, self.find(dest)?) {
            (LoadMode::Append, Some(path)) => {
                let existing = Table::read_csv_file(&path)?;
                union_all(&[&existing, table])?.write_csv_file(&path)
            },
            (LoadMode::Replace, Some(path)) => table.write_csv_file(&path),
            (_, None) => table.write_csv_file(&self.root.join(format!("{dest}.csv"))),
        }
    }
    fn truncate_table(&mut self, name: &str) -> Result<()> {
        require_connected(self.connected, STORE)?;
        let path = self.existing(name)?;
        let table = Table::read_csv_file(&path)?;
        table.take_rows(&[]).write_csv_file(&path)
    }
}
