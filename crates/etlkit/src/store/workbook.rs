//! A directory-backed workbook, one `<sheet>.csv` file per sheet.

// dependencies
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use glob::{glob, Pattern};
use super::{Spreadsheet, LoadMode};
use crate::table::Table;
use crate::ops::bind::union_all;
use crate::error::{EtlError, Result};

#[derive(Debug)]
pub struct CsvWorkbook {
    dir: PathBuf,
}
impl CsvWorkbook {
    /// Open an existing workbook directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(EtlError::Connection(format!("workbook directory {} does not exist", dir.display())));
        }
        Ok(Self { dir })
    }
    /// Open a workbook directory, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
    pub fn dir(&self) -> &Path {
        &self.dir
    }
    fn sheet_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(EtlError::Query(format!("invalid sheet name '{name}'")));
        }
        Ok(self.dir.join(format!("{name}.csv")))
    }
}

impl Spreadsheet for CsvWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        let pattern = format!("{}/*.csv", Pattern::escape(&self.dir.to_string_lossy()));
        let paths = glob(&pattern).map_err(|e| EtlError::Query(format!("bad sheet pattern {pattern}: {e}")))?;
        let mut names = Vec::new();
        for path in paths {
            let path = path.map_err(std::io::Error::from)?;
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }
    fn read_sheet(&self, name: &str) -> Result<Table> {
        let path = self.sheet_path(name)?;
        if !path.is_file() {
            return Err(EtlError::Query(format!("sheet '{name}' not found in {}", self.dir.display())));
        }
        Table::read_csv_file(&path)
    }
    fn write_sheet(&mut self, table: &Table, name: &str, mode: LoadMode) -> Result<()> {
        let path = self.sheet_path(name)?;
        if mode == LoadMode::Append && path.is_file() {
            let existing = Table::read_csv_file(&path)?;
            union_all(&[&existing, table])?.write_csv_file(&path)
        } else {
            table.write_csv_file(&path)
        }
    }
    fn clear_sheet(&mut self, name: &str) -> Result<()> {
        File::create(self.sheet_path(name)?)?;
        Ok(())
    }
}
