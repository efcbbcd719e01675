//! `table::Table` is an in-memory, ordered, columnar data structure stored
//! as a HashMap of named columns plus the ordered list of column names.
//! Different columns can hold different logical data types, each stored as
//! one `Vec<Option<T>>`, where `None` is the Missing marker.
//!
//! Tables are values: every operation in `ops` takes tables by reference and
//! returns a new table, so no other holder observes a change.
//!
//! # Quick Start
//! ```rust
//! use etlkit::prelude::*;
//!
//! # fn main() -> etlkit::Result<()> {
//! let orders = table!(
//!     id          = vec![1, 2, 3],
//!     customer_id = vec![10, 11, 10],
//!     total       = vec![Some(500), Some(1500), None], // None is a missing value
//! )?;
//! eprintln!("{}", orders.head(5));
//! # Ok(())
//! # }
//! ```

// modules
pub mod value;
pub mod column;
pub mod key;
pub mod display;
pub mod io;
pub mod agg;
#[macro_use]
pub mod macros;

// dependencies
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::error::{EtlError, Result};
pub use value::Value;
pub use column::{Column, CategoryColumn};

/* -----------------------------------------------------------------------------
logical data types
----------------------------------------------------------------------------- */
/// The logical type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Numeric,
    Logical,
    Timestamp,
    Text,
    Category,
}
impl DataType {
    /// Return the common type of two column types: Integer and Numeric
    /// widen to Numeric, any other mismatch falls back to Text.
    pub fn widen(self, other: DataType) -> DataType {
        match (self, other) {
            (a, b) if a == b => a,
            (DataType::Integer, DataType::Numeric) |
            (DataType::Numeric, DataType::Integer) => DataType::Numeric,
            _ => DataType::Text,
        }
    }
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Numeric)
    }
}
impl Display for DataType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            DataType::Integer   => "integer",
            DataType::Numeric   => "numeric",
            DataType::Logical   => "logical",
            DataType::Timestamp => "timestamp",
            DataType::Text      => "text",
            DataType::Category  => "category",
        };
        write!(f, "{name}")
    }
}

/* -----------------------------------------------------------------------------
Table structure definition; metadata and a set of named Column instances.
----------------------------------------------------------------------------- */
/// A Table is a columnar data structure stored as a HashMap of named Columns.
#[derive(Clone, Debug)]
pub struct Table {
    n_row:     usize,
    columns:   HashMap<String, Column>,
    col_names: Vec<String>,
    pub print_max_rows:      usize,
    pub print_max_col_width: usize,
}
impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
// tables compare by content; display settings are ignored
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.n_row == other.n_row &&
        self.col_names == other.col_names &&
        self.col_names.iter().all(|name| self.columns.get(name) == other.columns.get(name))
    }
}
impl Table {
    /* -----------------------------------------------------------------------------
    Table constructors
    ----------------------------------------------------------------------------- */
    /// Create a new, empty Table, to which you subsequently add Columns.
    pub fn new() -> Self {
        Self {
            n_row:     0,
            columns:   HashMap::new(),
            col_names: Vec::new(),
            print_max_rows:      20,
            print_max_col_width: 25,
        }
    }
    /// Create a Table from an ordered list of named columns.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut table = Table::new();
        for (col_name, col) in columns {
            table.add_col(col_name, col)?;
        }
        Ok(table)
    }
    /// Create a new table from rows of an existing one, i.e., take a
    /// potentially non-contiguous selection of rows in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        self.map_columns(|col| col.take(rows), rows.len())
    }
    /// Like `take_rows`, but `None` positions yield all-missing rows.
    pub fn take_rows_opt(&self, rows: &[Option<usize>]) -> Self {
        self.map_columns(|col| col.take_opt(rows), rows.len())
    }
    fn map_columns(&self, f: impl Fn(&Column) -> Column, n_row: usize) -> Self {
        let columns = self.col_names.iter()
            .filter_map(|name| self.columns.get(name).map(|col| (name.clone(), f(col))))
            .collect();
        Self {
            n_row,
            columns,
            col_names: self.col_names.clone(),
            print_max_rows:      self.print_max_rows,
            print_max_col_width: self.print_max_col_width,
        }
    }

    /* -----------------------------------------------------------------------------
    Table dimensions and schema
    ----------------------------------------------------------------------------- */
    pub fn n_row(&self) -> usize {
        self.n_row
    }
    pub fn n_col(&self) -> usize {
        self.col_names.len()
    }
    /// Return the column names in table order.
    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }
    pub fn has_col(&self, col_name: &str) -> bool {
        self.columns.contains_key(col_name)
    }
    /// True if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.col_names.is_empty()
    }
    pub fn col_type(&self, col_name: &str) -> Result<DataType> {
        self.column(col_name).map(Column::data_type)
    }

    /* -----------------------------------------------------------------------------
    Table column-level getters and setters
    ----------------------------------------------------------------------------- */
    /// Return a named column, failing if it is absent from the header.
    pub fn column(&self, col_name: &str) -> Result<&Column> {
        self.columns.get(col_name).ok_or_else(|| EtlError::column_not_found(col_name))
    }
    /// Add a new column to a Table.
    ///
    /// If any existing columns or the new column have zero or one rows, they
    /// are recycled to the length of the other column(s) using missing or the
    /// single value, respectively. Otherwise, the number of rows in the new
    /// column must match the number of rows in the Table.
    ///
    /// New columns must be named differently than any existing columns.
    pub fn add_col(&mut self, col_name: impl Into<String>, col: impl Into<Column>) -> Result<&mut Self> {
        let col_name = col_name.into();
        if self.columns.contains_key(&col_name) {
            return Err(EtlError::DuplicateColumn(col_name));
        }
        let col = self.fit_col(&col_name, col.into())?;
        self.columns.insert(col_name.clone(), col);
        self.col_names.push(col_name); // keep track of column creation order
        Ok(self)
    }
    // recycle either the table or the incoming column so their lengths agree
    fn fit_col(&mut self, col_name: &str, mut col: Column) -> Result<Column> {
        let n_row_col = col.len();
        if self.is_empty() { // incoming column is the first column
            self.n_row = n_row_col;
        } else if self.n_row == 0 && n_row_col > 0 ||
                  self.n_row == 1 && n_row_col > 1 {
            for existing in self.columns.values_mut() {
                existing.recycle(n_row_col);
            }
            self.n_row = n_row_col;
        } else if n_row_col == 0 && self.n_row > 0 ||
                  n_row_col == 1 && self.n_row > 1 {
            col.recycle(self.n_row);
        } else if n_row_col != self.n_row {
            return Err(EtlError::shape(format!(
                "column '{col_name}' has {n_row_col} rows, table has {}", self.n_row
            )));
        }
        Ok(col)
    }
    /// Like `add_col`, but replace an existing column of the same name in place,
    /// retaining column order.
    pub fn replace_or_add_col(&mut self, col_name: impl Into<String>, col: impl Into<Column>) -> Result<&mut Self> {
        let col_name = col_name.into();
        if !self.columns.contains_key(&col_name) {
            return self.add_col(col_name, col);
        }
        let col = col.into();
        let col = if self.n_col() == 1 {
            self.n_row = col.len();
            col
        } else {
            self.fit_col(&col_name, col)?
        };
        self.columns.insert(col_name, col);
        Ok(self)
    }
    /// Remove a column from a Table based on the column name.
    pub fn drop_col(&mut self, col_name: &str) -> Result<&mut Self> {
        if self.columns.remove(col_name).is_none() {
            return Err(EtlError::column_not_found(col_name));
        }
        self.col_names.retain(|name| name != col_name);
        if self.col_names.is_empty() {
            self.n_row = 0;
        }
        Ok(self)
    }
    /// Keep only the listed columns, in the listed order.
    pub fn retain_cols<S: AsRef<str>>(&self, col_names: &[S]) -> Result<Self> {
        let mut table = Table::new();
        table.print_max_rows      = self.print_max_rows;
        table.print_max_col_width = self.print_max_col_width;
        for col_name in col_names {
            let col_name = col_name.as_ref();
            table.add_col(col_name, self.column(col_name)?.clone())?;
        }
        if table.is_empty() {
            table.n_row = self.n_row;
        }
        Ok(table)
    }
    /// Replace every column name in positional order; names must be unique.
    pub(crate) fn set_col_names(&mut self, col_names: Vec<String>) -> Result<()> {
        if col_names.len() != self.n_col() {
            return Err(EtlError::shape(format!(
                "{} names supplied for {} columns", col_names.len(), self.n_col()
            )));
        }
        let mut columns = HashMap::with_capacity(col_names.len());
        for (old, new) in self.col_names.iter().zip(&col_names) {
            if columns.contains_key(new) {
                return Err(EtlError::DuplicateColumn(new.clone()));
            }
            if let Some(col) = self.columns.get(old) {
                columns.insert(new.clone(), col.clone());
            }
        }
        self.columns   = columns;
        self.col_names = col_names;
        Ok(())
    }
    // rename every column with an injective function, e.g., adding a prefix
    pub(crate) fn map_col_names(&self, f: impl Fn(&str) -> String) -> Self {
        let mut table = self.clone();
        table.columns = self.col_names.iter()
            .filter_map(|name| self.columns.get(name).map(|col| (f(name), col.clone())))
            .collect();
        table.col_names = self.col_names.iter().map(|name| f(name)).collect();
        table
    }

    /* -----------------------------------------------------------------------------
    Table cell-level and row-level getters
    ----------------------------------------------------------------------------- */
    /// Return the value of a specific cell by column name and row index.
    pub fn cell(&self, col_name: &str, row_i: usize) -> Result<Value> {
        self.check_i_bound(row_i)?;
        Ok(self.column(col_name)?.cell(row_i))
    }
    /// Return the String representation of a specific cell.
    pub fn cell_string(&self, col_name: &str, row_i: usize) -> Result<String> {
        self.check_i_bound(row_i)?;
        Ok(self.column(col_name)?.cell_string(row_i))
    }
    /// Return all values of a column as dynamic Values.
    pub fn column_values(&self, col_name: &str) -> Result<Vec<Value>> {
        Ok(self.column(col_name)?.values().collect())
    }
    /// Return a borrowed view of row `row_i`.
    pub fn row(&self, row_i: usize) -> Result<Row<'_>> {
        self.check_i_bound(row_i)?;
        Ok(Row { table: self, row_i })
    }
    /// Iterate over borrowed views of all rows.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.n_row).map(|row_i| Row { table: self, row_i })
    }
    fn check_i_bound(&self, row_i: usize) -> Result<()> {
        if row_i >= self.n_row {
            return Err(EtlError::shape(format!(
                "row index {row_i} out of bounds for {} rows", self.n_row
            )));
        }
        Ok(())
    }
}

/* -----------------------------------------------------------------------------
Row views handed to row-wise functions
----------------------------------------------------------------------------- */
/// A borrowed, read-only view of one table row.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    row_i: usize,
}
impl<'a> Row<'a> {
    /// Return the 0-based index of this row in its table.
    pub fn index(&self) -> usize {
        self.row_i
    }
    /// Return the value of a named column in this row.
    pub fn get(&self, col_name: &str) -> Result<Value> {
        Ok(self.table.column(col_name)?.cell(self.row_i))
    }
    /// Return this row's values in column order.
    pub fn values(&self) -> Vec<Value> {
        self.table.col_names.iter()
            .map(|name| self.table.columns.get(name).map_or(Value::Missing, |col| col.cell(self.row_i)))
            .collect()
    }
    pub fn col_names(&self) -> &'a [String] {
        &self.table.col_names
    }
}
