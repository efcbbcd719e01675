//! Table bulk data read/write from CSV files or streams, plus JSON export.
//!
//! CSV columns are typed on read by inference over all non-empty cells:
//! Integer if every cell parses as i64, else Numeric if f64, else Logical
//! (`true`/`false`), else Timestamp, else Text. Empty cells and `NA` are
//! missing. Paths ending in `.gz` are transparently (de)compressed.

// dependencies
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use serde_json::{Map, Value as JsonValue};
use super::{Column, Table, Value};
use super::value::NA;
use crate::error::Result;

impl Table {
    /* -----------------------------------------------------------------------------
    Row-major (CSV) read and write
    ----------------------------------------------------------------------------- */
    /// Read a Table from a row-major (CSV) input stream with a header line.
    pub fn read_csv<R: Read>(reader: R, sep: u8) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(sep)
            .trim(Trim::All)
            .from_reader(reader);
        let col_names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); col_names.len()];
        for record in rdr.records() {
            let record = record?;
            for (j, col_cells) in cells.iter_mut().enumerate() {
                let cell = record.get(j).unwrap_or("");
                col_cells.push(if cell.is_empty() || cell == NA { None } else { Some(cell.to_string()) });
            }
        }
        let mut table = Table::new();
        for (col_name, col_cells) in col_names.into_iter().zip(cells) {
            table.add_col(col_name, infer_column(col_cells))?;
        }
        Ok(table)
    }
    /// Write a Table to an output stream as row-major (CSV) text with a
    /// header line. Missing values are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W, sep: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .has_headers(false) // false since we write the header ourselves below
            .delimiter(sep)
            .from_writer(writer);
        wtr.write_record(self.col_names())?;
        let cols = self.col_names().iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<&Column>>>()?;
        for i in 0..self.n_row() {
            let row: Vec<String> = cols.iter().map(|col| {
                if col.is_missing(i) { String::new() } else { col.cell_string(i) }
            }).collect();
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Read a comma-delimited file, decompressing `.gz` files.
    pub fn read_csv_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if is_gz(path) {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Table::read_csv(BufReader::new(reader), b',')
    }
    /// Write a comma-delimited file, compressing to `.gz` when the path says so.
    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        if is_gz(path) {
            let mut encoder = GzEncoder::new(file, Compression::default());
            self.write_csv(&mut encoder, b',')?;
            encoder.finish()?.flush()?;
        } else {
            self.write_csv(file, b',')?;
        }
        Ok(())
    }

    /* -----------------------------------------------------------------------------
    JSON export
    ----------------------------------------------------------------------------- */
    /// Return the table as a JSON array of row objects keyed by column name.
    pub fn to_json_records(&self) -> JsonValue {
        let records = self.rows().map(|row| {
            let record: Map<String, JsonValue> = row.col_names().iter()
                .zip(row.values())
                .map(|(name, value)| (name.clone(), json_cell(value)))
                .collect();
            JsonValue::Object(record)
        }).collect();
        JsonValue::Array(records)
    }
}

fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn json_cell(value: Value) -> JsonValue {
    match value {
        Value::Timestamp(_) => JsonValue::String(value.to_string()),
        Value::Numeric(x) if !x.is_finite() => JsonValue::Null,
        value => serde_json::to_value(value).unwrap_or(JsonValue::Null),
    }
}

/* -----------------------------------------------------------------------------
column type inference
----------------------------------------------------------------------------- */
fn all_parse<T>(cells: &[Option<String>], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    cells.iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => parse(s).map(Some),
        })
        .collect()
}
fn parse_csv_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true"  => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
pub(crate) fn infer_column(cells: Vec<Option<String>>) -> Column {
    if cells.iter().all(Option::is_none) {
        return Column::Text(cells);
    }
    if let Some(v) = all_parse(&cells, |s| s.parse::<i64>().ok()) {
        return Column::Integer(v);
    }
    if let Some(v) = all_parse(&cells, |s| s.parse::<f64>().ok()) {
        return Column::Numeric(v);
    }
    if let Some(v) = all_parse(&cells, parse_csv_bool) {
        return Column::Logical(v);
    }
    if let Some(v) = all_parse(&cells, Value::parse_timestamp) {
        return Column::Timestamp(v);
    }
    Column::Text(cells)
}
