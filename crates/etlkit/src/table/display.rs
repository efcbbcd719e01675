/* -----------------------------------------------------------------------------
Table Display implementation and head/tail previews
----------------------------------------------------------------------------- */

// dependencies
use std::fmt::{Display, Formatter};
use super::Table;
use crate::error::{EtlError, Result};

impl Display for Table {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {

        // Calculate column widths based on column names and data, build header type info
        let n_show = self.n_row().min(self.print_max_rows);
        let mut widths: Vec<usize>  = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        let mut cells:  Vec<Vec<String>> = Vec::new();
        for col_name in self.col_names() {
            let col = self.column(col_name).map_err(|_| std::fmt::Error)?;
            let label = format!("{} <{}>", col_name, col.data_type());
            let col_cells: Vec<String> = (0..n_show).map(|i| col.cell_string(i)).collect();
            let width = col_cells.iter()
                .map(|s| s.chars().count())
                .fold(label.chars().count(), usize::max);
            widths.push(width.min(self.print_max_col_width).max(1));
            labels.push(label);
            cells.push(col_cells);
        }

        // Write header including Table dimensions, column names, and separator
        writeln!(f, "\nTable: {} rows × {} columns", self.n_row(), self.n_col())?;
        for (label, width) in labels.iter().zip(&widths) {
            write_cell(f, label, *width)?;
        }
        writeln!(f)?;
        for width in &widths {
            write!(f, "{:-<width$} ", "", width = width)?;
        }
        writeln!(f)?;

        // Write data rows
        for i in 0..n_show {
            for (col_cells, width) in cells.iter().zip(&widths) {
                write_cell(f, &col_cells[i], *width)?;
            }
            writeln!(f)?;
        }

        // Show ellipsis if more rows exist
        if self.n_row() > self.print_max_rows { writeln!(f, "...")?; }
        Ok(())
    }
}

// pad or truncate one cell to its column width
fn write_cell(f: &mut Formatter, value: &str, width: usize) -> std::fmt::Result {
    if value.chars().count() > width {
        let truncated: String = value.chars().take(width - 1).collect();
        write!(f, "{truncated}… ")
    } else {
        write!(f, "{:width$} ", value, width = width)
    }
}

impl Table {
    /// Render the first `n` rows as formatted text; `n` larger than the
    /// row count renders all rows.
    pub fn head(&self, n: usize) -> String {
        let rows: Vec<usize> = (0..n.min(self.n_row())).collect();
        self.preview(&rows)
    }
    /// Render the last `n` rows as formatted text.
    pub fn tail(&self, n: usize) -> String {
        let rows: Vec<usize> = (self.n_row().saturating_sub(n)..self.n_row()).collect();
        self.preview(&rows)
    }
    /// Like `head`, for callers holding a signed count; negative `n` is a ShapeError.
    pub fn head_signed(&self, n: i64) -> Result<String> {
        let n = usize::try_from(n).map_err(|_| EtlError::shape(format!("head requires n >= 0, got {n}")))?;
        Ok(self.head(n))
    }
    /// Like `tail`, for callers holding a signed count; negative `n` is a ShapeError.
    pub fn tail_signed(&self, n: i64) -> Result<String> {
        let n = usize::try_from(n).map_err(|_| EtlError::shape(format!("tail requires n >= 0, got {n}")))?;
        Ok(self.tail(n))
    }
    fn preview(&self, rows: &[usize]) -> String {
        let mut slice = self.take_rows(rows);
        slice.print_max_rows = rows.len();
        slice.to_string()
    }
}
