//! The Log structure helps print structured log messages to STDERR.

// dependencies
use chrono::Local;
use num_format::{Locale, ToFormattedString};
use crate::table::Table;
use crate::error::EtlError;

/// The Log structure helps print structured log messages to STDERR.
///
/// By convention, Log objects are named `log`.
pub struct Log {
    tool: String,
}
impl Log {

    /// Create a new Log instance for a given tool.
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
        }
    }

    /// Print a time-stamped message to STDERR for logging purposes.
    pub fn print(&self, msg: &str) {
        eprintln!("{}: {} ({})",
            self.tool,
            msg,
            Local::now().to_rfc3339()
        );
    }

    /// Print a time-stamped 'initializing' message to STDERR for logging purposes.
    /// Includes a preceding newline for spacing clarity.
    pub fn initializing(&self) {
        eprintln!("\n{}: {} ({})",
            self.tool,
            "initializing",
            Local::now().to_rfc3339()
        );
    }

    /// Report a table's size, followed by a preview of its first `n` rows.
    pub fn table(&self, label: &str, table: &Table, n: usize) {
        self.print(&format!("{label}: {} rows, {} columns",
            table.n_row().to_formatted_string(&Locale::en),
            table.n_col()
        ));
        if n > 0 {
            eprintln!("{}", table.head(n));
        }
    }

    /// Report a failure that ended a pipeline step.
    pub fn error(&self, err: &EtlError) {
        self.print(&format!("error: {err}"));
    }
}
