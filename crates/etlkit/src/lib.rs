//! `etlkit` provides an in-memory `Table` and stateless operations for
//! small extract-transform-load pipelines: header edits, filters, type
//! conversion, joins, unions and group-by aggregation, plus store
//! collaborators to read tables in and load results out.

// modules
pub mod error;     // error taxonomy shared by all operations
#[macro_use]
pub mod table;     // Table, Column and Value data types
pub mod ops;       // stateless table operations
pub mod dates;     // calendar date dimension
pub mod store;     // extract/load collaborators and SQL over stored tables
pub mod workflow;  // configuration, logging and counters for pipeline runs
pub mod prelude;

// re-exports
pub use error::{EtlError, Result};
pub use table::{Table, Column, Value, DataType};
