//! Re-exports to support `use etlkit::prelude::*;`
//!
//! Operation modules are exported by name, so calls read as
//! `filter::not_null(...)` or `header::rename(...)`.

/*-----------------------------------------------------------------------
Table and associated types
---------------------------------------------------------------------- */
pub use crate::table::{Table, Column, CategoryColumn, DataType, Value, Row};
pub use crate::error::{EtlError, Result};
/*-----------------------------------------------------------------------
operations
---------------------------------------------------------------------- */
pub use crate::ops::{header, filter, transform, convert, join, bind, aggregate};
pub use crate::ops::{CoercionPolicy, DateComponent, JoinKeys, JoinKind};
pub use crate::dates::date_dimension;
/*-----------------------------------------------------------------------
collaborators and workflow support
---------------------------------------------------------------------- */
pub use crate::store::{Extractor, Loader, Spreadsheet, LoadMode, ForeignKey, Session};
pub use crate::workflow::{Workflow, Config, Counters, Log};
/*-----------------------------------------------------------------------
re-export macros flagged with #[macro_export]
---------------------------------------------------------------------- */
pub use crate::table;
pub use crate::pub_key_constants;
