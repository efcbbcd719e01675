//! Stateless table operations. Each function takes its input tables by
//! reference and returns a new table, so callers chain operations by
//! reassigning the result, e.g., `let t = filter::not_null(&t, "codigo", false)?;`.

// modules
pub mod header;
pub mod filter;
pub mod transform;
pub mod convert;
pub mod join;
pub mod bind;
pub mod aggregate;

// exports
pub use convert::{CoercionPolicy, DateComponent};
pub use join::{JoinKeys, JoinKind};
