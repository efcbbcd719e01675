//! Error taxonomy shared by table operations and collaborators.
//!
//! Core operations validate their own inputs and fail fast with one of the
//! variants below; collaborator failures (connection, query, referential
//! integrity) are propagated unchanged to the pipeline that triggered them.

// dependencies
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Error)]
pub enum EtlError {
    /// A referenced column is absent from the table header.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Argument cardinality mismatch, e.g., header length or ascending flags.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Wrong argument kind, e.g., a non-numeric range bound.
    #[error("type error: {0}")]
    Type(String),

    /// Strict coercion of a value to a target type failed.
    #[error("cannot coerce value '{value}' in column '{column}' to {target}")]
    Coercion {
        column: String,
        value:  String,
        target: String,
    },

    /// An operation would produce two columns with the same name.
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// The external store is unreachable or not connected.
    #[error("connection error: {0}")]
    Connection(String),

    /// Malformed SQL, an unsupported statement, or a store-side failure.
    #[error("query error: {0}")]
    Query(String),

    /// Local values are missing from the referenced column.
    #[error("referential integrity error: column '{column}' references {ref_table}.{ref_column}, missing values: {values:?}")]
    ReferentialIntegrity {
        column:     String,
        ref_table:  String,
        ref_column: String,
        values:     Vec<String>,
    },

    /// A configuration value is unset or cannot be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EtlError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        EtlError::Shape(msg.into())
    }
    pub(crate) fn type_error(msg: impl Into<String>) -> Self {
        EtlError::Type(msg.into())
    }
    pub(crate) fn column_not_found(name: &str) -> Self {
        EtlError::ColumnNotFound(name.to_string())
    }
}
