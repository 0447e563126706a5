//! Typed failures reported by table and query operations

use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Data outcomes such as `mean` returning `None` on an all-text column are
/// not errors; everything here is a caller mistake the engine refuses to
/// paper over.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A referenced column is not part of the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A row index fell outside `[0, row_count)`.
    #[error("row index {index} out of bounds ({len} rows)")]
    RowIndex { index: usize, len: usize },

    /// The column list handed to `load` is structurally unusable.
    #[error("schema error: {0}")]
    Schema(String),

    /// A remap table could not be understood.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    /// A filter expression did not parse.
    #[error("invalid filter expression: {0}")]
    InvalidExpression(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
