//! Core error types.

use rowpack_types::ValueType;
use thiserror::Error;

/// Table engine errors.
///
/// Only configuration and typed-write failures are modeled as errors;
/// out-of-bounds access is a contract violation checked by debug assertions.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schema (empty registry, unsized inline column, too many
    /// columns for the configured null bitmap width).
    #[error("schema error: {0}")]
    Schema(String),

    /// `prepare` called on a table that already holds rows, or a schema
    /// mutation attempted after `prepare`.
    #[error("table already prepared: {0}")]
    AlreadyPrepared(String),

    /// Named column does not exist in the registry.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Value type does not match the column's declared type.
    #[error("type mismatch for column '{column}': expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        /// Column name (or index rendered as text).
        column: String,
        /// Declared column type.
        expected: ValueType,
        /// Type of the rejected value.
        actual: Option<ValueType>,
    },

    /// Value could not be converted to the column's declared type.
    #[error("cannot convert value to {target:?}: {reason}")]
    Conversion {
        /// Requested target type.
        target: ValueType,
        /// Why the conversion failed.
        reason: String,
    },

    /// Inline payload larger than the column's fixed cell size.
    #[error("value of {size} bytes exceeds cell capacity {capacity} for column '{column}'")]
    CellOverflow {
        /// Column name.
        column: String,
        /// Payload size in bytes.
        size: usize,
        /// Inline capacity in bytes.
        capacity: usize,
    },

    /// Tables have incompatible schemas for a bulk transfer.
    #[error("incompatible tables: {0}")]
    Incompatible(String),
}
