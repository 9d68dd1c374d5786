//! Rowpack Core - an embeddable, in-process packed-row table engine.
//!
//! A [`Table`] packs typed rows into contiguous memory with optional per-row
//! null tracking, row-state flags, and a dynamic per-row extension for
//! columns outside the fixed schema. It is a storage substrate, not a
//! database: no persistence, no query planning, and no internal locking.

pub mod error;
pub mod schema;
pub mod table;

pub use error::Error;
pub use schema::{ColumnDef, ColumnRef, ColumnRegistry};
pub use table::{
    row_state, NullTracking, Primitive, ReferenceStore, RowView, Rows, SortAlgorithm, Table,
    TableConfig, DEFAULT_RESERVED_ROWS,
};

/// Re-export the value model.
pub use rowpack_types as types;
