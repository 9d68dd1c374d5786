//! Column descriptors.

use rowpack_types::ValueType;
use serde::{Deserialize, Serialize};

/// A column definition within a table schema.
///
/// Columns are immutable once the table is prepared; `offset` and `cell_size`
/// are filled in by the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Optional secondary name used by `find_index_by_alias`.
    pub alias: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Maximum payload bytes for inline sized types (`String`/`Binary`).
    /// Zero for types with an intrinsic width.
    pub size: u32,
    /// Payload is stored inline behind a 4-byte length prefix.
    pub length_prefixed: bool,
    /// Cell holds an index into the reference store instead of the payload.
    pub reference: bool,
    /// Column participates in key comparisons (informational flag).
    pub key: bool,
    /// Byte offset of the cell within a row, assigned by `prepare`.
    pub(crate) offset: u32,
    /// Total inline cell width including any length prefix, assigned by
    /// `prepare`.
    pub(crate) cell_size: u32,
}

impl ColumnDef {
    /// Create a column definition. The storage flags are derived from the
    /// value type.
    pub fn new(value_type: ValueType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
            value_type,
            size: 0,
            length_prefixed: matches!(value_type, ValueType::String | ValueType::Binary),
            reference: value_type.is_reference(),
            key: false,
            offset: 0,
            cell_size: 0,
        }
    }

    /// Set the maximum inline payload size. Required for `String`/`Binary`
    /// columns, ignored for fixed-width types.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Mark as a key column.
    pub fn as_key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Byte offset of this column's cell within a row. Valid after `prepare`.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Inline cell width in bytes, including the length prefix for sized
    /// types. Valid after `prepare`.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }
}

/// A column address - index, name, alias, or wildcard pattern.
///
/// Name resolution costs a linear scan of the registry; callers doing
/// repeated access should resolve once and keep the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    /// Column by position.
    Index(usize),
    /// Column by exact name.
    Name(&'a str),
    /// Column by exact alias.
    Alias(&'a str),
    /// Column by name with a single `*` glob.
    Wildcard(&'a str),
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let column = ColumnDef::new(ValueType::String, "path")
            .with_size(260)
            .with_alias("file_path")
            .as_key();

        assert_eq!(column.name, "path");
        assert_eq!(column.alias, "file_path");
        assert_eq!(column.size, 260);
        assert!(column.length_prefixed);
        assert!(!column.reference);
        assert!(column.key);
    }

    #[test]
    fn test_reference_flag_from_type() {
        assert!(ColumnDef::new(ValueType::Text, "notes").reference);
        assert!(!ColumnDef::new(ValueType::Int32, "n").reference);
        assert!(!ColumnDef::new(ValueType::Text, "notes").length_prefixed);
    }
}
