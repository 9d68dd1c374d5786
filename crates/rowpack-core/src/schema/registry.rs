//! The column registry - an ordered, shared list of column definitions.

use rowpack_types::ValueType;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::{ColumnDef, ColumnRef};

/// Ordered list of column definitions describing one row layout.
///
/// A registry is built before `prepare` and frozen afterwards. Tables share a
/// registry through `Arc<ColumnRegistry>`; row-slice views produced by
/// `split` alias the same registry rather than copying it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDef>,
}

impl ColumnRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the registry has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append a column definition.
    pub fn push(&mut self, column: ColumnDef) {
        self.columns.push(column);
    }

    /// Append columns parsed from a compact text form:
    /// `name:type[:size]` entries separated by commas, e.g.
    /// `"path:string:260, name:string:64, size:uint64"`.
    pub fn push_parsed(&mut self, text: &str) -> Result<(), Error> {
        for entry in text.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.split(':').map(str::trim);
            let name = parts
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Schema(format!("missing column name in '{}'", entry)))?;
            let type_name = parts
                .next()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Schema(format!("missing column type in '{}'", entry)))?;
            let value_type = ValueType::parse(type_name)
                .ok_or_else(|| Error::Schema(format!("unknown column type '{}'", type_name)))?;

            let mut column = ColumnDef::new(value_type, name);
            if let Some(size) = parts.next() {
                let size: u32 = size
                    .parse()
                    .map_err(|_| Error::Schema(format!("invalid column size in '{}'", entry)))?;
                column = column.with_size(size);
            }
            self.push(column);
        }
        Ok(())
    }

    /// Get a column by index.
    pub fn get(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    /// Iterate the columns in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef> {
        self.columns.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColumnDef> {
        self.columns.iter_mut()
    }

    /// Find a column index by exact name.
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Find a column index by exact alias.
    pub fn find_index_by_alias(&self, alias: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| !c.alias.is_empty() && c.alias == alias)
    }

    /// Find a column index by name with a single `*` glob
    /// (`"pre*"`, `"*suf"` or `"pre*suf"`). A pattern without `*` matches
    /// exactly.
    pub fn find_index_wildcard(&self, pattern: &str) -> Option<usize> {
        match pattern.split_once('*') {
            None => self.find_index(pattern),
            Some((prefix, suffix)) => self.columns.iter().position(|c| {
                c.name.len() >= prefix.len() + suffix.len()
                    && c.name.starts_with(prefix)
                    && c.name.ends_with(suffix)
            }),
        }
    }

    /// Resolve a column reference to an index.
    pub fn resolve(&self, column: ColumnRef<'_>) -> Option<usize> {
        match column {
            ColumnRef::Index(index) => (index < self.columns.len()).then_some(index),
            ColumnRef::Name(name) => self.find_index(name),
            ColumnRef::Alias(alias) => self.find_index_by_alias(alias),
            ColumnRef::Wildcard(pattern) => self.find_index_wildcard(pattern),
        }
    }

    /// Check if a column with the exact name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }
}

impl<'a> IntoIterator for &'a ColumnRegistry {
    type Item = &'a ColumnDef;
    type IntoIter = std::slice::Iter<'a, ColumnDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
