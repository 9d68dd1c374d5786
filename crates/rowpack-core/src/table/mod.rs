//! The table engine - packed row storage with optional per-row metadata.
//!
//! A `Table` owns two contiguous byte blocks: one holding fixed-size row
//! slots, one holding per-row metadata (null bitmap, row-state word, dynamic
//! arguments slot, in that order). Cells are addressed by precomputed byte
//! offsets; growth reallocates the blocks and copies existing bytes verbatim,
//! so row indices stay stable while raw addresses do not.

mod access;
mod config;
mod meta;
mod ops;
mod primitive;
mod reference;
mod transfer;

use std::sync::Arc;

use rowpack_types::{Arguments, Value};
use tracing::debug;

pub use access::{RowView, Rows};
pub use config::{NullTracking, TableConfig, DEFAULT_RESERVED_ROWS};
pub use meta::row_state;
pub use ops::SortAlgorithm;
pub use primitive::Primitive;
pub use reference::ReferenceStore;

use crate::error::Error;
use crate::schema::{ColumnDef, ColumnRef, ColumnRegistry};
use meta::ArgumentSlab;

/// Cell offsets are aligned to this boundary within a row.
const CELL_ALIGN: u32 = 4;

/// Length prefix bytes for inline sized cells.
const LENGTH_PREFIX: u32 = 4;

fn align_up(value: u32, align: u32) -> u32 {
    match value % align {
        0 => value,
        rem => value + (align - rem),
    }
}

/// A growable collection of typed rows packed into contiguous memory.
///
/// Lifecycle: add columns, call [`prepare`](Table::prepare) to fix the layout
/// and allocate storage, then add rows and read/write cells. The schema is
/// frozen by `prepare`; the row store grows transparently as rows are added.
///
/// The table is single-threaded by contract: no operation may run
/// concurrently with a mutation of the same table. The supported concurrent
/// pattern is to pre-size once with [`reserve`](Table::reserve) (row
/// addresses then never move) and serialize logical slot updates outside the
/// engine.
#[derive(Debug)]
pub struct Table {
    registry: Arc<ColumnRegistry>,
    config: TableConfig,
    /// Packed row cells, `reserved_rows * row_size` bytes.
    data: Vec<u8>,
    /// Per-row metadata, `reserved_rows * row_meta_size` bytes.
    meta: Vec<u8>,
    row_size: u32,
    row_meta_size: u32,
    state_offset: u32,
    arguments_offset: u32,
    row_count: u64,
    reserved_rows: u64,
    prepared: bool,
    references: ReferenceStore,
    arguments: ArgumentSlab,
    properties: Arguments,
}

impl Table {
    /// Create an unprepared table with an empty schema.
    pub fn new(config: TableConfig) -> Self {
        Self::with_registry(Arc::new(ColumnRegistry::new()), config)
    }

    /// Create an unprepared table over an existing column registry.
    pub fn with_registry(registry: Arc<ColumnRegistry>, config: TableConfig) -> Self {
        Self {
            registry,
            config,
            data: Vec::new(),
            meta: Vec::new(),
            row_size: 0,
            row_meta_size: 0,
            state_offset: 0,
            arguments_offset: 0,
            row_count: 0,
            reserved_rows: 0,
            prepared: false,
            references: ReferenceStore::new(),
            arguments: ArgumentSlab::new(),
            properties: Arguments::new(),
        }
    }

    // ## schema

    /// Append a column. Fails once the table is prepared.
    pub fn column_add(&mut self, column: ColumnDef) -> Result<&mut Self, Error> {
        if self.prepared {
            return Err(Error::AlreadyPrepared(
                "columns cannot be added after prepare".into(),
            ));
        }
        Arc::make_mut(&mut self.registry).push(column);
        Ok(self)
    }

    /// Append columns parsed from the compact `name:type[:size]` text form.
    pub fn column_add_parsed(&mut self, text: &str) -> Result<&mut Self, Error> {
        if self.prepared {
            return Err(Error::AlreadyPrepared(
                "columns cannot be added after prepare".into(),
            ));
        }
        Arc::make_mut(&mut self.registry).push_parsed(text)?;
        Ok(self)
    }

    /// The shared column registry.
    pub fn registry(&self) -> &Arc<ColumnRegistry> {
        &self.registry
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.registry.len()
    }

    /// Get a column definition by index.
    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.registry.get(index)
    }

    /// Resolve a column reference to an index.
    pub fn column_find_index(&self, column: ColumnRef<'_>) -> Option<usize> {
        self.registry.resolve(column)
    }

    // ## prepare

    /// Compute the row layout and allocate storage for the configured initial
    /// capacity.
    ///
    /// Fails on an empty schema, on inline sized columns without a declared
    /// size, when the schema exceeds the null bitmap width, and when called
    /// more than once - a second layout pass would invalidate existing row
    /// bytes.
    pub fn prepare(&mut self) -> Result<(), Error> {
        if self.prepared {
            return Err(Error::AlreadyPrepared(
                "prepare may only run once per table".into(),
            ));
        }
        if self.registry.is_empty() {
            return Err(Error::Schema("table has no columns".into()));
        }
        if let Some(limit) = self.config.null.column_limit() {
            if self.registry.len() > limit {
                return Err(Error::Schema(format!(
                    "{} columns exceed the {}-column null bitmap",
                    self.registry.len(),
                    limit
                )));
            }
        }

        // ## assign cell offsets, 4-byte aligned for cheap access
        let registry = Arc::make_mut(&mut self.registry);
        let mut offset = 0u32;
        for column in registry.iter_mut() {
            let cell_size = match column.value_type.fixed_size() {
                Some(size) => size,
                None if column.reference => 8,
                None => {
                    if column.size == 0 {
                        return Err(Error::Schema(format!(
                            "inline column '{}' requires a declared size",
                            column.name
                        )));
                    }
                    LENGTH_PREFIX + column.size
                }
            };
            column.offset = offset;
            column.cell_size = cell_size;
            offset += align_up(cell_size, CELL_ALIGN);
        }
        self.row_size = offset;

        // ## metadata layout: null bitmap, row state, arguments slot
        let null_bytes = self.config.null.byte_size();
        self.state_offset = null_bytes;
        let state_bytes = if self.config.row_state { 4 } else { 0 };
        self.arguments_offset = null_bytes + state_bytes;
        let argument_bytes = if self.config.row_arguments { 8 } else { 0 };
        self.row_meta_size = null_bytes + state_bytes + argument_bytes;

        self.reserved_rows = self.config.initial_reserved_rows;
        self.data = vec![0u8; (self.reserved_rows * self.row_size as u64) as usize];
        self.meta = vec![0u8; (self.reserved_rows * self.row_meta_size as u64) as usize];
        self.prepared = true;

        debug!(
            columns = self.registry.len(),
            row_size = self.row_size,
            row_meta_size = self.row_meta_size,
            reserved_rows = self.reserved_rows,
            "prepared table layout"
        );

        Ok(())
    }

    /// Check if the layout is fixed and storage allocated.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    // ## capacity and row lifecycle

    /// Live row count.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Allocated row capacity.
    pub fn reserved_row_count(&self) -> u64 {
        self.reserved_rows
    }

    /// Fixed byte size of one row's cells.
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Fixed byte size of one row's metadata.
    pub fn row_meta_size(&self) -> u32 {
        self.row_meta_size
    }

    /// The table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Add one row, growing if needed. Returns the new row index.
    pub fn row_add(&mut self) -> u64 {
        self.row_add_count(1)
    }

    /// Add `count` rows, growing if needed. Returns the first new row index.
    pub fn row_add_count(&mut self, count: u64) -> u64 {
        debug_assert!(self.prepared, "row_add before prepare");
        self.ensure_capacity(self.row_count + count);
        let first = self.row_count;
        self.row_count += count;
        first
    }

    /// Add `count` rows with every column marked null (the default-safe path
    /// when null tracking is enabled). Returns the first new row index.
    pub fn row_add_null(&mut self, count: u64) -> u64 {
        let first = self.row_add_count(count);
        if self.config.null != NullTracking::None {
            for row in first..self.row_count {
                self.row_set_null(row);
            }
        }
        first
    }

    /// Grow capacity by `additional` rows without changing the live count.
    pub fn row_reserve_add(&mut self, additional: u64) {
        debug_assert!(self.prepared, "reserve before prepare");
        let target = self.reserved_rows + additional;
        self.grow_to(target);
    }

    /// Ensure capacity for at least `total` rows without changing the live
    /// count. Pre-sizing with this is the supported way to fix row addresses
    /// before concurrent slot use.
    pub fn reserve(&mut self, total: u64) {
        debug_assert!(self.prepared, "reserve before prepare");
        if total > self.reserved_rows {
            self.grow_to(total);
        }
    }

    /// Reset the live row count to zero, keeping capacity.
    ///
    /// Row metadata is zeroed and all dynamic argument maps and reference
    /// payloads are dropped; cell bytes of dead rows are left as-is and are
    /// semantically undefined until rewritten.
    pub fn clear(&mut self) {
        self.row_count = 0;
        self.meta.fill(0);
        self.arguments.clear();
        self.references.clear();
        debug!(reserved_rows = self.reserved_rows, "cleared table");
    }

    /// Release unused reserved capacity.
    pub fn shrink_to_fit(&mut self) {
        self.reserved_rows = self.row_count;
        self.data
            .truncate((self.reserved_rows * self.row_size as u64) as usize);
        self.data.shrink_to_fit();
        self.meta
            .truncate((self.reserved_rows * self.row_meta_size as u64) as usize);
        self.meta.shrink_to_fit();
    }

    /// Grow so that `required` rows fit, using the configured policy:
    /// `additional = max(needed, grow_by)`, or with `grow_by == 0`
    /// `max(needed, required / 2)` - the 50% rule.
    fn ensure_capacity(&mut self, required: u64) {
        if required <= self.reserved_rows {
            return;
        }
        let needed = required - self.reserved_rows;
        let additional = if self.config.grow_by > 0 {
            needed.max(self.config.grow_by)
        } else {
            needed.max(required / 2)
        };
        self.grow_to(self.reserved_rows + additional);
    }

    /// Reallocate both blocks for `new_reserved` rows, copying existing bytes
    /// verbatim and zero-filling the tail. The new allocation is fully
    /// populated before the old one is released, so a failed allocation
    /// (which aborts) leaves no partial state behind.
    fn grow_to(&mut self, new_reserved: u64) {
        if new_reserved <= self.reserved_rows {
            return;
        }
        debug!(
            old_reserved = self.reserved_rows,
            new_reserved, "growing row store"
        );
        self.data
            .resize((new_reserved * self.row_size as u64) as usize, 0);
        self.meta
            .resize((new_reserved * self.row_meta_size as u64) as usize, 0);
        self.reserved_rows = new_reserved;
    }

    // ## table properties

    /// Set a table-level property (metadata about the table, not its rows).
    pub fn property_set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.set(name, value);
    }

    /// Get a table-level property.
    pub fn property_get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Remove a table-level property.
    pub fn property_remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// The whole property bag.
    pub fn properties(&self) -> &Arguments {
        &self.properties
    }

    /// The side store holding `Text`/`Blob` payloads.
    pub fn references(&self) -> &ReferenceStore {
        &self.references
    }

    // ## internal byte addressing

    fn row_bytes(&self, row: u64) -> &[u8] {
        debug_assert!(row < self.reserved_rows, "row index out of bounds");
        let start = (row * self.row_size as u64) as usize;
        &self.data[start..start + self.row_size as usize]
    }

    fn row_bytes_mut(&mut self, row: u64) -> &mut [u8] {
        debug_assert!(row < self.reserved_rows, "row index out of bounds");
        let start = (row * self.row_size as u64) as usize;
        &mut self.data[start..start + self.row_size as usize]
    }

    fn meta_bytes(&self, row: u64) -> &[u8] {
        debug_assert!(row < self.reserved_rows, "row index out of bounds");
        let start = (row * self.row_meta_size as u64) as usize;
        &self.meta[start..start + self.row_meta_size as usize]
    }

    fn meta_bytes_mut(&mut self, row: u64) -> &mut [u8] {
        debug_assert!(row < self.reserved_rows, "row index out of bounds");
        let start = (row * self.row_meta_size as u64) as usize;
        &mut self.meta[start..start + self.row_meta_size as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowpack_types::ValueType;

    fn three_column_table() -> Table {
        let mut table = Table::new(TableConfig::new().initial_reserved_rows(4));
        table
            .column_add(ColumnDef::new(ValueType::Int32, "a"))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::Int8, "b"))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::UInt64, "c"))
            .unwrap();
        table.prepare().unwrap();
        table
    }

    #[test]
    fn test_layout_alignment() {
        let table = three_column_table();
        // int32 at 0, int8 at 4 (padded to 8), uint64 at 8.
        assert_eq!(table.column(0).unwrap().offset(), 0);
        assert_eq!(table.column(1).unwrap().offset(), 4);
        assert_eq!(table.column(2).unwrap().offset(), 8);
        assert_eq!(table.row_size(), 16);
        assert_eq!(table.row_meta_size(), 0);
    }

    #[test]
    fn test_prepare_rejects_empty_schema() {
        let mut table = Table::new(TableConfig::default());
        assert!(matches!(table.prepare(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_prepare_rejects_unsized_string() {
        let mut table = Table::new(TableConfig::default());
        table
            .column_add(ColumnDef::new(ValueType::String, "s"))
            .unwrap();
        assert!(matches!(table.prepare(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_prepare_rejects_second_call() {
        let mut table = three_column_table();
        assert!(matches!(table.prepare(), Err(Error::AlreadyPrepared(_))));
        assert!(matches!(
            table.column_add(ColumnDef::new(ValueType::Bool, "late")),
            Err(Error::AlreadyPrepared(_))
        ));
    }

    #[test]
    fn test_prepare_rejects_too_many_columns_for_null32() {
        let mut table = Table::new(TableConfig::new().with_null32());
        for i in 0..33 {
            table
                .column_add(ColumnDef::new(ValueType::Int32, format!("c{}", i)))
                .unwrap();
        }
        assert!(matches!(table.prepare(), Err(Error::Schema(_))));
    }

    #[test]
    fn test_capacity_invariant_over_adds() {
        let mut table = three_column_table();
        for _ in 0..100 {
            table.row_add();
            assert!(table.row_count() <= table.reserved_row_count());
        }
    }

    #[test]
    fn test_growth_fifty_percent_rule() {
        let mut table = Table::new(TableConfig::new().initial_reserved_rows(10));
        table
            .column_add(ColumnDef::new(ValueType::Int64, "v"))
            .unwrap();
        table.prepare().unwrap();

        for _ in 0..10 {
            table.row_add();
        }
        assert_eq!(table.reserved_row_count(), 10);

        table.row_add(); // 11th row: needed=1, 50% of 11 = 5
        assert_eq!(table.row_count(), 11);
        assert_eq!(table.reserved_row_count(), 15);
    }

    #[test]
    fn test_growth_fixed_increment() {
        let mut table = Table::new(TableConfig::new().initial_reserved_rows(2).grow_by(100));
        table
            .column_add(ColumnDef::new(ValueType::Int32, "v"))
            .unwrap();
        table.prepare().unwrap();

        table.row_add_count(3);
        assert_eq!(table.reserved_row_count(), 102);
    }

    #[test]
    fn test_reserve_keeps_live_count() {
        let mut table = three_column_table();
        table.reserve(1000);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.reserved_row_count(), 1000);

        // Reserving less is a no-op.
        table.reserve(10);
        assert_eq!(table.reserved_row_count(), 1000);

        table.row_reserve_add(24);
        assert_eq!(table.reserved_row_count(), 1024);
    }

    #[test]
    fn test_clear_and_shrink() {
        let mut table = three_column_table();
        table.row_add_count(50);
        table.clear();
        assert_eq!(table.row_count(), 0);
        assert!(table.reserved_row_count() >= 50);

        table.row_add_count(3);
        table.shrink_to_fit();
        assert_eq!(table.reserved_row_count(), 3);
    }

    #[test]
    fn test_properties() {
        let mut table = three_column_table();
        table.property_set("source", "history.log");
        assert_eq!(
            table.property_get("source"),
            Some(&Value::String("history.log".into()))
        );
        assert_eq!(
            table.property_remove("source"),
            Some(Value::String("history.log".into()))
        );
        assert_eq!(table.property_get("source"), None);
    }
}
