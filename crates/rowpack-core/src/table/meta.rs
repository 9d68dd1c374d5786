//! Per-row metadata: null bitmap, row-state word, dynamic arguments slot.
//!
//! Each enabled section occupies a fixed region of the row's metadata bytes,
//! in the order null bitmap (4 or 8 bytes) -> row state (4 bytes) ->
//! arguments slot (8 bytes). Calling a section's API when that section is
//! disabled is a contract violation checked by debug assertions.

use rowpack_types::Arguments;

use super::{NullTracking, Table};

/// Row-state flag bits stored in the per-row state word.
pub mod row_state {
    /// Slot currently holds a live logical entry.
    pub const IN_USE: u32 = 1 << 0;
    /// Slot content has been logically deleted.
    pub const DELETED: u32 = 1 << 1;
}

/// Owner of the dynamic argument maps referenced from row metadata.
///
/// The metadata slot stores `slab index + 1` as a u64, so zeroed metadata
/// means "no arguments" and handles travel with row bytes through growth,
/// swaps, and compaction.
#[derive(Debug, Default)]
pub(super) struct ArgumentSlab {
    entries: Vec<Option<Arguments>>,
    free: Vec<usize>,
}

impl ArgumentSlab {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn insert(&mut self, arguments: Arguments) -> u64 {
        let index = match self.free.pop() {
            Some(index) => {
                self.entries[index] = Some(arguments);
                index
            }
            None => {
                self.entries.push(Some(arguments));
                self.entries.len() - 1
            }
        };
        index as u64 + 1
    }

    pub(super) fn get(&self, handle: u64) -> Option<&Arguments> {
        if handle == 0 {
            return None;
        }
        self.entries.get(handle as usize - 1)?.as_ref()
    }

    pub(super) fn get_mut(&mut self, handle: u64) -> Option<&mut Arguments> {
        if handle == 0 {
            return None;
        }
        self.entries.get_mut(handle as usize - 1)?.as_mut()
    }

    pub(super) fn remove(&mut self, handle: u64) -> Option<Arguments> {
        if handle == 0 {
            return None;
        }
        let index = handle as usize - 1;
        let taken = self.entries.get_mut(index)?.take();
        if taken.is_some() {
            self.free.push(index);
        }
        taken
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.free.clear();
    }
}

impl Table {
    // ## null bitmap

    /// Check if null tracking is configured.
    pub fn is_null_tracking(&self) -> bool {
        self.config.null != NullTracking::None
    }

    fn null_word(&self, row: u64) -> u64 {
        let meta = self.meta_bytes(row);
        match self.config.null {
            NullTracking::None => 0,
            NullTracking::Null32 => {
                u32::from_le_bytes([meta[0], meta[1], meta[2], meta[3]]) as u64
            }
            NullTracking::Null64 => u64::from_le_bytes([
                meta[0], meta[1], meta[2], meta[3], meta[4], meta[5], meta[6], meta[7],
            ]),
        }
    }

    fn set_null_word(&mut self, row: u64, word: u64) {
        let mode = self.config.null;
        let meta = self.meta_bytes_mut(row);
        match mode {
            NullTracking::None => {}
            NullTracking::Null32 => {
                meta[..4].copy_from_slice(&(word as u32).to_le_bytes());
            }
            NullTracking::Null64 => {
                meta[..8].copy_from_slice(&word.to_le_bytes());
            }
        }
    }

    /// Check if a cell is marked null. Always false when null tracking is
    /// disabled.
    pub fn cell_is_null(&self, row: u64, column: usize) -> bool {
        debug_assert!(row < self.row_count, "row index out of bounds");
        if !self.is_null_tracking() {
            return false;
        }
        debug_assert!(
            self.config
                .null
                .column_limit()
                .is_some_and(|limit| column < limit),
            "column index outside null bitmap"
        );
        self.null_word(row) & (1u64 << column) != 0
    }

    /// Mark a cell null. The cell's bytes become semantically undefined.
    pub fn cell_set_null(&mut self, row: u64, column: usize) {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert!(self.is_null_tracking(), "null tracking not enabled");
        let word = self.null_word(row) | (1u64 << column);
        self.set_null_word(row, word);
    }

    /// Clear a cell's null mark.
    pub fn cell_set_not_null(&mut self, row: u64, column: usize) {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert!(self.is_null_tracking(), "null tracking not enabled");
        let word = self.null_word(row) & !(1u64 << column);
        self.set_null_word(row, word);
    }

    /// Mark every column of a row null in one store.
    pub fn row_set_null(&mut self, row: u64) {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert!(self.is_null_tracking(), "null tracking not enabled");
        self.set_null_word(row, u64::MAX);
    }

    // ## row state

    /// Read a row's state word.
    pub fn row_get_state(&self, row: u64) -> u32 {
        debug_assert!(self.config.row_state, "row state not enabled");
        let offset = self.state_offset as usize;
        let meta = self.meta_bytes(row);
        u32::from_le_bytes([
            meta[offset],
            meta[offset + 1],
            meta[offset + 2],
            meta[offset + 3],
        ])
    }

    fn set_state_word(&mut self, row: u64, word: u32) {
        let offset = self.state_offset as usize;
        let meta = self.meta_bytes_mut(row);
        meta[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
    }

    /// Set state bits (bitwise or with the current word).
    pub fn row_set_state(&mut self, row: u64, flags: u32) {
        debug_assert!(self.config.row_state, "row state not enabled");
        let word = self.row_get_state(row) | flags;
        self.set_state_word(row, word);
    }

    /// Clear state bits.
    pub fn row_clear_state(&mut self, row: u64, flags: u32) {
        debug_assert!(self.config.row_state, "row state not enabled");
        let word = self.row_get_state(row) & !flags;
        self.set_state_word(row, word);
    }

    /// Check the in-use bit.
    pub fn row_is_in_use(&self, row: u64) -> bool {
        self.row_get_state(row) & row_state::IN_USE != 0
    }

    /// Mark a row's slot as logically deleted (soft delete: the deleted bit
    /// is set and the in-use bit cleared; the row stays allocated).
    pub fn row_delete(&mut self, row: u64) {
        debug_assert!(self.config.row_state, "row state not enabled");
        let word = (self.row_get_state(row) | row_state::DELETED) & !row_state::IN_USE;
        self.set_state_word(row, word);
    }

    /// Scan live rows from `start` for the first slot without the in-use
    /// bit - the slot-reuse pattern for fixed-capacity pools.
    pub fn find_first_free_row(&self, start: u64) -> Option<u64> {
        debug_assert!(self.config.row_state, "row state not enabled");
        (start..self.row_count).find(|&row| !self.row_is_in_use(row))
    }

    /// Count live rows whose state word has every bit of `mask` set.
    pub fn row_count_with_state(&self, mask: u32) -> u64 {
        debug_assert!(self.config.row_state, "row state not enabled");
        (0..self.row_count)
            .filter(|&row| self.row_get_state(row) & mask == mask)
            .count() as u64
    }

    /// Count live rows with the in-use bit set.
    pub fn count_used_rows(&self) -> u64 {
        self.row_count_with_state(row_state::IN_USE)
    }

    /// Count live rows without the in-use bit.
    pub fn count_free_rows(&self) -> u64 {
        self.row_count - self.count_used_rows()
    }

    // ## dynamic row arguments

    pub(super) fn argument_handle(&self, row: u64) -> u64 {
        if !self.config.row_arguments {
            return 0;
        }
        let offset = self.arguments_offset as usize;
        let meta = self.meta_bytes(row);
        u64::from_le_bytes([
            meta[offset],
            meta[offset + 1],
            meta[offset + 2],
            meta[offset + 3],
            meta[offset + 4],
            meta[offset + 5],
            meta[offset + 6],
            meta[offset + 7],
        ])
    }

    fn set_argument_handle(&mut self, row: u64, handle: u64) {
        let offset = self.arguments_offset as usize;
        let meta = self.meta_bytes_mut(row);
        meta[offset..offset + 8].copy_from_slice(&handle.to_le_bytes());
    }

    /// Check if a row carries a dynamic arguments map.
    pub fn row_arguments_exists(&self, row: u64) -> bool {
        debug_assert!(row < self.row_count, "row index out of bounds");
        self.argument_handle(row) != 0
    }

    /// Get a row's dynamic arguments map.
    pub fn row_arguments(&self, row: u64) -> Option<&Arguments> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        self.arguments.get(self.argument_handle(row))
    }

    /// Get a row's dynamic arguments map mutably.
    pub fn row_arguments_mut(&mut self, row: u64) -> Option<&mut Arguments> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        let handle = self.argument_handle(row);
        self.arguments.get_mut(handle)
    }

    /// Get or lazily create a row's dynamic arguments map.
    pub fn row_create_arguments(&mut self, row: u64) -> &mut Arguments {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert!(self.config.row_arguments, "row arguments not enabled");
        let mut handle = self.argument_handle(row);
        if handle == 0 {
            handle = self.arguments.insert(Arguments::new());
            self.set_argument_handle(row, handle);
        }
        // The handle was just inserted or read from a live slot.
        self.arguments
            .get_mut(handle)
            .expect("argument slab lost a live handle")
    }

    /// Destroy a row's dynamic arguments map, if any.
    pub fn row_arguments_delete(&mut self, row: u64) -> Option<Arguments> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        let handle = self.argument_handle(row);
        let taken = self.arguments.remove(handle);
        if taken.is_some() {
            self.set_argument_handle(row, 0);
        }
        taken
    }

    /// Release the argument map of a row about to be destroyed without
    /// touching its metadata bytes (the caller overwrites or zeroes them).
    pub(super) fn release_arguments(&mut self, row: u64) {
        let handle = self.argument_handle(row);
        self.arguments.remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ColumnDef, Table, TableConfig};
    use super::*;
    use rowpack_types::{Value, ValueType};

    fn table(config: TableConfig) -> Table {
        let mut table = Table::new(config);
        table
            .column_add(ColumnDef::new(ValueType::Int32, "a"))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::Int64, "b"))
            .unwrap();
        table.prepare().unwrap();
        table
    }

    #[test]
    fn test_null_roundtrip() {
        let mut table = table(TableConfig::new().with_null32());
        let row = table.row_add();

        assert!(!table.cell_is_null(row, 0));
        table.cell_set_null(row, 0);
        assert!(table.cell_is_null(row, 0));
        assert!(!table.cell_is_null(row, 1));

        table.cell_set_not_null(row, 0);
        assert!(!table.cell_is_null(row, 0));

        table.row_set_null(row);
        assert!(table.cell_is_null(row, 0));
        assert!(table.cell_is_null(row, 1));
    }

    #[test]
    fn test_row_add_null_marks_new_rows() {
        let mut table = table(TableConfig::new().with_null64());
        let first = table.row_add_null(3);
        for row in first..table.row_count() {
            assert!(table.cell_is_null(row, 0));
            assert!(table.cell_is_null(row, 1));
        }
    }

    #[test]
    fn test_row_state_pool_pattern() {
        let mut table = table(TableConfig::new().with_row_state());
        table.row_add_count(4);

        assert_eq!(table.find_first_free_row(0), Some(0));
        table.row_set_state(0, row_state::IN_USE);
        table.row_set_state(1, row_state::IN_USE);
        assert_eq!(table.find_first_free_row(0), Some(2));
        assert_eq!(table.count_used_rows(), 2);
        assert_eq!(table.count_free_rows(), 2);

        table.row_delete(1);
        assert!(!table.row_is_in_use(1));
        assert_eq!(table.row_get_state(1), row_state::DELETED);
        assert_eq!(table.find_first_free_row(0), Some(1));

        table.row_clear_state(1, row_state::DELETED);
        assert_eq!(table.row_get_state(1), 0);
    }

    #[test]
    fn test_arguments_lifecycle() {
        let mut table = table(TableConfig::new().with_row_arguments());
        table.row_add_count(2);

        assert!(!table.row_arguments_exists(0));
        assert!(table.row_arguments(0).is_none());

        table.row_create_arguments(0).set("tag", "urgent");
        assert!(table.row_arguments_exists(0));
        assert_eq!(
            table.row_arguments(0).unwrap().get("tag"),
            Some(&Value::String("urgent".into()))
        );
        assert!(!table.row_arguments_exists(1));

        // Creating again returns the same map.
        table.row_create_arguments(0).set("level", 3i32);
        assert_eq!(table.row_arguments(0).unwrap().len(), 2);

        let taken = table.row_arguments_delete(0).unwrap();
        assert_eq!(taken.len(), 2);
        assert!(!table.row_arguments_exists(0));
        assert!(table.row_arguments_delete(0).is_none());
    }

    #[test]
    fn test_meta_sections_share_row_in_fixed_order() {
        let mut table = table(
            TableConfig::new()
                .with_null32()
                .with_row_state()
                .with_row_arguments(),
        );
        assert_eq!(table.row_meta_size(), 4 + 4 + 8);

        let row = table.row_add();
        table.row_set_null(row);
        table.row_set_state(row, row_state::IN_USE);
        table.row_create_arguments(row).set("k", 1i32);

        // Each section keeps its own value.
        assert!(table.cell_is_null(row, 1));
        assert!(table.row_is_in_use(row));
        assert!(table.row_arguments_exists(row));
    }
}
