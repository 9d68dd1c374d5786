//! Bulk cross-table transfer - append, harvest/plant, split.

use std::sync::Arc;

use rowpack_types::{Arguments, Value};
use tracing::debug;

use super::meta::ArgumentSlab;
use super::{Primitive, ReferenceStore, Table};
use crate::error::Error;

impl Table {
    /// A prepared, empty table sharing this table's registry and layout.
    pub(super) fn empty_like(&self) -> Table {
        Table {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            data: Vec::new(),
            meta: Vec::new(),
            row_size: self.row_size,
            row_meta_size: self.row_meta_size,
            state_offset: self.state_offset,
            arguments_offset: self.arguments_offset,
            row_count: 0,
            reserved_rows: 0,
            prepared: self.prepared,
            references: ReferenceStore::new(),
            arguments: ArgumentSlab::new(),
            properties: Arguments::new(),
        }
    }

    /// Byte-copy one row into a layout-identical table, re-owning reference
    /// payloads and the dynamic arguments map in the target's stores.
    fn copy_row_into(&self, target: &mut Table, source_row: u64) {
        debug_assert_eq!(self.row_size, target.row_size);
        debug_assert_eq!(self.row_meta_size, target.row_meta_size);

        let row = target.row_add();
        let row_size = self.row_size as usize;
        let meta_size = self.row_meta_size as usize;
        let (src, dst) = (source_row as usize, row as usize);
        target.data[dst * row_size..(dst + 1) * row_size]
            .copy_from_slice(&self.data[src * row_size..(src + 1) * row_size]);
        target.meta[dst * meta_size..(dst + 1) * meta_size]
            .copy_from_slice(&self.meta[src * meta_size..(src + 1) * meta_size]);

        for column in self.registry.iter() {
            if !column.reference {
                continue;
            }
            let offset = column.offset as usize;
            let cell_size = column.cell_size as usize;
            let slot = u64::read(&target.row_bytes(row)[offset..offset + cell_size]);
            if slot == 0 {
                continue;
            }
            let new_slot = match self.references.get(slot) {
                Some(payload) => target.references.insert(payload.clone()),
                None => 0,
            };
            new_slot.write(&mut target.row_bytes_mut(row)[offset..offset + cell_size]);
        }

        if self.config.row_arguments {
            let handle = self.argument_handle(source_row);
            let new_handle = match self.arguments.get(handle) {
                Some(arguments) => target.arguments.insert(arguments.clone()),
                None => 0,
            };
            let offset = target.arguments_offset as usize;
            target.meta_bytes_mut(row)[offset..offset + 8]
                .copy_from_slice(&new_handle.to_le_bytes());
        }
    }

    // ## append

    /// Append every row of `source`, matching columns by index. Matched
    /// column types must agree exactly.
    pub fn append(&mut self, source: &Table) -> Result<(), Error> {
        self.append_impl(source, 0, source.row_count(), false)
    }

    /// Append every row of `source`, matching columns by index and converting
    /// mismatched value types.
    pub fn append_convert(&mut self, source: &Table) -> Result<(), Error> {
        self.append_impl(source, 0, source.row_count(), true)
    }

    /// Append a row range of `source`, matching columns by index.
    pub fn append_range(&mut self, source: &Table, from: u64, count: u64) -> Result<(), Error> {
        self.append_impl(source, from, count, false)
    }

    fn append_impl(
        &mut self,
        source: &Table,
        from: u64,
        count: u64,
        convert: bool,
    ) -> Result<(), Error> {
        debug_assert!(self.is_prepared() && source.is_prepared());
        let columns = self.column_count().min(source.column_count());
        if !convert {
            for index in 0..columns {
                let expected = self.column_def(index).value_type;
                let found = source.column_def(index).value_type;
                if expected != found {
                    return Err(Error::Incompatible(format!(
                        "column {} is {:?} here but {:?} in source",
                        index, expected, found
                    )));
                }
            }
        }

        let end = from.saturating_add(count).min(source.row_count());
        if end <= from {
            return Ok(());
        }
        self.reserve(self.row_count() + (end - from));
        for row in from..end {
            let target = self.row_add_null(1);
            for index in 0..columns {
                let value = source.cell_value(row, index);
                self.write_cell(target, index, &value, convert)?;
            }
        }
        debug!(rows = end - from, columns, "appended rows");
        Ok(())
    }

    /// Append every row of `source`, matching columns by name. Columns
    /// missing on either side are skipped; matched types must agree exactly.
    pub fn append_by_name(&mut self, source: &Table) -> Result<(), Error> {
        self.append_by_name_impl(source, false)
    }

    /// Append every row of `source`, matching columns by name and converting
    /// mismatched value types.
    pub fn append_by_name_convert(&mut self, source: &Table) -> Result<(), Error> {
        self.append_by_name_impl(source, true)
    }

    fn append_by_name_impl(&mut self, source: &Table, convert: bool) -> Result<(), Error> {
        let pairs = self.column_match(source);
        if pairs.is_empty() {
            return Err(Error::Incompatible("no matching column names".into()));
        }

        self.reserve(self.row_count() + source.row_count());
        for row in 0..source.row_count() {
            let target = self.row_add_null(1);
            for &(here, there) in &pairs {
                let value = source.cell_value(row, there);
                self.write_cell(target, here, &value, convert)?;
            }
        }
        debug!(
            rows = source.row_count(),
            columns = pairs.len(),
            "appended rows by name"
        );
        Ok(())
    }

    /// Pair this table's columns with same-named columns of `other`:
    /// `(index here, index there)`.
    pub fn column_match(&self, other: &Table) -> Vec<(usize, usize)> {
        self.registry
            .iter()
            .enumerate()
            .filter_map(|(index, column)| {
                other
                    .registry
                    .find_index(&column.name)
                    .map(|found| (index, found))
            })
            .collect()
    }

    // ## harvest / plant

    /// Export one column over `[from, from + count)` as owned values.
    pub fn harvest(&self, column: usize, from: u64, count: u64) -> Vec<Value> {
        let end = from.saturating_add(count).min(self.row_count());
        (from..end).map(|row| self.cell_value(row, column)).collect()
    }

    /// Export one column over `[from, from + count)`, skipping null cells.
    pub fn harvest_skip_null(&self, column: usize, from: u64, count: u64) -> Vec<Value> {
        let end = from.saturating_add(count).min(self.row_count());
        (from..end)
            .map(|row| self.cell_value(row, column))
            .filter(|value| !value.is_null())
            .collect()
    }

    /// Export one column over `[from, from + count)` converted to a single
    /// target type. Nulls stay null; inconvertible values become null.
    pub fn harvest_converted(
        &self,
        column: usize,
        target: rowpack_types::ValueType,
        from: u64,
        count: u64,
    ) -> Vec<Value> {
        let end = from.saturating_add(count).min(self.row_count());
        (from..end)
            .map(|row| {
                self.cell_value(row, column)
                    .convert_to(target)
                    .unwrap_or(Value::Null)
            })
            .collect()
    }

    /// Export one fixed-width column over all live rows through the typed
    /// fast path. Null marks are ignored; the caller asserts the column holds
    /// values.
    pub fn harvest_primitive<T: Primitive>(&self, column: usize) -> Vec<T> {
        (0..self.row_count())
            .map(|row| T::read(self.cell_bytes(row, column)))
            .collect()
    }

    /// Export selected rows as vectors of owned values.
    pub fn harvest_rows(&self, rows: &[u64]) -> Vec<Vec<Value>> {
        rows.iter().map(|&row| self.row_get_values(row)).collect()
    }

    /// Import values into one column over consecutive rows starting at
    /// `from`. Value types must match the column.
    pub fn plant(&mut self, column: usize, values: &[Value], from: u64) -> Result<(), Error> {
        self.plant_impl(column, values, from, false)
    }

    /// Import values into one column, converting mismatched value types.
    pub fn plant_convert(
        &mut self,
        column: usize,
        values: &[Value],
        from: u64,
    ) -> Result<(), Error> {
        self.plant_impl(column, values, from, true)
    }

    fn plant_impl(
        &mut self,
        column: usize,
        values: &[Value],
        from: u64,
        convert: bool,
    ) -> Result<(), Error> {
        debug_assert!(
            from + values.len() as u64 <= self.row_count(),
            "plant range out of bounds"
        );
        for (i, value) in values.iter().enumerate() {
            self.write_cell(from + i as u64, column, value, convert)?;
        }
        Ok(())
    }

    /// Fill one column with a single value over `[from, from + count)`.
    pub fn plant_fill(
        &mut self,
        column: usize,
        value: &Value,
        from: u64,
        count: u64,
    ) -> Result<(), Error> {
        let end = from.saturating_add(count).min(self.row_count());
        for row in from..end {
            self.write_cell(row, column, value, false)?;
        }
        Ok(())
    }

    // ## split / compare

    /// Split into chunks of at most `rows_per_table` rows. The parts share
    /// this table's column registry and carry their rows' metadata, reference
    /// payloads, and dynamic arguments.
    pub fn split(&self, rows_per_table: u64) -> Vec<Table> {
        debug_assert!(rows_per_table > 0, "chunk size must be positive");
        if rows_per_table == 0 {
            return Vec::new();
        }
        let mut parts = Vec::new();
        let mut from = 0;
        while from < self.row_count() {
            let count = rows_per_table.min(self.row_count() - from);
            let mut part = self.empty_like();
            part.reserve(count);
            for row in from..from + count {
                self.copy_row_into(&mut part, row);
            }
            parts.push(part);
            from += count;
        }
        debug!(parts = parts.len(), rows_per_table, "split table");
        parts
    }

    /// Cell-wise comparison of `[from, from + count)` against the same range
    /// of `other`. Null marks must agree as well as values.
    pub fn table_equal(&self, other: &Table, from: u64, count: u64) -> bool {
        if self.column_count() != other.column_count() {
            return false;
        }
        let end = from.saturating_add(count);
        if end > self.row_count() || end > other.row_count() {
            return false;
        }
        for row in from..end {
            for column in 0..self.column_count() {
                if self.cell_view(row, column) != other.cell_view(row, column) {
                    return false;
                }
            }
        }
        true
    }
}
