//! Cell and row access - raw bytes, typed fast path, and the variant view.

use rowpack_types::{Arguments, Value, ValueType, ValueView};

use super::{Primitive, Table, LENGTH_PREFIX};
use crate::error::Error;
use crate::schema::{ColumnDef, ColumnRef};

/// Check if a value of `actual` type can be written to a column declared as
/// `expected` without conversion.
fn type_accepts(expected: ValueType, actual: ValueType) -> bool {
    expected == actual
        || matches!(
            (expected, actual),
            (ValueType::Text, ValueType::String) | (ValueType::Blob, ValueType::Binary)
        )
}

impl Table {
    pub(super) fn column_def(&self, index: usize) -> &ColumnDef {
        self.registry
            .get(index)
            .expect("column index out of bounds")
    }

    // ## raw byte access

    /// Byte offset of a cell within the row block.
    pub fn cell_offset(&self, row: u64, column: usize) -> u64 {
        debug_assert!(row < self.reserved_rows, "row index out of bounds");
        row * self.row_size as u64 + self.column_def(column).offset as u64
    }

    /// The cell's raw bytes (full cell width, including any length prefix).
    pub fn cell_bytes(&self, row: u64, column: usize) -> &[u8] {
        let column = self.column_def(column);
        let offset = column.offset as usize;
        &self.row_bytes(row)[offset..offset + column.cell_size as usize]
    }

    /// The cell's raw bytes, mutable.
    pub fn cell_bytes_mut(&mut self, row: u64, column: usize) -> &mut [u8] {
        let offset = self.column_def(column).offset as usize;
        let size = self.column_def(column).cell_size as usize;
        &mut self.row_bytes_mut(row)[offset..offset + size]
    }

    // ## typed fast path

    /// Read a fixed-width cell as `T`. The caller asserts that `T` matches
    /// the column's declared type; the width is checked in debug builds.
    pub fn cell_get_primitive<T: Primitive>(&self, row: u64, column: usize) -> T {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert_eq!(
            self.column_def(column).value_type.fixed_size(),
            Some(T::SIZE as u32),
            "primitive width does not match column"
        );
        T::read(self.cell_bytes(row, column))
    }

    /// Write a fixed-width cell as `T` and clear its null mark. The caller
    /// asserts that `T` matches the column's declared type.
    pub fn cell_set_primitive<T: Primitive>(&mut self, row: u64, column: usize, value: T) {
        debug_assert!(row < self.row_count, "row index out of bounds");
        debug_assert_eq!(
            self.column_def(column).value_type.fixed_size(),
            Some(T::SIZE as u32),
            "primitive width does not match column"
        );
        value.write(self.cell_bytes_mut(row, column));
        if self.is_null_tracking() {
            self.cell_set_not_null(row, column);
        }
    }

    // ## variant view path

    /// Read a cell as a type-erased view. Null-marked cells yield
    /// `ValueView::Null`; unset inline strings read as empty.
    pub fn cell_view(&self, row: u64, column: usize) -> ValueView<'_> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        if self.cell_is_null(row, column) {
            return ValueView::Null;
        }

        let value_type = self.column_def(column).value_type;
        let bytes = self.cell_bytes(row, column);
        match value_type {
            ValueType::Bool => ValueView::Bool(bool::read(bytes)),
            ValueType::Int8 => ValueView::Int8(i8::read(bytes)),
            ValueType::UInt8 => ValueView::UInt8(u8::read(bytes)),
            ValueType::Int16 => ValueView::Int16(i16::read(bytes)),
            ValueType::UInt16 => ValueView::UInt16(u16::read(bytes)),
            ValueType::Int32 => ValueView::Int32(i32::read(bytes)),
            ValueType::UInt32 => ValueView::UInt32(u32::read(bytes)),
            ValueType::Int64 => ValueView::Int64(i64::read(bytes)),
            ValueType::UInt64 => ValueView::UInt64(u64::read(bytes)),
            ValueType::Float32 => ValueView::Float32(f32::read(bytes)),
            ValueType::Float64 => ValueView::Float64(f64::read(bytes)),
            ValueType::Timestamp => ValueView::Timestamp(i64::read(bytes)),
            ValueType::Uuid => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(&bytes[..16]);
                ValueView::Uuid(uuid)
            }
            ValueType::String => ValueView::Str(self.inline_str(bytes)),
            ValueType::Binary => ValueView::Bytes(self.inline_bytes(bytes)),
            ValueType::Text => match self.references.get(u64::read(bytes)) {
                Some(value) => value.as_view(),
                None => ValueView::Str(""),
            },
            ValueType::Blob => match self.references.get(u64::read(bytes)) {
                Some(value) => value.as_view(),
                None => ValueView::Bytes(&[]),
            },
        }
    }

    fn inline_str<'a>(&self, cell: &'a [u8]) -> &'a str {
        std::str::from_utf8(self.inline_bytes(cell))
            .expect("inline string cell holds invalid utf-8")
    }

    fn inline_bytes<'a>(&self, cell: &'a [u8]) -> &'a [u8] {
        let prefix = LENGTH_PREFIX as usize;
        let length = u32::from_le_bytes([cell[0], cell[1], cell[2], cell[3]]) as usize;
        debug_assert!(prefix + length <= cell.len(), "corrupt length prefix");
        &cell[prefix..(prefix + length).min(cell.len())]
    }

    /// Read a cell as an owned value.
    pub fn cell_value(&self, row: u64, column: usize) -> Value {
        self.cell_view(row, column).to_value()
    }

    /// Read a cell addressed by index, name, alias, or wildcard. A name that
    /// resolves to no schema column falls through to the row's dynamic
    /// arguments map.
    pub fn cell_view_by<'a, 'b>(
        &'a self,
        row: u64,
        column: impl Into<ColumnRef<'b>>,
    ) -> Option<ValueView<'a>> {
        let column = column.into();
        match self.registry.resolve(column) {
            Some(index) => Some(self.cell_view(row, index)),
            None => match column {
                ColumnRef::Name(name) => {
                    self.row_arguments(row)?.get(name).map(|value| value.as_view())
                }
                _ => None,
            },
        }
    }

    // ## cell writes

    /// Write a cell. The value type must match the column's declared type;
    /// a `Null` value marks the cell null (or zeroes it when null tracking is
    /// off). A name that resolves to no schema column is stored in the row's
    /// dynamic arguments map when that section is enabled.
    pub fn cell_set<'a>(
        &mut self,
        row: u64,
        column: impl Into<ColumnRef<'a>>,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let value = value.into();
        self.cell_set_ref(row, column.into(), &value, false)
    }

    /// Write a cell, converting the value to the column's declared type when
    /// the types differ.
    pub fn cell_set_convert<'a>(
        &mut self,
        row: u64,
        column: impl Into<ColumnRef<'a>>,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        let value = value.into();
        self.cell_set_ref(row, column.into(), &value, true)
    }

    fn cell_set_ref(
        &mut self,
        row: u64,
        column: ColumnRef<'_>,
        value: &Value,
        convert: bool,
    ) -> Result<(), Error> {
        match self.registry.resolve(column) {
            Some(index) => self.write_cell(row, index, value, convert),
            None => match column {
                ColumnRef::Name(name) if self.config.row_arguments => {
                    self.row_create_arguments(row).set(name, value.clone());
                    Ok(())
                }
                ColumnRef::Index(index) => Err(Error::ColumnNotFound(index.to_string())),
                ColumnRef::Name(name) | ColumnRef::Alias(name) | ColumnRef::Wildcard(name) => {
                    Err(Error::ColumnNotFound(name.to_string()))
                }
            },
        }
    }

    pub(super) fn write_cell(
        &mut self,
        row: u64,
        index: usize,
        value: &Value,
        convert: bool,
    ) -> Result<(), Error> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        let column = self.column_def(index);
        let expected = column.value_type;
        let offset = column.offset as usize;
        let cell_size = column.cell_size as usize;
        let max_payload = column.size as usize;
        let is_reference = column.reference;

        if value.is_null() {
            if self.is_null_tracking() {
                self.cell_set_null(row, index);
            } else {
                self.row_bytes_mut(row)[offset..offset + cell_size].fill(0);
            }
            return Ok(());
        }

        let converted;
        let value = match value.type_of() {
            Some(actual) if type_accepts(expected, actual) => value,
            Some(actual) if !convert => {
                return Err(Error::TypeMismatch {
                    column: self.column_def(index).name.clone(),
                    expected,
                    actual: Some(actual),
                });
            }
            _ => {
                converted = value.convert_to(expected).ok_or_else(|| Error::Conversion {
                    target: expected,
                    reason: format!("no conversion from {:?}", value.type_of()),
                })?;
                &converted
            }
        };

        if is_reference {
            let payload = value.clone();
            let cell = &self.row_bytes(row)[offset..offset + cell_size];
            let slot = u64::read(cell);
            let slot = if slot == 0 {
                self.references.insert(payload)
            } else {
                self.references.set(slot, payload);
                slot
            };
            slot.write(&mut self.row_bytes_mut(row)[offset..offset + cell_size]);
        } else if let Some(payload) = inline_payload(value) {
            if payload.len() > max_payload {
                return Err(Error::CellOverflow {
                    column: self.column_def(index).name.clone(),
                    size: payload.len(),
                    capacity: max_payload,
                });
            }
            let prefix = LENGTH_PREFIX as usize;
            let cell = &mut self.row_bytes_mut(row)[offset..offset + cell_size];
            cell[..prefix].copy_from_slice(&(payload.len() as u32).to_le_bytes());
            cell[prefix..prefix + payload.len()].copy_from_slice(payload);
            cell[prefix + payload.len()..].fill(0);
        } else {
            let cell = &mut self.row_bytes_mut(row)[offset..offset + cell_size];
            encode_fixed(value, cell);
        }

        if self.is_null_tracking() {
            self.cell_set_not_null(row, index);
        }
        Ok(())
    }

    // ## row-level access

    /// Set leading columns of a row from a slice of values.
    pub fn row_set(&mut self, row: u64, values: &[Value]) -> Result<(), Error> {
        debug_assert!(values.len() <= self.column_count());
        for (index, value) in values.iter().enumerate() {
            self.write_cell(row, index, value, false)?;
        }
        Ok(())
    }

    /// Set leading columns of a row, converting mismatched value types.
    pub fn row_set_convert(&mut self, row: u64, values: &[Value]) -> Result<(), Error> {
        debug_assert!(values.len() <= self.column_count());
        for (index, value) in values.iter().enumerate() {
            self.write_cell(row, index, value, true)?;
        }
        Ok(())
    }

    /// Set named cells of a row (schema columns, or the dynamic arguments map
    /// for unknown names).
    pub fn row_set_named(&mut self, row: u64, values: &[(&str, Value)]) -> Result<(), Error> {
        for (name, value) in values {
            self.cell_set_ref(row, ColumnRef::Name(name), value, false)?;
        }
        Ok(())
    }

    /// Add a row and set leading columns. New rows start all-null when null
    /// tracking is enabled. Returns the new row index.
    pub fn row_add_values(&mut self, values: &[Value]) -> Result<u64, Error> {
        let row = self.row_add_null(1);
        self.row_set(row, values)?;
        Ok(row)
    }

    /// Add a row and set leading columns with conversion. Returns the new row
    /// index.
    pub fn row_add_values_convert(&mut self, values: &[Value]) -> Result<u64, Error> {
        let row = self.row_add_null(1);
        self.row_set_convert(row, values)?;
        Ok(row)
    }

    /// Add a row and set named cells. Returns the new row index.
    pub fn row_add_named(&mut self, values: &[(&str, Value)]) -> Result<u64, Error> {
        let row = self.row_add_null(1);
        self.row_set_named(row, values)?;
        Ok(row)
    }

    /// Add a row from an arguments object; entries whose names match schema
    /// columns land in cells, the rest in the row's dynamic arguments map.
    pub fn row_add_arguments(&mut self, arguments: &Arguments) -> Result<u64, Error> {
        let row = self.row_add_null(1);
        for (name, value) in arguments.iter() {
            self.cell_set_ref(row, ColumnRef::Name(name), value, true)?;
        }
        Ok(row)
    }

    /// Add a row holding a copy of an existing row (cells, metadata, and
    /// dynamic arguments).
    pub fn row_add_copy(&mut self, source: u64) -> u64 {
        let row = self.row_add();
        self.row_copy(row, source);
        row
    }

    /// Copy one row over another: cell bytes, metadata, reference payloads,
    /// and the dynamic arguments map.
    pub fn row_copy(&mut self, target: u64, source: u64) {
        debug_assert!(target < self.row_count && source < self.row_count);
        if target == source {
            return;
        }

        // The byte copy below overwrites the target's argument handle; drop
        // its old map first so the slab entry is not orphaned.
        if self.config.row_arguments {
            self.release_arguments(target);
        }

        let row_size = self.row_size as usize;
        let meta_size = self.row_meta_size as usize;
        let (src, dst) = (source as usize, target as usize);
        self.data
            .copy_within(src * row_size..(src + 1) * row_size, dst * row_size);
        self.meta
            .copy_within(src * meta_size..(src + 1) * meta_size, dst * meta_size);

        // Reference slots and argument handles were byte-copied and now alias
        // the source row; give the target its own copies.
        for index in 0..self.column_count() {
            let column = self.column_def(index);
            if !column.reference {
                continue;
            }
            let offset = column.offset as usize;
            let cell_size = column.cell_size as usize;
            let slot = u64::read(&self.row_bytes(target)[offset..offset + cell_size]);
            if slot == 0 {
                continue;
            }
            let payload = match self.references.get(slot) {
                Some(value) => value.clone(),
                None => continue,
            };
            let new_slot = self.references.insert(payload);
            new_slot.write(&mut self.row_bytes_mut(target)[offset..offset + cell_size]);
        }
        if self.config.row_arguments {
            if let Some(arguments) = self.row_arguments(source).cloned() {
                let handle = self.arguments.insert(arguments);
                let offset = self.arguments_offset as usize;
                self.meta_bytes_mut(target)[offset..offset + 8]
                    .copy_from_slice(&handle.to_le_bytes());
            }
        }
    }

    /// All cells of a row as owned values.
    pub fn row_get_values(&self, row: u64) -> Vec<Value> {
        (0..self.column_count())
            .map(|column| self.cell_value(row, column))
            .collect()
    }

    /// A row flattened into an arguments object: non-null cells keyed by
    /// column name, followed by the dynamic extension entries.
    pub fn row_get_arguments(&self, row: u64) -> Arguments {
        let mut arguments = Arguments::new();
        for (index, column) in self.registry.iter().enumerate() {
            let value = self.cell_value(row, index);
            if !value.is_null() {
                arguments.set(column.name.clone(), value);
            }
        }
        if let Some(extension) = self.row_arguments(row) {
            for (name, value) in extension.iter() {
                arguments.set(name, value.clone());
            }
        }
        arguments
    }

    /// Iterate live rows.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            row: 0,
        }
    }

    /// Get a view of one live row.
    pub fn row(&self, row: u64) -> RowView<'_> {
        debug_assert!(row < self.row_count, "row index out of bounds");
        RowView { table: self, row }
    }

    /// Iterate one column's values over live rows.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = ValueView<'_>> + '_ {
        (0..self.row_count).map(move |row| self.cell_view(row, column))
    }
}

fn inline_payload(value: &Value) -> Option<&[u8]> {
    match value {
        Value::String(s) => Some(s.as_bytes()),
        Value::Binary(b) => Some(b),
        _ => None,
    }
}

/// Encode a fixed-width value into a cell. The value's type has already been
/// matched against the column.
fn encode_fixed(value: &Value, cell: &mut [u8]) {
    match value {
        Value::Bool(v) => v.write(cell),
        Value::Int8(v) => v.write(cell),
        Value::UInt8(v) => v.write(cell),
        Value::Int16(v) => v.write(cell),
        Value::UInt16(v) => v.write(cell),
        Value::Int32(v) => v.write(cell),
        Value::UInt32(v) => v.write(cell),
        Value::Int64(v) => v.write(cell),
        Value::UInt64(v) => v.write(cell),
        Value::Float32(v) => v.write(cell),
        Value::Float64(v) => v.write(cell),
        Value::Timestamp(v) => v.write(cell),
        Value::Uuid(v) => cell[..16].copy_from_slice(v),
        Value::Null | Value::String(_) | Value::Binary(_) => {
            debug_assert!(false, "not a fixed-width value")
        }
    }
}

/// Iterator over a table's live rows.
pub struct Rows<'a> {
    table: &'a Table,
    row: u64,
}

impl<'a> Iterator for Rows<'a> {
    type Item = RowView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.table.row_count() {
            return None;
        }
        let view = RowView {
            table: self.table,
            row: self.row,
        };
        self.row += 1;
        Some(view)
    }
}

/// A borrowed view of one row, addressed by `(table, index)`.
///
/// The view stays valid across growth (indices are stable); it borrows the
/// table, so mutation requires dropping it first.
#[derive(Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    row: u64,
}

impl<'a> RowView<'a> {
    /// The row index.
    pub fn index(&self) -> u64 {
        self.row
    }

    /// Read a cell of this row as a view.
    pub fn view(&self, column: usize) -> ValueView<'a> {
        self.table.cell_view(self.row, column)
    }

    /// Read a cell of this row as an owned value.
    pub fn value(&self, column: usize) -> Value {
        self.table.cell_value(self.row, column)
    }

    /// All cells of this row as owned values.
    pub fn values(&self) -> Vec<Value> {
        self.table.row_get_values(self.row)
    }

    /// The row's dynamic arguments map, if any.
    pub fn arguments(&self) -> Option<&'a Arguments> {
        self.table.row_arguments(self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Table, TableConfig};
    use super::*;
    use crate::schema::ColumnDef;

    fn mixed_table() -> Table {
        let mut table = Table::new(TableConfig::new().with_null64().with_row_arguments());
        table
            .column_add(ColumnDef::new(ValueType::String, "path").with_size(260))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::String, "name").with_size(64))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::UInt64, "size"))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::Float64, "ratio"))
            .unwrap();
        table.prepare().unwrap();
        table
    }

    #[test]
    fn test_primitive_roundtrip() {
        let mut table = mixed_table();
        let row = table.row_add();

        table.cell_set_primitive(row, 2, 123_456u64);
        assert_eq!(table.cell_get_primitive::<u64>(row, 2), 123_456);

        table.cell_set_primitive(row, 3, 0.25f64);
        assert_eq!(table.cell_get_primitive::<f64>(row, 3), 0.25);
    }

    #[test]
    fn test_string_cell_roundtrip() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);

        table.cell_set(row, "path", "C:\\a.txt").unwrap();
        assert_eq!(table.cell_view(row, 0).as_str(), Some("C:\\a.txt"));

        // Overwriting with a shorter value leaves no stale bytes.
        table.cell_set(row, "path", "b").unwrap();
        assert_eq!(table.cell_view(row, 0).as_str(), Some("b"));
    }

    #[test]
    fn test_null_marks_clear_on_write() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);

        assert!(table.cell_view(row, 2).is_null());
        table.cell_set(row, 2usize, 9u64).unwrap();
        assert!(!table.cell_is_null(row, 2));
        assert_eq!(table.cell_view(row, 2), ValueView::UInt64(9));

        table.cell_set(row, 2usize, Value::Null).unwrap();
        assert!(table.cell_is_null(row, 2));
    }

    #[test]
    fn test_type_mismatch_and_convert() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);

        assert!(matches!(
            table.cell_set(row, 2usize, Value::Int32(7)),
            Err(Error::TypeMismatch { .. })
        ));
        table.cell_set_convert(row, 2usize, Value::Int32(7)).unwrap();
        assert_eq!(table.cell_view(row, 2), ValueView::UInt64(7));

        table.cell_set_convert(row, 3usize, "2.5").unwrap();
        assert_eq!(table.cell_view(row, 3), ValueView::Float64(2.5));
    }

    #[test]
    fn test_cell_overflow() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);
        let long = "x".repeat(65);

        assert!(matches!(
            table.cell_set(row, "name", long.as_str()),
            Err(Error::CellOverflow { .. })
        ));
    }

    #[test]
    fn test_unknown_name_falls_back_to_arguments() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);

        table.cell_set(row, "tag", "urgent").unwrap();
        assert!(table.row_arguments_exists(row));
        assert_eq!(
            table.cell_view_by(row, "tag").and_then(|v| v.as_str().map(String::from)),
            Some("urgent".into())
        );

        // Schema columns are unaffected by the fallback.
        assert!(table.cell_view_by(row, "path").unwrap().is_null());
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let mut table = mixed_table();
        let row = table.row_add_null(1);
        assert!(matches!(
            table.cell_set(row, 9usize, 1u64),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_row_add_values_and_iteration() {
        let mut table = mixed_table();
        table
            .row_add_values(&[
                Value::String("C:\\a.txt".into()),
                Value::String("a.txt".into()),
                Value::UInt64(10),
            ])
            .unwrap();
        table
            .row_add_values(&[
                Value::String("C:\\b.txt".into()),
                Value::String("b.txt".into()),
                Value::UInt64(20),
            ])
            .unwrap();

        let names: Vec<Value> = table.rows().map(|row| row.value(1)).collect();
        assert_eq!(
            names,
            vec![Value::String("a.txt".into()), Value::String("b.txt".into())]
        );

        // Fourth column was never set; it stays null.
        assert!(table.row(0).view(3).is_null());

        let sizes: Vec<_> = table.column_values(2).collect();
        assert_eq!(sizes, vec![ValueView::UInt64(10), ValueView::UInt64(20)]);
    }

    #[test]
    fn test_row_get_arguments_flattens_extension() {
        let mut table = mixed_table();
        let row = table
            .row_add_named(&[("name", Value::String("a.txt".into())), ("size", Value::UInt64(1))])
            .unwrap();
        table.cell_set(row, "tag", "keep").unwrap();

        let flat = table.row_get_arguments(row);
        assert_eq!(flat.get("name"), Some(&Value::String("a.txt".into())));
        assert_eq!(flat.get("size"), Some(&Value::UInt64(1)));
        assert_eq!(flat.get("tag"), Some(&Value::String("keep".into())));
        assert_eq!(flat.get("path"), None); // null cell is skipped
    }

    #[test]
    fn test_row_copy_duplicates_extension_and_references() {
        let mut table = Table::new(TableConfig::new().with_row_arguments());
        table
            .column_add(ColumnDef::new(ValueType::Text, "notes"))
            .unwrap();
        table
            .column_add(ColumnDef::new(ValueType::Int32, "n"))
            .unwrap();
        table.prepare().unwrap();

        let row = table
            .row_add_values(&[Value::String("hello".into()), Value::Int32(1)])
            .unwrap();
        table.cell_set(row, "extra", 5i32).unwrap();

        let copy = table.row_add_copy(row);
        assert_eq!(table.cell_view(copy, 0).as_str(), Some("hello"));
        assert_eq!(table.row_arguments(copy).unwrap().get("extra"), Some(&Value::Int32(5)));

        // The copy owns its payloads: rewriting the original leaves it alone.
        table.cell_set(row, "notes", "changed").unwrap();
        table.row_arguments_mut(row).unwrap().set("extra", 6i32);
        assert_eq!(table.cell_view(copy, 0).as_str(), Some("hello"));
        assert_eq!(table.row_arguments(copy).unwrap().get("extra"), Some(&Value::Int32(5)));
    }

    #[test]
    fn test_text_reference_rewrite_in_place() {
        let mut table = Table::new(TableConfig::default());
        table
            .column_add(ColumnDef::new(ValueType::Text, "body"))
            .unwrap();
        table.prepare().unwrap();

        let row = table.row_add();
        assert_eq!(table.cell_view(row, 0).as_str(), Some(""));

        table.cell_set(row, 0usize, "first version").unwrap();
        table.cell_set(row, 0usize, "second version").unwrap();
        assert_eq!(table.cell_view(row, 0).as_str(), Some("second version"));
        // One payload slot plus the reserved empty slot.
        assert_eq!(table.references().len(), 2);
    }
}
