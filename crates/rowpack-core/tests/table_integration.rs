//! Integration tests for the table engine.

use rowpack_core::types::{Value, ValueType};
use rowpack_core::{row_state, ColumnDef, SortAlgorithm, Table, TableConfig};

/// The file-listing shape used across these tests:
/// `(path: string[260], name: string[64], size: uint64)` with null64,
/// row-state, and row-arguments metadata.
fn file_table() -> Table {
    let mut table = Table::new(
        TableConfig::new()
            .with_null64()
            .with_row_state()
            .with_row_arguments(),
    );
    table
        .column_add_parsed("path:string:260, name:string:64, size:uint64")
        .unwrap();
    table.prepare().unwrap();
    table
}

fn add_file(table: &mut Table, path: &str, name: &str, size: u64) -> u64 {
    table
        .row_add_values(&[
            Value::String(path.into()),
            Value::String(name.into()),
            Value::UInt64(size),
        ])
        .unwrap()
}

#[test]
fn fixed_schema_with_dynamic_extension() {
    let mut table = file_table();
    let row = add_file(&mut table, "C:\\a.txt", "a.txt", 10);
    assert_eq!(row, 0);

    assert_eq!(table.cell_view_by(0, "path").unwrap().as_str(), Some("C:\\a.txt"));
    assert_eq!(table.cell_view(0, 2).to_u64(), Some(10));

    // "tag" is not a schema column: the write lands in the row's dynamic
    // arguments map and round-trips from there.
    table.cell_set(0, "tag", "urgent").unwrap();
    assert!(table.row_arguments_exists(0));
    assert_eq!(
        table.cell_view_by(0, "tag").unwrap().as_str(),
        Some("urgent")
    );
    assert_eq!(
        table.row_arguments(0).unwrap().get("tag"),
        Some(&Value::String("urgent".into()))
    );
}

#[test]
fn growth_threshold_preserves_existing_rows() {
    let mut table = Table::new(TableConfig::new().initial_reserved_rows(10));
    table
        .column_add(ColumnDef::new(ValueType::Int64, "n"))
        .unwrap();
    table.prepare().unwrap();

    for i in 0..10 {
        table.row_add_values(&[Value::Int64(i)]).unwrap();
    }
    assert_eq!(table.reserved_row_count(), 10);

    table.row_add_values(&[Value::Int64(10)]).unwrap();
    assert_eq!(table.row_count(), 11);
    assert!(table.reserved_row_count() >= 11);

    for i in 0..11 {
        assert_eq!(table.cell_value(i, 0), Value::Int64(i as i64));
    }
}

#[test]
fn growth_preserves_all_metadata_sections() {
    let mut table = file_table();
    // Tight capacity so adds below force several reallocations.
    table.shrink_to_fit();

    let a = add_file(&mut table, "/tmp/a", "a", 1);
    table.cell_set(a, 1usize, Value::Null).unwrap();
    table.row_set_state(a, row_state::IN_USE);
    table.cell_set(a, "checksum", 0xfeedu32).unwrap();

    for i in 0..100 {
        add_file(&mut table, "/tmp/x", "x", i);
    }

    assert_eq!(table.cell_view_by(a, "path").unwrap().as_str(), Some("/tmp/a"));
    assert!(table.cell_is_null(a, 1));
    assert!(!table.cell_is_null(a, 2));
    assert!(table.row_is_in_use(a));
    assert_eq!(
        table.row_arguments(a).unwrap().get("checksum"),
        Some(&Value::UInt32(0xfeed))
    );
    assert!(table.row_count() <= table.reserved_row_count());
}

#[test]
fn null_round_trip_across_sections() {
    let mut table = file_table();
    let row = table.row_add_null(1);

    for column in 0..3 {
        assert!(table.cell_is_null(row, column));
    }

    table.cell_set(row, 2usize, 7u64).unwrap();
    assert!(!table.cell_is_null(row, 2));

    table.cell_set_null(row, 2);
    assert!(table.cell_is_null(row, 2));
    table.cell_set_not_null(row, 2);
    assert!(!table.cell_is_null(row, 2));
}

#[test]
fn find_planted_and_absent() {
    let mut table = file_table();
    for i in 0..50 {
        add_file(&mut table, "/data", &format!("f{}", i), i);
    }

    let found = table.find_value(2, &Value::UInt64(37));
    assert_eq!(found, Some(37));
    assert_eq!(table.find_value(2, &Value::UInt64(999)), None);
    assert_eq!(
        table.find_value(1, &Value::String("f12".into())),
        Some(12)
    );

    let matches = table.find_all(&[
        (0, Value::String("/data".into())),
        (2, Value::UInt64(3)),
    ]);
    assert_eq!(matches, vec![3]);
}

#[test]
fn erase_descending_keeps_survivors_reachable() {
    let mut table = file_table();
    for i in 0..6 {
        add_file(&mut table, "/d", &format!("f{}", i), i);
    }

    let removed = table.erase_rows_desc(&[4, 2, 0]);
    assert_eq!(removed, 3);
    assert_eq!(table.row_count(), 3);

    let names: Vec<Value> = table.rows().map(|row| row.value(1)).collect();
    assert_eq!(
        names,
        vec![
            Value::String("f1".into()),
            Value::String("f3".into()),
            Value::String("f5".into()),
        ]
    );
}

#[test]
fn sort_then_sorted_find() {
    let mut table = file_table();
    for size in [42u64, 7, 99, 1, 64] {
        add_file(&mut table, "/d", "f", size);
    }

    let count = table.row_count();
    table.sort(2, true, 0, count, SortAlgorithm::Bubble);

    let sizes: Vec<Option<u64>> = (0..count).map(|r| table.cell_view(r, 2).to_u64()).collect();
    assert_eq!(
        sizes,
        vec![Some(1), Some(7), Some(42), Some(64), Some(99)]
    );
    assert_eq!(table.find_sorted(2, true, 0, count, &Value::UInt64(64)), Some(3));
    assert_eq!(table.find_sorted(2, true, 0, count, &Value::UInt64(65)), None);
}

#[test]
fn session_pool_slot_reuse_pattern() {
    // The documented concurrency discipline: size the pool once, then only
    // claim and release fixed slots - capacity never changes again.
    let mut pool = Table::new(TableConfig::new().with_row_state());
    pool.column_add_parsed("session:string:40, hits:uint32").unwrap();
    pool.prepare().unwrap();

    pool.reserve(8);
    pool.row_add_count(8);
    let capacity_before = pool.reserved_row_count();

    // Claim every slot.
    for i in 0..8u32 {
        let slot = pool.find_first_free_row(0).unwrap();
        pool.row_set_state(slot, row_state::IN_USE);
        pool.cell_set(slot, "session", format!("s-{}", i)).unwrap();
        pool.cell_set(slot, "hits", 0u32).unwrap();
    }
    assert_eq!(pool.find_first_free_row(0), None);
    assert_eq!(pool.count_used_rows(), 8);

    // Release two, then reuse the lowest free slot.
    pool.row_delete(2);
    pool.row_clear_state(5, row_state::IN_USE);
    assert_eq!(pool.count_free_rows(), 2);
    assert_eq!(pool.find_first_free_row(0), Some(2));

    pool.row_set_state(2, row_state::IN_USE);
    assert_eq!(pool.find_first_free_row(0), Some(5));

    // No operation above changed capacity or row addresses.
    assert_eq!(pool.reserved_row_count(), capacity_before);
    assert_eq!(pool.row_count(), 8);
}

#[test]
fn split_and_merge_round_trip() {
    let mut table = file_table();
    for i in 0..7 {
        add_file(&mut table, "/d", &format!("f{}", i), i);
    }
    table.cell_set(6, "tag", "tail").unwrap();

    let parts = table.split(3);
    assert_eq!(parts.len(), 3);
    assert_eq!(
        parts.iter().map(|p| p.row_count()).collect::<Vec<_>>(),
        vec![3, 3, 1]
    );
    // Parts carry the dynamic extension of their rows.
    assert_eq!(
        parts[2].row_arguments(0).unwrap().get("tag"),
        Some(&Value::String("tail".into()))
    );

    // Merge back into a fresh table with the same shape; append transfers
    // cells, so the merged table matches cell for cell.
    let mut merged = file_table();
    for part in &parts {
        merged.append(part).unwrap();
    }
    assert_eq!(merged.row_count(), 7);
    assert!(merged.table_equal(&table, 0, 7));
}

#[test]
fn clear_resets_rows_but_keeps_schema_and_capacity() {
    let mut table = file_table();
    for i in 0..20 {
        add_file(&mut table, "/d", "f", i);
    }
    let reserved = table.reserved_row_count();

    table.clear();
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.reserved_row_count(), reserved);
    assert_eq!(table.column_count(), 3);

    // The table is immediately reusable.
    let row = add_file(&mut table, "/new", "n", 1);
    assert!(!table.row_arguments_exists(row));
    assert_eq!(table.cell_view_by(row, "name").unwrap().as_str(), Some("n"));
}
