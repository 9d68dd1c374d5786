//! Row algorithms - linear search, in-place sort, and erase/compaction.

use std::cmp::Ordering;

use rowpack_types::{compare_views, Value};
use tracing::debug;

use super::Table;

/// Sorting algorithm selector for [`Table::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    /// Selection sort: O(n^2) compares, at most n-1 row swaps. Good when row
    /// swaps are the expensive part.
    Selection,
    /// Bubble sort with early exit: cheap on nearly-sorted data.
    Bubble,
}

impl Table {
    // ## find

    /// Linear scan of `[start, start + count)` for the first row whose cell
    /// equals `value`. Numeric comparison crosses widths, so an `Int32`
    /// target matches an `Int64` column holding the same number.
    pub fn find(&self, column: usize, start: u64, count: u64, value: &Value) -> Option<u64> {
        let end = start.saturating_add(count).min(self.row_count);
        let target = value.as_view();
        (start..end).find(|&row| {
            compare_views(&self.cell_view(row, column), &target) == Some(Ordering::Equal)
        })
    }

    /// Scan every live row for `value`. See [`find`](Table::find).
    pub fn find_value(&self, column: usize, value: &Value) -> Option<u64> {
        self.find(column, 0, self.row_count, value)
    }

    /// Linear scan over a column known to be sorted in the given direction,
    /// returning early once cell values cross the target. The engine does not
    /// verify the ordering; an unsorted column gives wrong results, not
    /// errors.
    pub fn find_sorted(
        &self,
        column: usize,
        ascending: bool,
        start: u64,
        count: u64,
        value: &Value,
    ) -> Option<u64> {
        let end = start.saturating_add(count).min(self.row_count);
        let target = value.as_view();
        for row in start..end {
            match compare_views(&self.cell_view(row, column), &target) {
                Some(Ordering::Equal) => return Some(row),
                Some(Ordering::Greater) if ascending => return None,
                Some(Ordering::Less) if !ascending => return None,
                _ => {}
            }
        }
        None
    }

    /// Every live row satisfying all `(column, value)` equality pairs.
    pub fn find_all(&self, criteria: &[(usize, Value)]) -> Vec<u64> {
        (0..self.row_count)
            .filter(|&row| {
                criteria.iter().all(|(column, value)| {
                    compare_views(&self.cell_view(row, *column), &value.as_view())
                        == Some(Ordering::Equal)
                })
            })
            .collect()
    }

    // ## sort

    /// Swap two rows: cell bytes and metadata move together, so null bits,
    /// state words, and argument handles follow their row.
    pub fn swap_rows(&mut self, a: u64, b: u64) {
        debug_assert!(a < self.row_count && b < self.row_count);
        if a == b {
            return;
        }
        let row_size = self.row_size as usize;
        let (a_start, b_start) = (a as usize * row_size, b as usize * row_size);
        for i in 0..row_size {
            self.data.swap(a_start + i, b_start + i);
        }
        let meta_size = self.row_meta_size as usize;
        let (a_meta, b_meta) = (a as usize * meta_size, b as usize * meta_size);
        for i in 0..meta_size {
            self.meta.swap(a_meta + i, b_meta + i);
        }
    }

    fn row_order(&self, column: usize, a: u64, b: u64) -> Ordering {
        // Incomparable cells (mixed string/numeric) are treated as equal so
        // the sort is total; Null orders first.
        compare_views(&self.cell_view(a, column), &self.cell_view(b, column))
            .unwrap_or(Ordering::Equal)
    }

    /// Sort rows `[from, from + count)` in place, keyed on one column.
    pub fn sort(
        &mut self,
        column: usize,
        ascending: bool,
        from: u64,
        count: u64,
        algorithm: SortAlgorithm,
    ) {
        let end = from.saturating_add(count).min(self.row_count);
        if end.saturating_sub(from) < 2 {
            return;
        }
        match algorithm {
            SortAlgorithm::Selection => self.sort_selection(column, ascending, from, end),
            SortAlgorithm::Bubble => self.sort_bubble(column, ascending, from, end),
        }
    }

    fn sort_selection(&mut self, column: usize, ascending: bool, from: u64, end: u64) {
        for i in from..end {
            let mut best = i;
            for j in i + 1..end {
                let order = self.row_order(column, j, best);
                let better = if ascending {
                    order == Ordering::Less
                } else {
                    order == Ordering::Greater
                };
                if better {
                    best = j;
                }
            }
            if best != i {
                self.swap_rows(i, best);
            }
        }
    }

    fn sort_bubble(&mut self, column: usize, ascending: bool, from: u64, end: u64) {
        let mut top = end;
        while top > from + 1 {
            let mut swapped = false;
            for j in from + 1..top {
                let order = self.row_order(column, j - 1, j);
                let out_of_order = if ascending {
                    order == Ordering::Greater
                } else {
                    order == Ordering::Less
                };
                if out_of_order {
                    self.swap_rows(j - 1, j);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
            top -= 1;
        }
    }

    // ## erase

    /// Remove `count` rows starting at `from`, shifting every following row
    /// down. Compaction is stable: surviving rows keep their relative order.
    pub fn erase_range(&mut self, from: u64, count: u64) {
        debug_assert!(from + count <= self.row_count, "erase range out of bounds");
        let count = count.min(self.row_count.saturating_sub(from));
        if count == 0 {
            return;
        }

        if self.config.row_arguments {
            for row in from..from + count {
                self.release_arguments(row);
            }
        }

        let row_size = self.row_size as usize;
        let meta_size = self.row_meta_size as usize;
        let src_row = (from + count) as usize;
        let end_row = self.row_count as usize;
        self.data.copy_within(
            src_row * row_size..end_row * row_size,
            from as usize * row_size,
        );
        self.meta.copy_within(
            src_row * meta_size..end_row * meta_size,
            from as usize * meta_size,
        );
        self.row_count -= count;

        // Zero the stale metadata tail so dead slots carry no null bits,
        // state flags, or argument handles into reuse.
        let tail_start = self.row_count as usize * meta_size;
        let tail_end = (self.row_count + count) as usize * meta_size;
        self.meta[tail_start..tail_end].fill(0);

        debug!(from, count, remaining = self.row_count, "erased rows");
    }

    /// Remove one row. See [`erase_range`](Table::erase_range).
    pub fn erase(&mut self, row: u64) {
        self.erase_range(row, 1);
    }

    /// Batch removal over indices that are already strictly descending - the
    /// raw fast path. The precondition is checked in debug builds only.
    pub fn erase_rows_desc(&mut self, rows: &[u64]) -> u64 {
        debug_assert!(
            rows.windows(2).all(|pair| pair[0] > pair[1]),
            "indices must be strictly descending"
        );
        for &row in rows {
            self.erase_range(row, 1);
        }
        rows.len() as u64
    }

    /// Batch removal over indices in any order: sorts descending and
    /// deduplicates, then compacts. Returns the number of rows removed.
    pub fn erase_rows(&mut self, rows: &[u64]) -> u64 {
        let mut sorted = rows.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for &row in &sorted {
            self.erase_range(row, 1);
        }
        sorted.len() as u64
    }
}
