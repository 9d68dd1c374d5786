//! Table configuration.

use serde::{Deserialize, Serialize};

/// Default number of rows reserved by `prepare` when the configuration does
/// not say otherwise.
pub const DEFAULT_RESERVED_ROWS: u64 = 10;

/// Per-row null tracking mode.
///
/// The 32- and 64-bit modes bound how many columns the schema may have; the
/// two widths are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullTracking {
    /// No null bitmap; cells always read as their raw bytes.
    #[default]
    None,
    /// 32-bit null bitmap, at most 32 columns.
    Null32,
    /// 64-bit null bitmap, at most 64 columns.
    Null64,
}

impl NullTracking {
    /// Bytes the null bitmap occupies in each row's metadata.
    pub fn byte_size(&self) -> u32 {
        match self {
            NullTracking::None => 0,
            NullTracking::Null32 => 4,
            NullTracking::Null64 => 8,
        }
    }

    /// Maximum column count this mode can track.
    pub fn column_limit(&self) -> Option<usize> {
        match self {
            NullTracking::None => None,
            NullTracking::Null32 => Some(32),
            NullTracking::Null64 => Some(64),
        }
    }
}

/// Configuration for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows to preallocate at `prepare` time.
    pub initial_reserved_rows: u64,

    /// Fixed row increment on growth. Zero means grow by 50% of the new
    /// total row count.
    pub grow_by: u64,

    /// Null bitmap mode.
    pub null: NullTracking,

    /// Reserve a 32-bit row-state word per row (in-use/deleted flags for
    /// pool-style slot reuse).
    pub row_state: bool,

    /// Reserve a per-row slot for the dynamic arguments extension.
    pub row_arguments: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_reserved_rows: DEFAULT_RESERVED_ROWS,
            grow_by: 0,
            null: NullTracking::None,
            row_state: false,
            row_arguments: false,
        }
    }
}

impl TableConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial reserved row count.
    pub fn initial_reserved_rows(mut self, rows: u64) -> Self {
        self.initial_reserved_rows = rows;
        self
    }

    /// Set the fixed growth increment. Zero restores the 50% rule.
    pub fn grow_by(mut self, rows: u64) -> Self {
        self.grow_by = rows;
        self
    }

    /// Enable the 32-bit null bitmap.
    pub fn with_null32(mut self) -> Self {
        self.null = NullTracking::Null32;
        self
    }

    /// Enable the 64-bit null bitmap.
    pub fn with_null64(mut self) -> Self {
        self.null = NullTracking::Null64;
        self
    }

    /// Enable the per-row state word.
    pub fn with_row_state(mut self) -> Self {
        self.row_state = true;
        self
    }

    /// Enable the per-row dynamic arguments slot.
    pub fn with_row_arguments(mut self) -> Self {
        self.row_arguments = true;
        self
    }
}
