// ============================================================
// RAW TABLE
// ============================================================
// Header row and data rows exactly as read from the uploaded file

use serde::{Deserialize, Serialize};

/// Parsed CSV content before normalization.
///
/// Row lengths are not reconciled with the header length here; the
/// normalizer pads or truncates every row to its derived header set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// True when there is nothing to normalize.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    /// Cell at `(row, col)`, or `""` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}
