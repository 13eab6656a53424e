// ============================================================
// NORMALIZED TABLE
// ============================================================
// Editable grid with a fixed header set; every row is exactly as
// wide as the header row.

use serde::{Deserialize, Serialize};

use super::HeaderIndex;
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableParts", into = "TableParts")]
pub struct NormalizedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HeaderIndex,
}

/// Wire shape of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableParts {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Build a table, rejecting rows whose width differs from the header row.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        check_widths(headers.len(), &rows)?;
        let index = HeaderIndex::new(&headers);
        Ok(Self {
            headers,
            rows,
            index,
        })
    }

    /// Same headers (and header index), new rows.
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Result<Self> {
        check_widths(self.headers.len(), &rows)?;
        Ok(Self {
            headers: self.headers.clone(),
            rows,
            index: self.index.clone(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.position(name)
    }

    /// Cell in the named column of `row`, if both exist.
    pub fn cell_by_name(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }
}

fn check_widths(width: usize, rows: &[Vec<String>]) -> Result<()> {
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(AppError::ValidationError(format!(
            "Row {} has {} cells but the table has {} columns",
            idx + 1,
            row.len(),
            width
        )));
    }
    Ok(())
}

impl TryFrom<TableParts> for NormalizedTable {
    type Error = AppError;

    fn try_from(parts: TableParts) -> Result<Self> {
        Self::new(parts.headers, parts.rows)
    }
}

impl From<NormalizedTable> for TableParts {
    fn from(table: NormalizedTable) -> Self {
        let (headers, rows) = table.into_parts();
        Self { headers, rows }
    }
}
