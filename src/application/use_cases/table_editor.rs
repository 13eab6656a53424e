// ============================================================
// TABLE EDITOR USE CASE
// ============================================================
// Row-level edits on a normalized table. Each edit returns a new table.

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::property::{columns, encode_options, FieldType, NormalizedTable, PropertyOption};

/// Value written into a cell. Flags are stored as `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Flag(bool),
    Text(String),
}

impl CellValue {
    pub fn into_cell_text(self) -> String {
        match self {
            CellValue::Flag(flag) => flag.to_string(),
            CellValue::Text(text) => text,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Flag(value)
    }
}

fn check_row(table: &NormalizedTable, row: usize) -> Result<()> {
    if row >= table.len() {
        return Err(AppError::ValidationError(format!(
            "Row {} is out of range ({} rows)",
            row,
            table.len()
        )));
    }
    Ok(())
}

fn check_column(table: &NormalizedTable, col: usize) -> Result<()> {
    if col >= table.headers().len() {
        return Err(AppError::ValidationError(format!(
            "Column {} is out of range ({} columns)",
            col,
            table.headers().len()
        )));
    }
    Ok(())
}

pub fn delete_row(table: &NormalizedTable, row: usize) -> Result<NormalizedTable> {
    check_row(table, row)?;
    let mut rows = table.rows().to_vec();
    rows.remove(row);
    table.with_rows(rows)
}

/// Insert a copy of `row` directly below it.
pub fn clone_row(table: &NormalizedTable, row: usize) -> Result<NormalizedTable> {
    check_row(table, row)?;
    let mut rows = table.rows().to_vec();
    let copy = rows[row].clone();
    rows.insert(row + 1, copy);
    table.with_rows(rows)
}

pub fn set_cell(
    table: &NormalizedTable,
    row: usize,
    col: usize,
    value: CellValue,
) -> Result<NormalizedTable> {
    check_row(table, row)?;
    check_column(table, col)?;
    let mut rows = table.rows().to_vec();
    rows[row][col] = value.into_cell_text();
    table.with_rows(rows)
}

/// Set the "Type" cell and reset "Field Type" to the type's default.
///
/// A table without a "Type" column is returned unchanged.
pub fn set_type(table: &NormalizedTable, row: usize, value: &str) -> Result<NormalizedTable> {
    check_row(table, row)?;
    let Some(type_idx) = table.column(columns::TYPE) else {
        return Ok(table.clone());
    };

    let mut rows = table.rows().to_vec();
    rows[row][type_idx] = value.to_string();
    if let Some(field_type_idx) = table.column(columns::FIELD_TYPE) {
        rows[row][field_type_idx] = FieldType::for_type(value).to_string();
    }
    table.with_rows(rows)
}

/// Set the "Field Type" cell. Without a "Field Type" column the value goes
/// into the column right after "Type"; with neither the table is unchanged.
pub fn set_field_type(
    table: &NormalizedTable,
    row: usize,
    value: &str,
) -> Result<NormalizedTable> {
    check_row(table, row)?;
    let target = table.column(columns::FIELD_TYPE).or_else(|| {
        table
            .column(columns::TYPE)
            .map(|idx| idx + 1)
            .filter(|&idx| idx < table.headers().len())
    });
    let Some(col) = target else {
        return Ok(table.clone());
    };

    let mut rows = table.rows().to_vec();
    rows[row][col] = value.to_string();
    table.with_rows(rows)
}

/// Store `options` as JSON in the "Options" cell. No-op without that column.
pub fn set_options(
    table: &NormalizedTable,
    row: usize,
    options: &[PropertyOption],
) -> Result<NormalizedTable> {
    check_row(table, row)?;
    let Some(options_idx) = table.column(columns::OPTIONS) else {
        return Ok(table.clone());
    };

    let mut rows = table.rows().to_vec();
    rows[row][options_idx] = encode_options(options)?;
    table.with_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::decode_options;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> NormalizedTable {
        NormalizedTable::new(
            strings(&["Name", "Type", "Field Type", "Options", "Hidden"]),
            vec![
                strings(&["Email", "string", "text", "", "false"]),
                strings(&["Tier", "enumeration", "select", "[]", "false"]),
                strings(&["Active", "bool", "booleancheckbox", "", "false"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_delete_row() {
        let table = delete_row(&sample(), 1).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], "Active");
    }

    #[test]
    fn test_clone_row_inserts_below() {
        let table = clone_row(&sample(), 0).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[0], table.rows()[1]);
        assert_eq!(table.rows()[2][0], "Tier");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let table = sample();
        assert!(matches!(delete_row(&table, 3), Err(AppError::ValidationError(_))));
        assert!(matches!(clone_row(&table, 9), Err(AppError::ValidationError(_))));
        assert!(matches!(
            set_cell(&table, 0, 5, "x".into()),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_set_cell_text_and_flag() {
        let table = set_cell(&sample(), 0, 0, "Work email".into()).unwrap();
        assert_eq!(table.rows()[0][0], "Work email");

        let table = set_cell(&table, 0, 4, true.into()).unwrap();
        assert_eq!(table.rows()[0][4], "true");
    }

    #[test]
    fn test_cell_value_untagged_serde() {
        let flag: CellValue = serde_json::from_str("false").unwrap();
        assert_eq!(flag, CellValue::Flag(false));
        let text: CellValue = serde_json::from_str("\"Email\"").unwrap();
        assert_eq!(text, CellValue::Text("Email".to_string()));
    }

    #[test]
    fn test_set_type_resets_field_type() {
        let table = set_type(&sample(), 0, "enumeration").unwrap();
        assert_eq!(table.rows()[0][1], "enumeration");
        assert_eq!(table.rows()[0][2], "select");

        let table = set_type(&table, 0, "datetime").unwrap();
        assert_eq!(table.rows()[0][2], "date");
    }

    #[test]
    fn test_set_type_without_type_column_is_noop() {
        let table = NormalizedTable::new(strings(&["Name", "Hidden"]), vec![strings(&["a", "false"])]).unwrap();
        assert_eq!(set_type(&table, 0, "number").unwrap(), table);
    }

    #[test]
    fn test_set_field_type() {
        let table = set_field_type(&sample(), 1, "radio").unwrap();
        assert_eq!(table.rows()[1][2], "radio");
    }

    #[test]
    fn test_set_field_type_falls_back_after_type() {
        let table = NormalizedTable::new(
            strings(&["Type", "Label", "Hidden"]),
            vec![strings(&["string", "Email", "false"])],
        )
        .unwrap();
        let edited = set_field_type(&table, 0, "textarea").unwrap();
        assert_eq!(edited.rows()[0], strings(&["string", "textarea", "false"]));
    }

    #[test]
    fn test_set_options_encodes_json() {
        let options = vec![
            PropertyOption::new("Gold", "gold", 0),
            PropertyOption::new("Silver", "silver", 1),
        ];
        let table = set_options(&sample(), 1, &options).unwrap();
        assert_eq!(decode_options(&table.rows()[1][3]).unwrap(), options);
    }

    #[test]
    fn test_set_options_without_column_is_noop() {
        let table = NormalizedTable::new(strings(&["Name", "Hidden"]), vec![strings(&["a", "false"])]).unwrap();
        let edited = set_options(&table, 0, &[PropertyOption::new("A", "a", 0)]).unwrap();
        assert_eq!(edited, table);
    }
}
