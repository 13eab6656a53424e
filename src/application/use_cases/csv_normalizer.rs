// ============================================================
// CSV NORMALIZER USE CASE
// ============================================================
// Raw property export → editable table with a fixed, derived header set

use tracing::{debug, error};

use crate::domain::property::{columns, FieldType, HeaderIndex, NormalizedTable, RawTable};

/// Export columns never shown in the editable table (lower-cased).
pub const EXCLUDED_COLUMNS: [&str; 8] = [
    "deleted",
    "hubspot defined",
    "created user",
    "usages",
    "read only value",
    "read only definition",
    "calculated",
    "external options",
];

pub fn is_excluded_column(header: &str) -> bool {
    let lowered = header.to_lowercase();
    EXCLUDED_COLUMNS.contains(&lowered.as_str())
}

/// Normalize a raw export.
///
/// Returns `None` when the input has no headers or no rows. Blank and
/// excluded headers are dropped with their cells, "Field Type" is inserted
/// after "Type" when missing, and "Hidden" is appended when missing. With
/// `exclude_defaults`, rows whose original "HubSpot Defined" cell is `true`
/// are removed; that column is located in the raw header row because it never
/// survives into the output.
pub fn normalize(raw: &RawTable, exclude_defaults: bool) -> Option<NormalizedTable> {
    if raw.is_empty() {
        return None;
    }

    let kept: Vec<usize> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.is_empty() && !is_excluded_column(header))
        .map(|(idx, _)| idx)
        .collect();

    let mut headers: Vec<String> = kept.iter().map(|&idx| raw.headers[idx].clone()).collect();
    let mut rows: Vec<Vec<String>> = (0..raw.rows.len())
        .map(|row| kept.iter().map(|&col| raw.cell(row, col).to_string()).collect())
        .collect();

    let index = HeaderIndex::new(&headers);

    if let (None, Some(type_idx)) = (
        index.position(columns::FIELD_TYPE),
        index.position(columns::TYPE),
    ) {
        headers.insert(type_idx + 1, columns::FIELD_TYPE_HEADER.to_string());
        for row in rows.iter_mut() {
            let field_type = FieldType::for_type(&row[type_idx]);
            row.insert(type_idx + 1, field_type.to_string());
        }
    }

    if !index.contains(columns::HIDDEN) {
        headers.push(columns::HIDDEN_HEADER.to_string());
        for row in rows.iter_mut() {
            row.push("false".to_string());
        }
    }

    let before = rows.len();
    if exclude_defaults {
        if let Some(defined_idx) = HeaderIndex::new(&raw.headers).position(columns::HUBSPOT_DEFINED) {
            rows = rows
                .into_iter()
                .enumerate()
                .filter(|(row, _)| raw.cell(*row, defined_idx).to_lowercase() != "true")
                .map(|(_, cells)| cells)
                .collect();
        }
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        dropped_defaults = before - rows.len(),
        "Normalized property export"
    );

    match NormalizedTable::new(headers, rows) {
        Ok(table) => Some(table),
        Err(err) => {
            error!(error = %err, "Normalized rows do not match header width");
            None
        }
    }
}

/// Run the normalizer over an already-normalized table.
pub fn renormalize(table: &NormalizedTable, exclude_defaults: bool) -> Option<NormalizedTable> {
    let raw = RawTable::new(table.headers().to_vec(), table.rows().to_vec());
    normalize(&raw, exclude_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_inserts_field_type_and_hidden() {
        let raw = RawTable::new(
            strings(&["Name", "Internal Name", "Type", "Group Name"]),
            vec![strings(&["Email", "email", "string", "contactinformation"])],
        );
        let table = normalize(&raw, true).unwrap();
        assert_eq!(
            table.headers(),
            strings(&["Name", "Internal Name", "Type", "Field Type", "Group Name", "Hidden"])
        );
        assert_eq!(
            table.rows()[0],
            strings(&["Email", "email", "string", "text", "contactinformation", "false"])
        );
    }

    #[test]
    fn test_empty_input_is_no_table() {
        assert!(normalize(&RawTable::new(vec![], vec![strings(&["x"])]), false).is_none());
        assert!(normalize(&RawTable::new(strings(&["Name"]), vec![]), false).is_none());
    }

    #[test]
    fn test_excluded_and_blank_columns_dropped() {
        let raw = RawTable::new(
            strings(&["Name", "Deleted", "", "USAGES", "Type", "Read Only Value"]),
            vec![strings(&["Email", "false", "junk", "3", "enumeration", "false"])],
        );
        let table = normalize(&raw, false).unwrap();
        assert_eq!(table.headers(), strings(&["Name", "Type", "Field Type", "Hidden"]));
        assert_eq!(table.rows()[0], strings(&["Email", "enumeration", "select", "false"]));
    }

    #[test]
    fn test_existing_field_type_and_hidden_untouched() {
        let raw = RawTable::new(
            strings(&["Type", "field type", "HIDDEN"]),
            vec![strings(&["number", "text", "true"])],
        );
        let table = normalize(&raw, false).unwrap();
        assert_eq!(table.headers(), strings(&["Type", "field type", "HIDDEN"]));
        assert_eq!(table.rows()[0], strings(&["number", "text", "true"]));
    }

    #[test]
    fn test_no_type_column_means_no_field_type() {
        let raw = RawTable::new(strings(&["Name"]), vec![strings(&["Email"])]);
        let table = normalize(&raw, false).unwrap();
        assert_eq!(table.headers(), strings(&["Name", "Hidden"]));
    }

    #[test]
    fn test_short_rows_padded_long_rows_truncated() {
        let raw = RawTable::new(
            strings(&["Name", "Type"]),
            vec![strings(&["Email"]), strings(&["Phone", "number", "extra"])],
        );
        let table = normalize(&raw, false).unwrap();
        assert_eq!(table.rows()[0], strings(&["Email", "", "text", "false"]));
        assert_eq!(table.rows()[1], strings(&["Phone", "number", "number", "false"]));
    }

    #[test]
    fn test_default_properties_filtered_by_original_column() {
        let raw = RawTable::new(
            strings(&["Name", "HubSpot Defined", "Type"]),
            vec![
                strings(&["Email", "TRUE", "string"]),
                strings(&["Favourite colour", "false", "string"]),
                strings(&["Owner", "true", "string"]),
            ],
        );

        let filtered = normalize(&raw, true).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0][0], "Favourite colour");
        assert!(filtered.column(columns::HUBSPOT_DEFINED).is_none());

        let unfiltered = normalize(&raw, false).unwrap();
        assert_eq!(unfiltered.len(), 3);
    }

    #[test]
    fn test_all_rows_filtered_leaves_empty_table() {
        let raw = RawTable::new(
            strings(&["Name", "HubSpot Defined"]),
            vec![strings(&["Email", "true"])],
        );
        let table = normalize(&raw, true).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers(), strings(&["Name", "Hidden"]));
    }

    #[test]
    fn test_renormalize_is_noop() {
        let raw = RawTable::new(
            strings(&["Name", "HubSpot Defined", "Type"]),
            vec![strings(&["Email", "false", "bool"])],
        );
        let once = normalize(&raw, true).unwrap();
        assert_eq!(renormalize(&once, true).unwrap(), once);
        assert_eq!(renormalize(&once, false).unwrap(), once);
    }

    fn header_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Name".to_string()),
            Just("Internal Name".to_string()),
            Just("Type".to_string()),
            Just("TYPE".to_string()),
            Just("Field Type".to_string()),
            Just("Hidden".to_string()),
            Just("Options".to_string()),
            Just("HubSpot Defined".to_string()),
            Just("Deleted".to_string()),
            Just(String::new()),
            "[A-Za-z ]{1,12}",
        ]
    }

    fn raw_strategy() -> impl Strategy<Value = RawTable> {
        (
            prop::collection::vec(header_strategy(), 1..8),
            prop::collection::vec(prop::collection::vec("[a-z]{0,6}|true|string|bool", 0..9), 1..6),
        )
            .prop_map(|(headers, rows)| RawTable::new(headers, rows))
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in raw_strategy(), exclude in any::<bool>()) {
            if let Some(once) = normalize(&raw, exclude) {
                if !once.headers().is_empty() && !once.is_empty() {
                    let twice = renormalize(&once, exclude).unwrap();
                    prop_assert_eq!(twice, once);
                }
            }
        }

        #[test]
        fn prop_rows_match_header_width(raw in raw_strategy(), exclude in any::<bool>()) {
            if let Some(table) = normalize(&raw, exclude) {
                for row in table.rows() {
                    prop_assert_eq!(row.len(), table.headers().len());
                }
                let hidden = table.headers().iter().filter(|h| h.to_lowercase() == "hidden").count();
                prop_assert!(hidden >= 1);
            }
        }
    }
}
