// ============================================================
// PROPERTY BUILDER USE CASE
// ============================================================
// Normalized table rows → CRM property records

use tracing::{debug, warn};

use crate::domain::property::{
    columns, decode_options, FieldType, NormalizedTable, PropertyOption, PropertyRecord,
    PropertyType, DEFAULT_GROUP_NAME,
};

/// Build one record per row, in row order. Never fails: missing columns and
/// unreadable cells fall back to defaults.
pub fn build_property_records(table: &NormalizedTable) -> Vec<PropertyRecord> {
    let records: Vec<PropertyRecord> = (0..table.len())
        .map(|row| build_record(table, row))
        .collect();
    debug!(records = records.len(), "Built property records");
    records
}

fn build_record(table: &NormalizedTable, row: usize) -> PropertyRecord {
    let cell = |name: &str| table.cell_by_name(row, name).unwrap_or("");

    let type_cell = cell(columns::TYPE).trim();
    let property_type = if type_cell.is_empty() {
        PropertyType::String
    } else {
        PropertyType::parse(type_cell)
    };

    let field_type_cell = cell(columns::FIELD_TYPE).trim();
    let field_type = if field_type_cell.is_empty() {
        property_type.default_field_type()
    } else {
        FieldType::parse(field_type_cell)
    };

    let group_name = match cell(columns::GROUP_NAME) {
        blank if blank.trim().is_empty() => DEFAULT_GROUP_NAME.to_string(),
        group => group.to_string(),
    };

    let options = match property_type {
        PropertyType::Bool => Some(PropertyOption::yes_no()),
        PropertyType::Enumeration => Some(enumeration_options(cell(columns::OPTIONS), row)),
        _ => None,
    };

    PropertyRecord {
        name: cell(columns::INTERNAL_NAME).to_string(),
        label: cell(columns::NAME).to_string(),
        description: cell(columns::DESCRIPTION).to_string(),
        group_name,
        field_type,
        hidden: is_true(cell(columns::HIDDEN)),
        display_order: parse_display_order(cell(columns::DISPLAY_ORDER)),
        form_field: !cell(columns::FORM_FIELD).trim().eq_ignore_ascii_case("false"),
        has_unique_value: false,
        options,
        property_type,
    }
}

fn enumeration_options(text: &str, row: usize) -> Vec<PropertyOption> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match decode_options(text) {
        Ok(options) => options,
        Err(err) => {
            warn!(row, error = %err, "Unreadable options cell; sending an empty list");
            Vec::new()
        }
    }
}

fn is_true(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Leading-integer parse: optional sign, then digits up to the first
/// non-digit. `"3rd"` is 3; text without leading digits (or that overflows)
/// is 0.
pub fn parse_display_order(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(byte - b'0')))
        {
            Some(v) => v,
            None => return 0,
        };
    }

    match (seen_digit, negative) {
        (false, _) => 0,
        (true, true) => -value,
        (true, false) => value,
    }
}
