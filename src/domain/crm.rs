// ============================================================
// CRM LOOKUP TYPES
// ============================================================
// Summaries extracted from the CRM's schema and property-group listings

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix shared by custom object type ids.
pub const CUSTOM_OBJECT_PREFIX: &str = "2-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomObject {
    pub name: String,
    pub object_type_id: String,
    /// Unique property group names, in first-seen order.
    pub group_names: Vec<String>,
}

/// Result reported back to callers of the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub num_properties_created: usize,
}

/// Custom objects found in a schema listing (`{"results": [...]}`).
pub fn custom_objects_from_schemas(listing: &Value) -> Vec<CustomObject> {
    results(listing)
        .iter()
        .filter_map(|schema| {
            let object_type_id = schema["objectTypeId"].as_str()?;
            if !object_type_id.starts_with(CUSTOM_OBJECT_PREFIX) {
                return None;
            }
            let mut group_names: Vec<String> = Vec::new();
            for property in schema["properties"].as_array().into_iter().flatten() {
                if let Some(group) = property["groupName"].as_str() {
                    if !group_names.iter().any(|g| g == group) {
                        group_names.push(group.to_string());
                    }
                }
            }
            Some(CustomObject {
                name: schema["name"].as_str().unwrap_or_default().to_string(),
                object_type_id: object_type_id.to_string(),
                group_names,
            })
        })
        .collect()
}

/// Group names from a property-group listing.
pub fn group_names_from_listing(listing: &Value) -> Vec<String> {
    results(listing)
        .iter()
        .filter_map(|group| group["name"].as_str())
        .map(str::to_string)
        .collect()
}

/// Number of entries in a batch-create response; `0` when absent.
pub fn created_count(response: &Value) -> usize {
    results(response).len()
}

fn results(value: &Value) -> &[Value] {
    value["results"].as_array().map(Vec::as_slice).unwrap_or(&[])
}
