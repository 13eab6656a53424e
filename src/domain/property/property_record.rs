use serde::{Deserialize, Serialize};
use std::fmt;

/// CRM property data type.
///
/// Unknown values are carried through as `Other` so a record can be built
/// from any cell text. `"boolean"` is accepted as an alias of `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    String,
    Number,
    Date,
    Datetime,
    Enumeration,
    Bool,
    Other(String),
}

impl PropertyType {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "string" => PropertyType::String,
            "number" => PropertyType::Number,
            "date" => PropertyType::Date,
            "datetime" => PropertyType::Datetime,
            "enumeration" => PropertyType::Enumeration,
            "bool" | "boolean" => PropertyType::Bool,
            other => PropertyType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Date => "date",
            PropertyType::Datetime => "datetime",
            PropertyType::Enumeration => "enumeration",
            PropertyType::Bool => "bool",
            PropertyType::Other(value) => value,
        }
    }

    /// Field type a row gets when it does not name one.
    pub fn default_field_type(&self) -> FieldType {
        match self {
            PropertyType::String => FieldType::Text,
            PropertyType::Number => FieldType::Number,
            PropertyType::Date | PropertyType::Datetime => FieldType::Date,
            PropertyType::Bool => FieldType::BooleanCheckbox,
            PropertyType::Enumeration => FieldType::Select,
            PropertyType::Other(_) => FieldType::Text,
        }
    }

    /// Field types a user may pick for this type.
    pub fn field_type_choices(&self) -> Vec<FieldType> {
        match self {
            PropertyType::Enumeration => {
                vec![FieldType::Select, FieldType::Radio, FieldType::Checkbox]
            }
            PropertyType::Bool => vec![FieldType::BooleanCheckbox],
            PropertyType::Number => vec![FieldType::Number],
            PropertyType::Date | PropertyType::Datetime => vec![FieldType::Date],
            PropertyType::String | PropertyType::Other(_) => vec![
                FieldType::Text,
                FieldType::Textarea,
                FieldType::File,
                FieldType::CalculationEquation,
            ],
        }
    }
}

impl From<String> for PropertyType {
    fn from(value: String) -> Self {
        PropertyType::parse(&value)
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the CRM renders a property in forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Textarea,
    Date,
    File,
    Number,
    Select,
    Radio,
    Checkbox,
    BooleanCheckbox,
    CalculationEquation,
    Other(String),
}

impl FieldType {
    /// Exact-match parse; anything unrecognised is kept verbatim.
    pub fn parse(value: &str) -> Self {
        match value {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "date" => FieldType::Date,
            "file" => FieldType::File,
            "number" => FieldType::Number,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "booleancheckbox" => FieldType::BooleanCheckbox,
            "calculation_equation" => FieldType::CalculationEquation,
            other => FieldType::Other(other.to_string()),
        }
    }

    /// Type → field type mapping applied to raw type cell text.
    pub fn for_type(type_value: &str) -> Self {
        PropertyType::parse(type_value).default_field_type()
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::BooleanCheckbox => "booleancheckbox",
            FieldType::CalculationEquation => "calculation_equation",
            FieldType::Other(value) => value,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of an enumeration or boolean property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub readonly: bool,
}

impl PropertyOption {
    pub fn new(label: &str, value: &str, display_order: i64) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            display_order,
            hidden: false,
            readonly: false,
        }
    }

    /// Fixed option pair every boolean property carries.
    pub fn yes_no() -> Vec<Self> {
        vec![Self::new("Yes", "true", 1), Self::new("No", "false", 2)]
    }
}

/// Property definition as sent to the batch-create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub field_type: FieldType,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_form_field")]
    pub form_field: bool,
    #[serde(default)]
    pub has_unique_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
}

fn default_form_field() -> bool {
    true
}
