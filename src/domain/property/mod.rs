// ============================================================
// PROPERTY DOMAIN LAYER
// ============================================================
// Tables read from a property export and the CRM property records
// derived from them. No I/O, no async.

mod header_index;
mod normalized_table;
mod options_codec;
mod property_record;
mod raw_table;

pub use header_index::{columns, HeaderIndex};
pub use normalized_table::NormalizedTable;
pub use options_codec::{decode_options, encode_options};
pub use property_record::{FieldType, PropertyOption, PropertyRecord, PropertyType};
pub use raw_table::RawTable;

/// Group used when a row leaves "Group Name" blank.
pub const DEFAULT_GROUP_NAME: &str = "contactinformation";
