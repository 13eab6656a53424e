// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Decoding and splitting uploaded property exports

mod csv_parser;

pub use csv_parser::{CsvParser, INVALID_CSV_MESSAGE, UNPARSABLE_CSV_MESSAGE};
