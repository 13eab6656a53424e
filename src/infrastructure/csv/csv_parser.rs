// ============================================================
// CSV PARSER
// ============================================================
// Decode uploaded bytes and split them into a header row and data rows

use csv::ReaderBuilder;
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::property::RawTable;

pub const INVALID_CSV_MESSAGE: &str = "Invalid CSV format. Please check the file and try again.";
pub const UNPARSABLE_CSV_MESSAGE: &str =
    "Failed to parse the CSV file. Please check the file format and try again.";

/// CSV parser with encoding and delimiter detection. Cells are kept
/// untrimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an uploaded file.
    ///
    /// The first non-empty record is the header row. Files with fewer than
    /// two records are rejected; data rows whose cells are all blank after
    /// trimming are dropped.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        let content = decode_text(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<RawTable> {
        let delimiter = Self::detect_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let mut records: Vec<Vec<String>> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                warn!(error = %e, record = index + 1, "Failed to parse CSV record");
                AppError::ParseError(UNPARSABLE_CSV_MESSAGE.to_string())
            })?;
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            if is_empty_line(&cells) {
                continue;
            }
            records.push(cells);
        }

        if records.len() < 2 {
            warn!(records = records.len(), "CSV file has no data rows");
            return Err(AppError::ParseError(INVALID_CSV_MESSAGE.to_string()));
        }

        let mut records = records.into_iter();
        let headers = records.next().unwrap_or_default();
        let rows: Vec<Vec<String>> = records.filter(|row| !is_blank_row(row)).collect();

        debug!(
            columns = headers.len(),
            rows = rows.len(),
            delimiter = %(delimiter as char).escape_default(),
            "Parsed CSV upload"
        );

        Ok(RawTable::new(headers, rows))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<&str> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// BOM-sniffed decode; strict UTF-8 otherwise, Windows-1252 as the fallback.
fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

fn is_empty_line(cells: &[String]) -> bool {
    cells.is_empty() || (cells.len() == 1 && cells[0].is_empty())
}

fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "Name,Internal Name,Type\nEmail,email,string\nPhone,phone,string";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.headers, vec!["Name", "Internal Name", "Type"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Phone", "phone", "string"]);
    }

    #[test]
    fn test_quoted_options_cell() {
        let content = "Name,Options\nTier,\"[{\"\"label\"\":\"\"Gold\"\",\"\"value\"\":\"\"gold\"\"}]\"\n";
        let table = CsvParser::new().parse_content(content).unwrap();
        assert_eq!(table.rows[0][1], r#"[{"label":"Gold","value":"gold"}]"#);
    }

    #[test]
    fn test_header_only_is_invalid() {
        let err = CsvParser::new().parse_content("Name,Type\n").unwrap_err();
        assert_eq!(err, AppError::ParseError(INVALID_CSV_MESSAGE.to_string()));

        let err = CsvParser::new().parse_content("").unwrap_err();
        assert_eq!(err, AppError::ParseError(INVALID_CSV_MESSAGE.to_string()));
    }

    #[test]
    fn test_blank_rows_dropped() {
        let content = "Name,Type\n , \nEmail,string\n,,\n";
        let table = CsvParser::new().parse_content(content).unwrap();
        assert_eq!(table.rows, vec![vec!["Email".to_string(), "string".to_string()]]);
    }

    #[test]
    fn test_only_blank_data_rows_yield_empty_table() {
        let table = CsvParser::new().parse_content("Name,Type\n  ,\t\n").unwrap();
        assert!(table.rows.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_rows_kept() {
        let table = CsvParser::new()
            .parse_content("A,B,C\n1\n1,2,3,4\n")
            .unwrap();
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\tc\nd\te\tf"), b'\t');
        assert_eq!(CsvParser::detect_delimiter("single"), b',');
    }

    #[test]
    fn test_semicolon_file() {
        let table = CsvParser::new().parse_content("Name;Type\nEmail;string").unwrap();
        assert_eq!(table.headers, vec!["Name", "Type"]);
    }

    #[test]
    fn test_decode_bom_and_latin1() {
        let mut utf8_bom = vec![0xEF, 0xBB, 0xBF];
        utf8_bom.extend_from_slice(b"Name,Type\nCaf\xC3\xA9,string\n");
        let table = CsvParser::new().parse_bytes(&utf8_bom).unwrap();
        assert_eq!(table.headers[0], "Name");
        assert_eq!(table.rows[0][0], "Café");

        let latin1 = b"Name,Type\nCaf\xE9,string\n";
        let table = CsvParser::new().parse_bytes(latin1).unwrap();
        assert_eq!(table.rows[0][0], "Café");
    }

    #[test]
    fn test_cells_keep_surrounding_whitespace() {
        let table = CsvParser::new()
            .parse_content("Name , Type\n Email , string \n")
            .unwrap();
        assert_eq!(table.headers, vec!["Name ", " Type"]);
        assert_eq!(table.rows[0], vec![" Email ", " string "]);
    }
}
