//! Comma-separated output (RFC 4180, CRLF line endings).

use super::TabularSink;
use crate::core::ConvertError;
use crate::report::ProjectedRow;

/// Writes the header and rows as CSV text.
#[derive(Debug, Clone, Copy)]
pub struct CsvSink {
    /// Field separator, `,` unless set otherwise.
    pub delimiter: char,
}

impl Default for CsvSink {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl TabularSink for CsvSink {
    fn write(&self, headers: &[&str], rows: &[ProjectedRow]) -> Result<Vec<u8>, ConvertError> {
        let mut out = String::new();
        self.write_record(&mut out, headers.iter().copied());
        for row in rows {
            self.write_record(&mut out, row.iter().map(String::as_str));
        }
        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}

impl CsvSink {
    fn write_record<'a>(&self, out: &mut String, fields: impl Iterator<Item = &'a str>) {
        for (i, field) in fields.enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            self.csv_field(out, field);
        }
        out.push_str("\r\n");
    }

    fn csv_field(&self, out: &mut String, value: &str) {
        let needs_quotes = value
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\r' || c == '\n');
        if !needs_quotes {
            out.push_str(value);
            return;
        }
        out.push('"');
        for ch in value.chars() {
            if ch == '"' {
                out.push_str("\"\"");
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}
