//! Tabular sinks: serialize projected rows into an output byte stream.
//!
//! A sink is only invoked once the full row set has been assembled, so a
//! failed conversion never produces a partial document.

mod csv;
#[cfg(feature = "xlsx")]
mod xlsx;
#[cfg(feature = "xlsx")]
mod xml;

pub use csv::CsvSink;
#[cfg(feature = "xlsx")]
pub use xlsx::{XLSX_CONTENT_TYPE, XlsxSink, column_name};

use crate::core::{ConvertConfig, ConvertError};
use crate::report::ProjectedRow;

/// Serializes a header and uniform rows into a document.
pub trait TabularSink {
    fn write(&self, headers: &[&str], rows: &[ProjectedRow]) -> Result<Vec<u8>, ConvertError>;

    /// MIME type of the produced document.
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot.
    fn file_extension(&self) -> &'static str;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    #[cfg(feature = "xlsx")]
    Xlsx,
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        #[cfg(feature = "xlsx")]
        return Self::Xlsx;
        #[cfg(not(feature = "xlsx"))]
        return Self::Csv;
    }
}

/// Build the sink for `format`.
#[cfg_attr(not(feature = "xlsx"), allow(unused_variables))]
pub fn sink_for(format: OutputFormat, config: &ConvertConfig) -> Box<dyn TabularSink> {
    match format {
        #[cfg(feature = "xlsx")]
        OutputFormat::Xlsx => Box::new(XlsxSink::new(config.sheet_name.clone())),
        OutputFormat::Csv => Box::new(CsvSink::default()),
    }
}
