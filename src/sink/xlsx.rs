//! Minimal SpreadsheetML (`.xlsx`) package writer.
//!
//! The package holds a single worksheet whose cells are all inline
//! strings, so no shared-strings or styles part is required.

use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use super::TabularSink;
use super::xml::XmlWriter;
use crate::core::ConvertError;
use crate::report::ProjectedRow;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Writes rows as an Office Open XML workbook.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    pub sheet_name: String,
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".into(),
        }
    }
}

impl XlsxSink {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl TabularSink for XlsxSink {
    fn write(&self, headers: &[&str], rows: &[ProjectedRow]) -> Result<Vec<u8>, ConvertError> {
        let parts = [
            ("[Content_Types].xml", content_types()?),
            ("_rels/.rels", package_rels()?),
            ("xl/workbook.xml", workbook(&self.sheet_name)?),
            ("xl/_rels/workbook.xml.rels", workbook_rels()?),
            ("xl/worksheets/sheet1.xml", worksheet(headers, rows)?),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in parts {
            zip.start_file(name, options).map_err(zip_error)?;
            zip.write_all(&content)?;
        }
        let cursor = zip.finish().map_err(zip_error)?;
        Ok(cursor.into_inner())
    }

    fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    fn file_extension(&self) -> &'static str {
        "xlsx"
    }
}

fn zip_error(e: zip::result::ZipError) -> ConvertError {
    ConvertError::Sink(format!("zip error: {e}"))
}

fn content_types() -> Result<Vec<u8>, ConvertError> {
    let mut w = XmlWriter::new()?;
    w.start_element("Types", &[("xmlns", NS_CONTENT_TYPES)])?
        .empty_element(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )?
        .empty_element(
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        )?
        .empty_element(
            "Override",
            &[
                ("PartName", "/xl/workbook.xml"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
                ),
            ],
        )?
        .empty_element(
            "Override",
            &[
                ("PartName", "/xl/worksheets/sheet1.xml"),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
                ),
            ],
        )?
        .end_element("Types")?;
    Ok(w.into_bytes())
}

fn package_rels() -> Result<Vec<u8>, ConvertError> {
    let rel_type = format!("{NS_REL}/officeDocument");
    let mut w = XmlWriter::new()?;
    w.start_element("Relationships", &[("xmlns", NS_PKG_REL)])?
        .empty_element(
            "Relationship",
            &[
                ("Id", "rId1"),
                ("Type", rel_type.as_str()),
                ("Target", "xl/workbook.xml"),
            ],
        )?
        .end_element("Relationships")?;
    Ok(w.into_bytes())
}

fn workbook(sheet_name: &str) -> Result<Vec<u8>, ConvertError> {
    let mut w = XmlWriter::new()?;
    w.start_element("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?
        .start_element("sheets", &[])?
        .empty_element(
            "sheet",
            &[("name", sheet_name), ("sheetId", "1"), ("r:id", "rId1")],
        )?
        .end_element("sheets")?
        .end_element("workbook")?;
    Ok(w.into_bytes())
}

fn workbook_rels() -> Result<Vec<u8>, ConvertError> {
    let rel_type = format!("{NS_REL}/worksheet");
    let mut w = XmlWriter::new()?;
    w.start_element("Relationships", &[("xmlns", NS_PKG_REL)])?
        .empty_element(
            "Relationship",
            &[
                ("Id", "rId1"),
                ("Type", rel_type.as_str()),
                ("Target", "worksheets/sheet1.xml"),
            ],
        )?
        .end_element("Relationships")?;
    Ok(w.into_bytes())
}

fn worksheet(headers: &[&str], rows: &[ProjectedRow]) -> Result<Vec<u8>, ConvertError> {
    let mut w = XmlWriter::new()?;
    w.start_element("worksheet", &[("xmlns", NS_MAIN)])?
        .start_element("sheetData", &[])?;
    write_row(&mut w, 1, headers.iter().copied())?;
    for (i, row) in rows.iter().enumerate() {
        write_row(&mut w, i + 2, row.iter().map(String::as_str))?;
    }
    w.end_element("sheetData")?.end_element("worksheet")?;
    Ok(w.into_bytes())
}

fn write_row<'a>(
    w: &mut XmlWriter,
    number: usize,
    cells: impl Iterator<Item = &'a str>,
) -> Result<(), ConvertError> {
    let r = number.to_string();
    w.start_element("row", &[("r", r.as_str())])?;
    for (col, value) in cells.enumerate() {
        // Blank cells are omitted rather than written empty.
        if value.is_empty() {
            continue;
        }
        let reference = format!("{}{number}", column_name(col));
        w.start_element("c", &[("r", reference.as_str()), ("t", "inlineStr")])?
            .start_element("is", &[])?;
        if value.trim() != value {
            w.text_element("t", value, &[("xml:space", "preserve")])?;
        } else {
            w.text_element("t", value, &[])?;
        }
        w.end_element("is")?.end_element("c")?;
    }
    w.end_element("row")?;
    Ok(())
}

/// Spreadsheet column name for a zero-based index: 0 → "A", 26 → "AA".
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
