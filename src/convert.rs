//! Conversion entry points.

use crate::core::{ConvertConfig, ConvertError};
use crate::report::{Report, synthesize};
use crate::sink::TabularSink;
use crate::tally::{decode_document, parse_document, read_group, voucher_groups};

/// Read every receipt voucher of a document into report rows.
///
/// Fails only when the document cannot be decoded or is not well-formed
/// XML. Problems inside a voucher group are recorded as warnings on the
/// report and never affect sibling groups.
pub fn build_report(document: &[u8], config: &ConvertConfig) -> Result<Report, ConvertError> {
    let text = decode_document(document)?;
    let root = parse_document(&text)?;
    let groups = voucher_groups(&root);

    let mut report = Report {
        groups: groups.len(),
        ..Default::default()
    };
    for group in groups {
        let mut ctx = read_group(group);
        let rows = synthesize(&mut ctx, config);
        tracing::debug!(
            voucher = ctx.shared.voucher_number.as_deref().unwrap_or(""),
            allocations = ctx.allocations.len(),
            rows = rows.len(),
            "processed voucher group"
        );
        report.rows.extend(rows);
        report.warnings.extend(ctx.warnings);
    }

    tracing::info!(
        groups = report.groups,
        rows = report.rows.len(),
        warnings = report.warnings.len(),
        "report assembled"
    );
    Ok(report)
}

/// Convert a document with an explicit configuration and sink.
pub fn convert_with(
    document: &[u8],
    config: &ConvertConfig,
    sink: &dyn TabularSink,
) -> Result<Vec<u8>, ConvertError> {
    let report = build_report(document, config)?;
    sink.write(&report.headers(), &report.projected())
}

/// Convert a Tally export to an `.xlsx` workbook with the default
/// configuration.
///
/// # Example
///
/// ```
/// let xml = br#"<ENVELOPE><BODY><TALLYMESSAGE>
///     <VOUCHER VCHTYPE="Receipt"><VOUCHERNUMBER>1</VOUCHERNUMBER></VOUCHER>
/// </TALLYMESSAGE></BODY></ENVELOPE>"#;
/// let xlsx = tallyconv::convert(xml).unwrap();
/// assert_eq!(&xlsx[..2], b"PK");
/// ```
#[cfg(feature = "xlsx")]
pub fn convert(document: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let config = ConvertConfig::default();
    let sink = crate::sink::XlsxSink::new(config.sheet_name.clone());
    convert_with(document, &config, &sink)
}
