use rust_decimal_macros::dec;
use tallyconv::report::{NOT_AVAILABLE, ProjectedRow};
use tallyconv::sink::{CsvSink, TabularSink};
use tallyconv::{
    Cell, Column, ConversionWarning, ConvertConfig, ConvertError, build_report, convert_with,
};

const FIXTURE: &[u8] = include_bytes!("fixtures/receipts.xml");

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn receipt(body: &str) -> String {
    format!(
        r#"<ENVELOPE><BODY><IMPORTDATA><REQUESTDATA>
        <TALLYMESSAGE><VOUCHER VCHTYPE="Receipt">{body}</VOUCHER></TALLYMESSAGE>
        </REQUESTDATA></IMPORTDATA></BODY></ENVELOPE>"#
    )
}

fn header(number: &str, total: &str) -> String {
    format!(
        "<DATE>20230915</DATE>\
         <VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>\
         <VOUCHERNUMBER>{number}</VOUCHERNUMBER>\
         <PARTYLEDGERNAME>Acme Traders</PARTYLEDGERNAME>\
         <AMOUNT>{total}</AMOUNT>"
    )
}

fn allocation(name: &str, bill_type: &str, amount: &str) -> String {
    format!(
        "<BILLALLOCATIONS.LIST><NAME>{name}</NAME><BILLTYPE>{bill_type}</BILLTYPE>\
         <AMOUNT>{amount}</AMOUNT></BILLALLOCATIONS.LIST>"
    )
}

fn entry(ledger: &str, allocations: &str) -> String {
    format!("<ALLLEDGERENTRIES.LIST><LEDGERNAME>{ledger}</LEDGERNAME>{allocations}</ALLLEDGERENTRIES.LIST>")
}

fn rows(xml: &str) -> Vec<ProjectedRow> {
    build_report(xml.as_bytes(), &ConvertConfig::default())
        .unwrap()
        .projected()
}

fn col(name: &str) -> usize {
    Column::headers().iter().position(|h| *h == name).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn new_ref_balanced_against_total() {
    let xml = receipt(&format!(
        "{}{}",
        header("1", "-500"),
        entry("Acme Traders", &allocation("INV-1", "New Ref", "500"))
    ));
    let rows = rows(&xml);
    assert_eq!(rows.len(), 2);

    let child = &rows[0];
    assert_eq!(child[col("Transaction Type")], "Child");
    assert_eq!(child[col("Ref No")], "INV-1");
    assert_eq!(child[col("Ref Type")], "New Ref");
    assert_eq!(child[col("Ref Date")], "15-09-2023");
    assert_eq!(child[col("Ref Amount")], "500.00");
    assert_eq!(child[col("Amount")], "");
    assert_eq!(child[col("Debtor")], "Acme Traders");
    assert_eq!(child[col("Amount Verified")], "");

    let parent = &rows[1];
    assert_eq!(parent[col("Transaction Type")], "Parent");
    assert_eq!(parent[col("Amount")], "500.00");
    assert_eq!(parent[col("Ref No")], "");
    assert_eq!(parent[col("Amount Verified")], "Yes");
}

#[test]
fn bank_allocation_unbalanced() {
    let xml = receipt(&format!(
        "{}{}",
        header("2", "-150"),
        entry("Acme Traders", &allocation("", "Bank", "200"))
    ));
    let report = build_report(xml.as_bytes(), &ConvertConfig::default()).unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[1].amount, Cell::Amount(dec!(0)));

    let rows = report.projected();
    assert_eq!(rows[0][col("Transaction Type")], "Other");
    assert_eq!(rows[0][col("Amount")], "200.00");
    assert_eq!(rows[0][col("Ref Amount")], "");
    assert_eq!(rows[1][col("Amount")], NOT_AVAILABLE);
    assert_eq!(rows[1][col("Amount Verified")], "No");
}

#[test]
fn voucher_without_allocations_yields_one_row() {
    let xml = receipt(&header("3", "-10"));
    let rows = rows(&xml);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row[col("Transaction Type")], "");
    assert_eq!(row[col("Vch No.")], "3");
    assert_eq!(row[col("Debtor")], "Acme Traders");
    for blank in ["Ref No", "Ref Type", "Ref Date", "Ref Amount", "Amount", "Amount Verified"] {
        assert_eq!(row[col(blank)], "", "{blank}");
    }
}

#[test]
fn n_allocations_plus_parent_last() {
    let allocations = [
        allocation("A", "New Ref", "100"),
        allocation("B", "Agst Ref", "50"),
        allocation("C", "GST", "18"),
    ]
    .concat();
    let xml = receipt(&format!("{}{}", header("9", "-150"), entry("Acme", &allocations)));
    let rows = rows(&xml);
    assert_eq!(rows.len(), 4);
    let roles: Vec<_> = rows.iter().map(|r| r[col("Transaction Type")].as_str()).collect();
    assert_eq!(roles, ["Child", "Child", "Other", "Parent"]);
    assert_eq!(rows[3][col("Amount")], "150.00");
    assert_eq!(rows[3][col("Amount Verified")], "Yes");
}

#[test]
fn malformed_date_is_blank_not_fatal() {
    let xml = receipt(
        "<DATE>2023915</DATE><VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>\
         <VOUCHERNUMBER>5</VOUCHERNUMBER>",
    );
    let report = build_report(xml.as_bytes(), &ConvertConfig::default()).unwrap();
    assert_eq!(report.projected()[0][col("Date")], "");
    assert!(matches!(
        &report.warnings[0],
        ConversionWarning::FieldFormat { field, value, .. } if field == "DATE" && value == "2023915"
    ));
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let err = build_report(b"<ENVELOPE><TALLYMESSAGE>", &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Parse { .. }));
    assert!(err.is_input_error());
}

#[test]
fn document_without_receipts_has_no_rows() {
    let report = build_report(b"<ENVELOPE/>", &ConvertConfig::default()).unwrap();
    assert_eq!(report.groups, 0);
    assert!(report.rows.is_empty());

    let csv = convert_with(b"<ENVELOPE/>", &ConvertConfig::default(), &CsvSink::default()).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "Date,Transaction Type,Vch No.,Ref No,Ref Type,Ref Date,Debtor,Ref Amount,Amount,Particulars,Vch Type,Amount Verified\r\n"
    );
}

// ---------------------------------------------------------------------------
// Full fixture
// ---------------------------------------------------------------------------

#[test]
fn fixture_groups_and_rows() {
    let report = build_report(FIXTURE, &ConvertConfig::default()).unwrap();
    assert_eq!(report.groups, 5);
    assert_eq!(report.rows.len(), 10);

    let numbers: Vec<_> = report
        .projected()
        .iter()
        .map(|r| r[col("Vch No.")].clone())
        .collect();
    assert_eq!(numbers, ["1", "1", "2", "2", "3", "4", "4", "4", "6", "6"]);
}

#[test]
fn fixture_warnings_in_document_order() {
    let report = build_report(FIXTURE, &ConvertConfig::default()).unwrap();
    assert_eq!(
        report.warnings,
        vec![
            ConversionWarning::UnclassifiedBillType {
                voucher: Some("4".into()),
                bill_type: Some("On Account".into()),
            },
            ConversionWarning::FieldFormat {
                voucher: Some("6".into()),
                field: "DATE".into(),
                value: "2023915".into(),
            },
        ]
    );
}

#[test]
fn unclassified_amount_still_reconciles() {
    let rows = build_report(FIXTURE, &ConvertConfig::default())
        .unwrap()
        .projected();
    let parent = &rows[7];
    assert_eq!(parent[col("Transaction Type")], "Parent");
    assert_eq!(parent[col("Amount")], "600.00");
    assert_eq!(parent[col("Amount Verified")], "Yes");
}

#[test]
fn amounts_beyond_decimal_range_degrade_to_warning() {
    let huge = "79228162514264337593543950335";
    let xml = receipt(&format!(
        "{}{}",
        header("9", "-1"),
        entry(
            "Acme Traders",
            &format!(
                "{}{}",
                allocation("INV-1", "New Ref", huge),
                allocation("INV-2", "New Ref", huge)
            )
        )
    ));
    let report = build_report(xml.as_bytes(), &ConvertConfig::default()).unwrap();
    assert_eq!(
        report.warnings,
        vec![ConversionWarning::AmountOverflow {
            voucher: Some("9".into()),
        }]
    );

    let rows = report.projected();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][col("Ref Amount")], format!("{huge}.00"));
    assert_eq!(rows[2][col("Transaction Type")], "Parent");
    assert_eq!(rows[2][col("Amount")], "");
    assert_eq!(rows[2][col("Amount Verified")], "No");
}

#[test]
fn deeply_nested_voucher_is_a_parse_error() {
    let depth = 200_000;
    let xml = receipt(&format!("{}{}", "<X>".repeat(depth), "</X>".repeat(depth)));
    let err = build_report(xml.as_bytes(), &ConvertConfig::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Parse { .. }), "{err:?}");
    assert!(err.is_input_error());
}

#[test]
fn zero_amounts_render_as_na() {
    let rows = build_report(FIXTURE, &ConvertConfig::default())
        .unwrap()
        .projected();
    assert_eq!(rows[8][col("Ref Amount")], NOT_AVAILABLE);
    assert_eq!(rows[9][col("Amount")], NOT_AVAILABLE);
    assert_eq!(rows[9][col("Amount Verified")], "Yes");
}

#[test]
fn every_row_has_all_columns() {
    let report = build_report(FIXTURE, &ConvertConfig::default()).unwrap();
    assert_eq!(report.headers().len(), 12);
    for row in report.projected() {
        assert_eq!(row.len(), report.headers().len());
    }
}

#[test]
fn conversion_is_deterministic() {
    let config = ConvertConfig::default();
    let first = convert_with(FIXTURE, &config, &CsvSink::default()).unwrap();
    let second = convert_with(FIXTURE, &config, &CsvSink::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn utf16_export_matches_utf8() {
    let text = std::str::from_utf8(FIXTURE).unwrap();
    let mut utf16 = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        utf16.extend_from_slice(&unit.to_le_bytes());
    }
    let config = ConvertConfig::default();
    assert_eq!(
        build_report(&utf16, &config).unwrap().projected(),
        build_report(FIXTURE, &config).unwrap().projected()
    );
}

#[test]
fn csv_sink_metadata() {
    let sink = CsvSink::default();
    assert_eq!(sink.file_extension(), "csv");
    assert!(sink.content_type().starts_with("text/csv"));
}

#[cfg(feature = "xlsx")]
#[test]
fn xlsx_output_is_a_zip_package() {
    use std::io::{Cursor, Read};

    let bytes = tallyconv::convert(FIXTURE).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    assert!(sheet.contains("<t>Amount Verified</t>"));
    assert!(sheet.contains("<t>Gamma &amp; Sons</t>"));
    assert!(sheet.contains("<row r=\"11\">"));
    assert!(!sheet.contains("<row r=\"12\">"));
}
