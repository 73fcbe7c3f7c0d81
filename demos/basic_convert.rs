use tallyconv::sink::CsvSink;
use tallyconv::{ConvertConfig, build_report, convert_with};

const EXPORT: &str = r#"<ENVELOPE><BODY><IMPORTDATA><REQUESTDATA>
<TALLYMESSAGE>
  <VOUCHER VCHTYPE="Receipt">
    <DATE>20240401</DATE>
    <VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>
    <VOUCHERNUMBER>101</VOUCHERNUMBER>
    <PARTYLEDGERNAME>Sharma Traders</PARTYLEDGERNAME>
    <ALLLEDGERENTRIES.LIST>
      <LEDGERNAME>Sharma Traders</LEDGERNAME>
      <AMOUNT>1500.00</AMOUNT>
      <BILLALLOCATIONS.LIST>
        <NAME>INV-88</NAME><BILLTYPE>Agst Ref</BILLTYPE><AMOUNT>1000.00</AMOUNT>
      </BILLALLOCATIONS.LIST>
      <BILLALLOCATIONS.LIST>
        <NAME>INV-91</NAME><BILLTYPE>New Ref</BILLTYPE><AMOUNT>500.00</AMOUNT>
      </BILLALLOCATIONS.LIST>
    </ALLLEDGERENTRIES.LIST>
    <ALLLEDGERENTRIES.LIST>
      <LEDGERNAME>State Bank</LEDGERNAME>
      <AMOUNT>-1500.00</AMOUNT>
    </ALLLEDGERENTRIES.LIST>
  </VOUCHER>
</TALLYMESSAGE>
</REQUESTDATA></IMPORTDATA></BODY></ENVELOPE>"#;

fn main() {
    let config = ConvertConfig::default();

    // Inspect the rows before choosing an output format
    let report = build_report(EXPORT.as_bytes(), &config).expect("well-formed export");
    println!("{} voucher group(s), {} row(s)", report.groups, report.rows.len());
    for row in report.projected() {
        println!("  {}", row.join(" | "));
    }

    // Same document as CSV
    let csv = convert_with(EXPORT.as_bytes(), &config, &CsvSink::default()).expect("convert");
    println!("\n{}", String::from_utf8_lossy(&csv));

    // And as a workbook
    let xlsx = tallyconv::convert(EXPORT.as_bytes()).expect("convert");
    std::fs::write("tally_data.xlsx", &xlsx).expect("write workbook");
    println!("wrote tally_data.xlsx ({} bytes)", xlsx.len());
}
