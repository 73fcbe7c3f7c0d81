use tallyconv::{ConvertConfig, ConvertError, build_report};

fn main() {
    let config = ConvertConfig::default();

    // ── 1. Fatal: the document is not well-formed ─────────────────────
    println!("=== Parse Error ===");
    match build_report(b"<ENVELOPE><TALLYMESSAGE>", &config) {
        Ok(_) => println!("  unexpectedly parsed"),
        Err(e @ ConvertError::Parse { .. }) => println!("  {e}"),
        Err(e) => println!("  other error: {e}"),
    }

    // ── 2. Fatal: bytes are not valid UTF-8 ───────────────────────────
    println!("\n=== Encoding Error ===");
    if let Err(e) = build_report(b"<A>\xC3\x28</A>", &config) {
        println!("  {e} (input error: {})", e.is_input_error());
    }

    // ── 3. Recoverable: bad fields degrade to warnings ────────────────
    println!("\n=== Warnings ===");
    let xml = r#"<ENVELOPE><TALLYMESSAGE>
        <VOUCHER VCHTYPE="Receipt">
          <DATE>2024-04-01</DATE>
          <VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>
          <VOUCHERNUMBER>7</VOUCHERNUMBER>
          <AMOUNT>-100.00</AMOUNT>
          <BILLALLOCATIONS.LIST>
            <NAME>ADV-1</NAME><BILLTYPE>Advance</BILLTYPE><AMOUNT>100.00</AMOUNT>
          </BILLALLOCATIONS.LIST>
        </VOUCHER>
      </TALLYMESSAGE></ENVELOPE>"#;
    let report = build_report(xml.as_bytes(), &config).expect("well-formed export");
    for warning in &report.warnings {
        println!("  {warning}");
    }
    for row in report.projected() {
        println!("  {}", row.join(" | "));
    }
}
