#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes, including non-UTF-8 and UTF-16 inputs.
    if let Ok(report) = tallyconv::build_report(data, &tallyconv::ConvertConfig::default()) {
        for row in report.projected() {
            assert_eq!(row.len(), report.headers().len());
        }
    }
});
