#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(bytes) = tallyconv::convert(s.as_bytes()) {
            assert!(bytes.starts_with(b"PK"));
        }
    }
});
