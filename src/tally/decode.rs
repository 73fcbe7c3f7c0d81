//! Byte-level decoding of uploaded exports.
//!
//! Tally writes its XML exports as UTF-16LE with a BOM by default, and as
//! UTF-8 when configured so. Both must be accepted.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;

use crate::core::ConvertError;

/// Decode raw document bytes to text.
///
/// A BOM selects the encoding. Without one, a `<` followed by a NUL byte
/// (or the reverse) identifies BOM-less UTF-16; everything else is read
/// as UTF-8. Malformed sequences are an error rather than silently
/// replaced.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, ConvertError> {
    let encoding = sniff(bytes);
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(ConvertError::Encoding(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    tracing::debug!(encoding = encoding.name(), "decoded input document");
    Ok(text)
}

fn sniff(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    match bytes {
        [b'<', 0, ..] => UTF_16LE,
        [0, b'<', ..] => UTF_16BE,
        _ => UTF_8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(s: &str, bom: bool) -> Vec<u8> {
        let mut out = if bom { vec![0xFF, 0xFE] } else { Vec::new() };
        for unit in s.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    #[test]
    fn utf8_plain_and_bom() {
        assert_eq!(decode_document(b"<A/>").unwrap(), "<A/>");
        assert_eq!(decode_document(b"\xEF\xBB\xBF<A/>").unwrap(), "<A/>");
    }

    #[test]
    fn utf16_with_and_without_bom() {
        assert_eq!(decode_document(&utf16le("<A>\u{20B9}</A>", true)).unwrap(), "<A>\u{20B9}</A>");
        assert_eq!(decode_document(&utf16le("<A/>", false)).unwrap(), "<A/>");
    }

    #[test]
    fn utf16be_without_bom() {
        let bytes: Vec<u8> = "<A>\u{20B9}</A>"
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect();
        assert_eq!(decode_document(&bytes).unwrap(), "<A>\u{20B9}</A>");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode_document(b"<A>\xFF\xFF</A>").unwrap_err();
        assert!(matches!(err, ConvertError::Encoding(_)));
    }
}
