//! Parsing and rendering of the scalar field formats used in Tally exports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Tally `YYYYMMDD` date.
///
/// The text must be exactly eight ASCII digits forming a valid calendar
/// date; anything else yields `None`.
pub fn parse_tally_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d").ok()
}

/// Render a date as `DD-MM-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Parse a signed decimal amount such as `-1500.00`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

/// Format a Decimal with at least 2 decimal places, stripping trailing
/// zeros beyond that.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}
