//! Voucher-level field extraction.
//!
//! Only direct children of the `VOUCHER` element are read here, so a
//! `LEDGERNAME` nested in a ledger entry can never overwrite the
//! voucher-level one. Allocation-scoped fields are read by
//! [`super::classify`].

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::classify::is_non_empty_allocation;
use super::tree::Element;
use crate::core::format::{parse_amount, parse_tally_date};
use crate::core::{ConversionWarning, SharedFields};

/// Ledger entry list tags, as written by different Tally releases.
pub const LEDGER_ENTRY_TAGS: [&str; 2] = ["ALLLEDGERENTRIES.LIST", "LEDGERENTRIES.LIST"];

/// Extract the shared fields of one receipt voucher.
///
/// Malformed dates and amounts are reported through `warnings` and left
/// unset.
pub fn extract_shared(voucher: &Element, warnings: &mut Vec<ConversionWarning>) -> SharedFields {
    let voucher_number = voucher.child_value("VOUCHERNUMBER").map(str::to_string);
    let mut fields = FieldReader {
        voucher: voucher_number.as_deref(),
        warnings,
    };

    let date = voucher
        .child_value("DATE")
        .and_then(|raw| fields.date("DATE", raw));
    let reference_date = voucher
        .child_value("REFERENCEDATE")
        .and_then(|raw| fields.date("REFERENCEDATE", raw));
    let total_amount = voucher_total(voucher, &mut fields);

    SharedFields {
        date,
        voucher_type: voucher.child_value("VOUCHERTYPENAME").map(str::to_string),
        party_ledger_name: voucher.child_value("PARTYLEDGERNAME").map(str::to_string),
        ledger_name: voucher.child_value("LEDGERNAME").map(str::to_string),
        reference_date,
        total_amount,
        voucher_number,
    }
}

/// The voucher's own `AMOUNT`, or else the amount of the last ledger
/// entry that carries no bill allocation (the counter-entry).
fn voucher_total(voucher: &Element, fields: &mut FieldReader<'_>) -> Option<Decimal> {
    if let Some(raw) = voucher.children_named("AMOUNT").find_map(Element::value) {
        return fields.amount(raw);
    }
    let counter_entry = voucher
        .children
        .iter()
        .filter(|c| LEDGER_ENTRY_TAGS.iter().any(|t| c.is(t)))
        .filter(|entry| !entry.descendants().any(is_non_empty_allocation))
        .filter_map(|entry| entry.child_value("AMOUNT"))
        .last()?;
    fields.amount(counter_entry)
}

/// Parses field text and records a warning for every malformed value.
pub(crate) struct FieldReader<'a> {
    pub(crate) voucher: Option<&'a str>,
    pub(crate) warnings: &'a mut Vec<ConversionWarning>,
}

impl FieldReader<'_> {
    pub(crate) fn date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        let parsed = parse_tally_date(raw);
        if parsed.is_none() {
            self.malformed(field, raw);
        }
        parsed
    }

    pub(crate) fn amount(&mut self, raw: &str) -> Option<Decimal> {
        let parsed = parse_amount(raw);
        if parsed.is_none() {
            self.malformed("AMOUNT", raw);
        }
        parsed
    }

    fn malformed(&mut self, field: &str, raw: &str) {
        let warning = ConversionWarning::FieldFormat {
            voucher: self.voucher.map(str::to_string),
            field: field.to_string(),
            value: raw.to_string(),
        };
        tracing::warn!(%warning, "field left unset");
        self.warnings.push(warning);
    }
}
