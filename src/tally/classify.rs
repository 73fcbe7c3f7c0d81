//! Bill allocation discovery and role classification.

use super::extract::{FieldReader, LEDGER_ENTRY_TAGS};
use super::tree::Element;
use crate::core::{BillAllocation, ConversionWarning, SharedFields, TransactionRole};

pub const BILL_ALLOCATION_TAG: &str = "BILLALLOCATIONS.LIST";

/// Direct children that make an allocation meaningful.
const DATA_TAGS: [&str; 3] = ["NAME", "BILLTYPE", "AMOUNT"];

/// Whether `element` is a bill allocation with at least one non-blank
/// `NAME`, `BILLTYPE` or `AMOUNT` child.
pub fn is_non_empty_allocation(element: &Element) -> bool {
    element.is(BILL_ALLOCATION_TAG)
        && element
            .children
            .iter()
            .any(|c| DATA_TAGS.iter().any(|t| c.is(t)) && c.value().is_some())
}

/// Collect and classify the non-empty bill allocations of a voucher, in
/// document order. Empty allocations are discarded.
pub fn classify_allocations(
    voucher: &Element,
    shared: &SharedFields,
    warnings: &mut Vec<ConversionWarning>,
) -> Vec<BillAllocation> {
    let mut found = Vec::new();
    collect(voucher, shared.ledger_name.as_deref(), &mut found);

    let mut fields = FieldReader {
        voucher: shared.voucher_number.as_deref(),
        warnings,
    };
    found
        .into_iter()
        .map(|(element, ledger_name)| read_allocation(element, ledger_name, &mut fields))
        .collect()
}

fn collect<'a>(
    element: &'a Element,
    ledger_name: Option<&'a str>,
    out: &mut Vec<(&'a Element, Option<&'a str>)>,
) {
    for child in &element.children {
        if child.is(BILL_ALLOCATION_TAG) {
            if is_non_empty_allocation(child) {
                out.push((child, ledger_name));
            }
            continue;
        }
        let ledger_name = if LEDGER_ENTRY_TAGS.iter().any(|t| child.is(t)) {
            child.child_value("LEDGERNAME").or(ledger_name)
        } else {
            ledger_name
        };
        collect(child, ledger_name, out);
    }
}

fn read_allocation(
    element: &Element,
    ledger_name: Option<&str>,
    fields: &mut FieldReader<'_>,
) -> BillAllocation {
    let bill_type = element.child_value("BILLTYPE").map(str::to_string);
    let role = TransactionRole::from_bill_type(bill_type.as_deref());
    if role == TransactionRole::Unclassified {
        let warning = ConversionWarning::UnclassifiedBillType {
            voucher: fields.voucher.map(str::to_string),
            bill_type: bill_type.clone(),
        };
        tracing::warn!(%warning, "bill allocation not classified");
        fields.warnings.push(warning);
    }
    BillAllocation {
        name: element.child_value("NAME").map(str::to_string),
        amount: element
            .child_value("AMOUNT")
            .and_then(|raw| fields.amount(raw)),
        ledger_name: ledger_name.map(str::to_string),
        bill_type,
        role,
    }
}
