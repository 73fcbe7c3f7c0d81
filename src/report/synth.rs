//! Row synthesis for one voucher group.

use chrono::NaiveDate;

use super::reconcile::reconcile;
use crate::core::{
    BillAllocation, Cell, ConversionWarning, ConvertConfig, OutputRow, RefDateSource, SharedFields, TransactionRole,
    UnclassifiedPolicy,
};
use crate::tally::GroupContext;

/// Build the rows of one voucher group.
///
/// Allocation rows come first in document order, followed by the parent
/// summary when the voucher has both a number and a type. A group without
/// any non-empty allocation yields exactly one row built from the shared
/// fields alone. A reconciliation that overflows adds a warning to the
/// group.
pub fn synthesize(ctx: &mut GroupContext, config: &ConvertConfig) -> Vec<OutputRow> {
    let GroupContext {
        shared,
        allocations,
        warnings,
    } = ctx;
    let shared = &*shared;
    if allocations.is_empty() {
        return vec![shared_only_row(shared)];
    }

    let ref_date = match config.ref_date {
        RefDateSource::VoucherDate => shared.date,
        RefDateSource::ReferenceDate => shared.reference_date.or(shared.date),
    };

    let mut rows: Vec<OutputRow> = allocations
        .iter()
        .filter_map(|a| allocation_row(shared, a, ref_date, config.unclassified))
        .collect();

    if shared.voucher_number.is_some() && shared.voucher_type.is_some() {
        rows.push(parent_row(shared, allocations, config, warnings));
    }
    rows
}

fn base_row(shared: &SharedFields) -> OutputRow {
    OutputRow {
        date: Cell::date(shared.date),
        voucher_number: Cell::text(shared.voucher_number.as_deref()),
        voucher_type: Cell::text(shared.voucher_type.as_deref()),
        ..Default::default()
    }
}

fn shared_only_row(shared: &SharedFields) -> OutputRow {
    let party = Cell::text(shared.party_ledger_name.as_deref());
    OutputRow {
        debtor: party.clone(),
        particulars: party,
        ..base_row(shared)
    }
}

fn allocation_row(
    shared: &SharedFields,
    allocation: &BillAllocation,
    ref_date: Option<NaiveDate>,
    policy: UnclassifiedPolicy,
) -> Option<OutputRow> {
    let ledger = Cell::text(allocation.ledger_name.as_deref());
    let row = OutputRow {
        role: Some(allocation.role),
        transaction_type: Cell::text(allocation.role.label()),
        debtor: ledger.clone(),
        particulars: ledger,
        ..base_row(shared)
    };
    match allocation.role {
        TransactionRole::Child => Some(with_reference(row, allocation, ref_date)),
        TransactionRole::Other => Some(OutputRow {
            amount: Cell::amount(allocation.amount),
            ..row
        }),
        TransactionRole::Unclassified => match policy {
            UnclassifiedPolicy::Exclude => None,
            UnclassifiedPolicy::BlankRole => Some(with_reference(row, allocation, ref_date)),
        },
        // Allocations are never classified as parent.
        TransactionRole::Parent => None,
    }
}

fn with_reference(
    row: OutputRow,
    allocation: &BillAllocation,
    ref_date: Option<NaiveDate>,
) -> OutputRow {
    OutputRow {
        ref_no: Cell::text(allocation.name.as_deref()),
        ref_type: Cell::text(allocation.bill_type.as_deref()),
        ref_date: Cell::date(ref_date),
        ref_amount: Cell::amount(allocation.amount),
        ..row
    }
}

fn parent_row(
    shared: &SharedFields,
    allocations: &[BillAllocation],
    config: &ConvertConfig,
    warnings: &mut Vec<ConversionWarning>,
) -> OutputRow {
    let reconciliation = reconcile(allocations, shared.total_amount, config.tolerance);
    tracing::debug!(
        voucher = shared.voucher_number.as_deref().unwrap_or(""),
        child_total = ?reconciliation.child_total,
        difference = ?reconciliation.difference,
        "reconciled voucher"
    );
    if reconciliation.overflowed() {
        let warning = ConversionWarning::AmountOverflow {
            voucher: shared.voucher_number.clone(),
        };
        tracing::warn!(%warning, "voucher left unverified");
        warnings.push(warning);
    }
    let party = Cell::text(shared.party_ledger_name.as_deref());
    OutputRow {
        role: Some(TransactionRole::Parent),
        transaction_type: Cell::text(TransactionRole::Parent.label()),
        amount: Cell::amount(reconciliation.child_total),
        debtor: party.clone(),
        particulars: party,
        amount_verified: Cell::Text(reconciliation.verdict().into()),
        ..base_row(shared)
    }
}
