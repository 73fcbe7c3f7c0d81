//! Balancing of a voucher total against its bill allocations.

use rust_decimal::Decimal;

use crate::core::{BillAllocation, TransactionRole};

/// Outcome of reconciling one voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Sum of child (and unclassified) allocation amounts, or `None` when
    /// the sum leaves the `Decimal` range.
    pub child_total: Option<Decimal>,
    /// `child_total + voucher total`; zero when balanced. `None` on
    /// overflow.
    pub difference: Option<Decimal>,
    pub balanced: bool,
}

impl Reconciliation {
    /// Text for the "Amount Verified" column.
    pub fn verdict(&self) -> &'static str {
        if self.balanced { "Yes" } else { "No" }
    }

    /// Whether the arithmetic left the `Decimal` range.
    pub fn overflowed(&self) -> bool {
        self.difference.is_none()
    }
}

/// Sum the allocation amounts that count towards the child total.
///
/// Unclassified allocations count even though they may produce no row;
/// bank and GST allocations never count. Returns `None` on overflow.
pub fn child_total(allocations: &[BillAllocation]) -> Option<Decimal> {
    allocations
        .iter()
        .filter(|a| matches!(a.role, TransactionRole::Child | TransactionRole::Unclassified))
        .filter_map(|a| a.amount)
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Reconcile allocations against the declared voucher total.
///
/// The total is signed opposite to its allocations, so a balanced voucher
/// sums to zero. A missing total counts as zero. A sum outside the
/// `Decimal` range is never balanced.
pub fn reconcile(
    allocations: &[BillAllocation],
    voucher_total: Option<Decimal>,
    tolerance: Decimal,
) -> Reconciliation {
    let child_total = child_total(allocations);
    let difference =
        child_total.and_then(|sum| sum.checked_add(voucher_total.unwrap_or(Decimal::ZERO)));
    Reconciliation {
        child_total,
        difference,
        balanced: difference.is_some_and(|d| d.abs() <= tolerance.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn alloc(role: TransactionRole, amount: Option<Decimal>) -> BillAllocation {
        BillAllocation {
            name: None,
            bill_type: None,
            amount,
            ledger_name: None,
            role,
        }
    }

    #[test]
    fn balanced_voucher() {
        let allocs = [alloc(TransactionRole::Child, Some(dec!(500)))];
        let r = reconcile(&allocs, Some(dec!(-500)), Decimal::ZERO);
        assert!(r.balanced);
        assert_eq!(r.verdict(), "Yes");
        assert_eq!(r.child_total, Some(dec!(500)));
    }

    #[test]
    fn other_allocations_do_not_count() {
        let allocs = [alloc(TransactionRole::Other, Some(dec!(200)))];
        let r = reconcile(&allocs, Some(dec!(-150)), Decimal::ZERO);
        assert_eq!(r.child_total, Some(Decimal::ZERO));
        assert_eq!(r.difference, Some(dec!(-150)));
        assert_eq!(r.verdict(), "No");
    }

    #[test]
    fn unclassified_allocations_count() {
        let allocs = [
            alloc(TransactionRole::Child, Some(dec!(100))),
            alloc(TransactionRole::Unclassified, Some(dec!(50))),
            alloc(TransactionRole::Child, None),
        ];
        assert_eq!(child_total(&allocs), Some(dec!(150)));
    }

    #[test]
    fn decimal_sums_are_exact() {
        let allocs = [
            alloc(TransactionRole::Child, Some(dec!(0.1))),
            alloc(TransactionRole::Child, Some(dec!(0.2))),
        ];
        assert!(reconcile(&allocs, Some(dec!(-0.3)), Decimal::ZERO).balanced);
    }

    #[test]
    fn tolerance_band() {
        let allocs = [alloc(TransactionRole::Child, Some(dec!(100.004)))];
        assert!(!reconcile(&allocs, Some(dec!(-100)), Decimal::ZERO).balanced);
        assert!(reconcile(&allocs, Some(dec!(-100)), dec!(0.01)).balanced);
    }

    #[test]
    fn missing_total_counts_as_zero() {
        assert!(reconcile(&[], None, Decimal::ZERO).balanced);
        let allocs = [alloc(TransactionRole::Child, Some(dec!(1)))];
        assert!(!reconcile(&allocs, None, Decimal::ZERO).balanced);
    }

    #[test]
    fn overflowing_child_total_is_not_balanced() {
        let allocs = [
            alloc(TransactionRole::Child, Some(Decimal::MAX)),
            alloc(TransactionRole::Child, Some(Decimal::MAX)),
        ];
        assert_eq!(child_total(&allocs), None);
        let r = reconcile(&allocs, Some(Decimal::MIN), Decimal::ZERO);
        assert!(r.overflowed());
        assert_eq!(r.verdict(), "No");
    }

    #[test]
    fn overflowing_difference_is_not_balanced() {
        let allocs = [alloc(TransactionRole::Child, Some(Decimal::MAX))];
        let r = reconcile(&allocs, Some(Decimal::MAX), Decimal::MAX);
        assert_eq!(r.child_total, Some(Decimal::MAX));
        assert_eq!(r.difference, None);
        assert!(!r.balanced);
    }
}
