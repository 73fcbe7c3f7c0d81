use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Role of a row within a voucher group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionRole {
    /// Synthesized voucher-level summary row.
    Parent,
    /// Bill allocation against a reference ("New Ref", "Agst Ref").
    Child,
    /// Bank or GST allocation.
    Other,
    /// Bill allocation whose type matches none of the known roles.
    Unclassified,
}

impl TransactionRole {
    /// Classify a bill type. Matching is case-insensitive and ignores
    /// surrounding whitespace; a missing type is unclassified.
    pub fn from_bill_type(bill_type: Option<&str>) -> Self {
        let Some(bt) = bill_type else {
            return Self::Unclassified;
        };
        match bt.trim().to_lowercase().as_str() {
            "agst ref" | "new ref" => Self::Child,
            "bank" | "gst" => Self::Other,
            _ => Self::Unclassified,
        }
    }

    /// Label written to the "Transaction Type" column, if any.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Parent => Some("Parent"),
            Self::Child => Some("Child"),
            Self::Other => Some("Other"),
            Self::Unclassified => None,
        }
    }
}

/// Voucher-level fields shared by every row of one voucher group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedFields {
    /// Voucher date (`DATE`).
    pub date: Option<NaiveDate>,
    /// `VOUCHERNUMBER`.
    pub voucher_number: Option<String>,
    /// `VOUCHERTYPENAME`.
    pub voucher_type: Option<String>,
    /// Voucher-level party (`PARTYLEDGERNAME`).
    pub party_ledger_name: Option<String>,
    /// Voucher-level `LEDGERNAME`, the fallback allocation debtor.
    pub ledger_name: Option<String>,
    /// `REFERENCEDATE`, when the voucher carries one.
    pub reference_date: Option<NaiveDate>,
    /// Declared voucher total, signed opposite to its allocations.
    pub total_amount: Option<Decimal>,
}

/// One non-empty `BILLALLOCATIONS.LIST` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillAllocation {
    /// Reference number (`NAME`).
    pub name: Option<String>,
    /// Reference type (`BILLTYPE`), e.g. "New Ref".
    pub bill_type: Option<String>,
    pub amount: Option<Decimal>,
    /// Ledger name of the entry holding this allocation.
    pub ledger_name: Option<String>,
    pub role: TransactionRole,
}

/// Typed value of one output cell before projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    /// Not applicable to this row.
    #[default]
    Absent,
    Text(String),
    Amount(Decimal),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Text(v.to_string()))
    }

    pub fn amount(value: Option<Decimal>) -> Self {
        value.map_or(Self::Absent, Self::Amount)
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Absent, Self::Date)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// The fixed output columns, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    TransactionType,
    VoucherNumber,
    RefNo,
    RefType,
    RefDate,
    Debtor,
    RefAmount,
    Amount,
    Particulars,
    VoucherType,
    AmountVerified,
}

impl Column {
    /// Every column in output order.
    pub const ALL: [Column; 12] = [
        Column::Date,
        Column::TransactionType,
        Column::VoucherNumber,
        Column::RefNo,
        Column::RefType,
        Column::RefDate,
        Column::Debtor,
        Column::RefAmount,
        Column::Amount,
        Column::Particulars,
        Column::VoucherType,
        Column::AmountVerified,
    ];

    /// Header label as written to the sheet.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::TransactionType => "Transaction Type",
            Column::VoucherNumber => "Vch No.",
            Column::RefNo => "Ref No",
            Column::RefType => "Ref Type",
            Column::RefDate => "Ref Date",
            Column::Debtor => "Debtor",
            Column::RefAmount => "Ref Amount",
            Column::Amount => "Amount",
            Column::Particulars => "Particulars",
            Column::VoucherType => "Vch Type",
            Column::AmountVerified => "Amount Verified",
        }
    }

    /// All header labels in output order.
    pub fn headers() -> [&'static str; 12] {
        Self::ALL.map(|c| c.header())
    }
}

/// One synthesized report row. Immutable once emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub role: Option<TransactionRole>,
    pub date: Cell,
    pub transaction_type: Cell,
    pub voucher_number: Cell,
    pub ref_no: Cell,
    pub ref_type: Cell,
    pub ref_date: Cell,
    pub debtor: Cell,
    pub ref_amount: Cell,
    pub amount: Cell,
    pub particulars: Cell,
    pub voucher_type: Cell,
    pub amount_verified: Cell,
}

impl OutputRow {
    pub fn cell(&self, column: Column) -> &Cell {
        match column {
            Column::Date => &self.date,
            Column::TransactionType => &self.transaction_type,
            Column::VoucherNumber => &self.voucher_number,
            Column::RefNo => &self.ref_no,
            Column::RefType => &self.ref_type,
            Column::RefDate => &self.ref_date,
            Column::Debtor => &self.debtor,
            Column::RefAmount => &self.ref_amount,
            Column::Amount => &self.amount,
            Column::Particulars => &self.particulars,
            Column::VoucherType => &self.voucher_type,
            Column::AmountVerified => &self.amount_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_bill_type() {
        assert_eq!(TransactionRole::from_bill_type(Some("New Ref")), TransactionRole::Child);
        assert_eq!(TransactionRole::from_bill_type(Some("AGST REF")), TransactionRole::Child);
        assert_eq!(TransactionRole::from_bill_type(Some(" bank ")), TransactionRole::Other);
        assert_eq!(TransactionRole::from_bill_type(Some("Gst")), TransactionRole::Other);
        assert_eq!(
            TransactionRole::from_bill_type(Some("On Account")),
            TransactionRole::Unclassified
        );
        assert_eq!(TransactionRole::from_bill_type(None), TransactionRole::Unclassified);
    }

    #[test]
    fn headers_in_order() {
        assert_eq!(
            Column::headers(),
            [
                "Date",
                "Transaction Type",
                "Vch No.",
                "Ref No",
                "Ref Type",
                "Ref Date",
                "Debtor",
                "Ref Amount",
                "Amount",
                "Particulars",
                "Vch Type",
                "Amount Verified",
            ]
        );
    }
}
