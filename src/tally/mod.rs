//! Tally XML input: decoding, parsing and per-voucher extraction.
//!
//! A Tally export wraps every exported object in a `TALLYMESSAGE`
//! container. Receipt vouchers look like this (trimmed):
//!
//! ```xml
//! <TALLYMESSAGE>
//!   <VOUCHER VCHTYPE="Receipt">
//!     <DATE>20230915</DATE>
//!     <VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>
//!     <VOUCHERNUMBER>1</VOUCHERNUMBER>
//!     <PARTYLEDGERNAME>Acme Traders</PARTYLEDGERNAME>
//!     <ALLLEDGERENTRIES.LIST>
//!       <LEDGERNAME>Acme Traders</LEDGERNAME>
//!       <AMOUNT>500.00</AMOUNT>
//!       <BILLALLOCATIONS.LIST>
//!         <NAME>INV-1</NAME>
//!         <BILLTYPE>New Ref</BILLTYPE>
//!         <AMOUNT>500.00</AMOUNT>
//!       </BILLALLOCATIONS.LIST>
//!     </ALLLEDGERENTRIES.LIST>
//!     <ALLLEDGERENTRIES.LIST>
//!       <LEDGERNAME>HDFC Bank</LEDGERNAME>
//!       <AMOUNT>-500.00</AMOUNT>
//!     </ALLLEDGERENTRIES.LIST>
//!   </VOUCHER>
//! </TALLYMESSAGE>
//! ```

mod classify;
mod decode;
mod extract;
mod tree;

pub use classify::{BILL_ALLOCATION_TAG, classify_allocations, is_non_empty_allocation};
pub use decode::decode_document;
pub use extract::{LEDGER_ENTRY_TAGS, extract_shared};
pub use tree::{Element, MAX_DEPTH, RECEIPT, VoucherGroup, parse_document, voucher_groups};

use crate::core::{BillAllocation, ConversionWarning, SharedFields};

/// Everything read from one voucher group. Owned exclusively by the
/// processing of that group.
#[derive(Debug, Clone, Default)]
pub struct GroupContext {
    pub shared: SharedFields,
    pub allocations: Vec<BillAllocation>,
    pub warnings: Vec<ConversionWarning>,
}

/// Run both extraction passes over one voucher group.
pub fn read_group(group: VoucherGroup<'_>) -> GroupContext {
    let mut warnings = Vec::new();
    let shared = extract_shared(group.voucher, &mut warnings);
    let allocations = classify_allocations(group.voucher, &shared, &mut warnings);
    GroupContext {
        shared,
        allocations,
        warnings,
    }
}
