//! # tallyconv
//!
//! Converts Tally "Receipt" voucher exports (XML) into a flat report for
//! spreadsheet use. Every bill allocation of a voucher is classified into
//! a transaction role, the allocations are reconciled against the voucher
//! total, and the result is projected onto a fixed twelve-column layout:
//!
//! `Date, Transaction Type, Vch No., Ref No, Ref Type, Ref Date, Debtor,
//! Ref Amount, Amount, Particulars, Vch Type, Amount Verified`
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use tallyconv::{ConvertConfig, build_report, report::NOT_AVAILABLE};
//!
//! let xml = br#"<ENVELOPE><BODY><TALLYMESSAGE>
//!   <VOUCHER VCHTYPE="Receipt">
//!     <DATE>20230915</DATE>
//!     <VOUCHERTYPENAME>Receipt</VOUCHERTYPENAME>
//!     <VOUCHERNUMBER>1</VOUCHERNUMBER>
//!     <PARTYLEDGERNAME>Acme Traders</PARTYLEDGERNAME>
//!     <AMOUNT>-500.00</AMOUNT>
//!     <ALLLEDGERENTRIES.LIST>
//!       <LEDGERNAME>Acme Traders</LEDGERNAME>
//!       <BILLALLOCATIONS.LIST>
//!         <NAME>INV-1</NAME><BILLTYPE>New Ref</BILLTYPE><AMOUNT>500.00</AMOUNT>
//!       </BILLALLOCATIONS.LIST>
//!     </ALLLEDGERENTRIES.LIST>
//!   </VOUCHER>
//! </TALLYMESSAGE></BODY></ENVELOPE>"#;
//!
//! let report = build_report(xml, &ConvertConfig::default()).unwrap();
//! let rows = report.projected();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0][1], "Child");
//! assert_eq!(rows[1][1], "Parent");
//! assert_eq!(rows[1][11], "Yes");
//! assert_ne!(rows[1][8], NOT_AVAILABLE);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xlsx` (default) | `.xlsx` workbook sink and [`convert`] |
//! | `cli` | `tallyconv` command-line binary |
//! | `server` | HTTP upload endpoint |
//! | `all` | Everything |

pub mod core;
pub mod report;
pub mod sink;
pub mod tally;

mod convert;

#[cfg(feature = "server")]
pub mod server;

pub use crate::convert::{build_report, convert_with};
#[cfg(feature = "xlsx")]
pub use crate::convert::convert;

// Re-export core types at crate root for convenience
pub use crate::core::*;
