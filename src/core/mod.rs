//! Core report types, errors and configuration.
//!
//! Everything here is independent of the XML input format and of the
//! tabular output format.

mod config;
mod error;
pub mod format;
mod types;

pub use config::*;
pub use error::*;
pub use types::*;
