//! Report assembly: row synthesis, reconciliation and column projection.

mod project;
mod reconcile;
mod synth;

pub use project::{NOT_AVAILABLE, ProjectedRow, project_row, project_rows, values_in_cells};
pub use reconcile::{Reconciliation, child_total, reconcile};
pub use synth::synthesize;

use crate::core::{Column, ConversionWarning, OutputRow};

/// All rows of one document, before any sink is invoked.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Rows in document order.
    pub rows: Vec<OutputRow>,
    /// Recoverable problems found while reading the voucher groups.
    pub warnings: Vec<ConversionWarning>,
    /// Number of receipt voucher groups processed.
    pub groups: usize,
}

impl Report {
    pub fn headers(&self) -> [&'static str; 12] {
        Column::headers()
    }

    /// Rows rendered to their final cell strings.
    pub fn projected(&self) -> Vec<ProjectedRow> {
        project_rows(&self.rows)
    }
}
