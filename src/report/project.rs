//! Projection of typed rows onto the fixed string columns.

use crate::core::format::{format_date, format_decimal};
use crate::core::{Cell, Column, OutputRow};

/// Placeholder for a value that is present but empty or zero.
pub const NOT_AVAILABLE: &str = "NA";

/// One row as written to the sheet: twelve cells in [`Column::ALL`] order.
pub type ProjectedRow = [String; 12];

/// Render one cell.
///
/// Three outcomes: an absent value becomes `""`; a present but falsy
/// value (empty text, zero amount) becomes `"NA"`; anything else is
/// rendered unchanged.
pub fn values_in_cells(cell: &Cell) -> String {
    match cell {
        Cell::Absent => String::new(),
        Cell::Text(t) if t.is_empty() => NOT_AVAILABLE.into(),
        Cell::Text(t) => t.clone(),
        Cell::Amount(a) if a.is_zero() => NOT_AVAILABLE.into(),
        Cell::Amount(a) => format_decimal(*a),
        Cell::Date(d) => format_date(*d),
    }
}

pub fn project_row(row: &OutputRow) -> ProjectedRow {
    Column::ALL.map(|column| values_in_cells(row.cell(column)))
}

pub fn project_rows(rows: &[OutputRow]) -> Vec<ProjectedRow> {
    rows.iter().map(project_row).collect()
}
