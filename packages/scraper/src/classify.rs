//! Row classifier.

use strum_macros::Display;

use crate::html_table::TableRow;

/// What a body row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RowKind {
    /// A repeat of the column header row (first cell `Channel`)
    HeaderRepeat,
    /// A totals row (first cell `Total`)
    TotalSummary,
    /// Anything else; handed to the record parser
    Data,
}

impl RowKind {
    /// Whether the row should be handed to the record parser.
    #[must_use]
    pub const fn is_data(self) -> bool {
        matches!(self, Self::Data)
    }
}

/// Classifies a row by its first cell.
#[must_use]
pub fn classify(row: &TableRow) -> RowKind {
    match row.first_cell() {
        Some("Channel") => RowKind::HeaderRepeat,
        Some("Total") => RowKind::TotalSummary,
        _ => RowKind::Data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().copied().collect()
    }

    #[test]
    fn header_and_total_rows_are_skipped() {
        assert_eq!(
            classify(&row(&[" Channel ", "Lock Status"])),
            RowKind::HeaderRepeat
        );
        assert_eq!(classify(&row(&["Total", "", "", "1200"])), RowKind::TotalSummary);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert_eq!(classify(&row(&["channel"])), RowKind::Data);
        assert_eq!(classify(&row(&["TOTAL"])), RowKind::Data);
        assert_eq!(classify(&row(&["Totals"])), RowKind::Data);
    }

    #[test]
    fn rows_without_cells_are_data() {
        let kind = classify(&TableRow::default());
        assert!(kind.is_data());
    }
}
