//! Table locator.
//!
//! The status page gives its tables no ids or classes, so a section's table
//! is identified by the first row whose first cell reads exactly like the
//! section caption.

use moto_exporter_channel_models::ChannelSection;

use crate::ScrapeError;
use crate::html_table::{Table, TableRow};

/// A table matched by its caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedTable<'a> {
    /// The matching table.
    pub table: &'a Table,
    /// Index of the row carrying the caption.
    pub caption_row: usize,
}

impl<'a> LocatedTable<'a> {
    /// Returns the rows left to classify, paired with their index in the
    /// table.
    ///
    /// Skips the caption row and the column header row right after it.
    pub fn body_rows(&self) -> impl Iterator<Item = (usize, &'a TableRow)> + use<'a> {
        self.table
            .rows()
            .iter()
            .enumerate()
            .skip(self.caption_row + 2)
    }
}

/// Returns the first table, in document order, with a row whose first cell
/// trims to exactly `caption`.
#[must_use]
pub fn locate<'a>(tables: &'a [Table], caption: &str) -> Option<LocatedTable<'a>> {
    tables.iter().find_map(|table| {
        table
            .rows()
            .iter()
            .position(|row| row.first_cell() == Some(caption))
            .map(|caption_row| LocatedTable { table, caption_row })
    })
}

/// Locates the table for `section`.
///
/// # Errors
///
/// Returns [`ScrapeError::SectionNotFound`] if no table carries the
/// section's caption.
pub fn locate_section(
    tables: &[Table],
    section: ChannelSection,
) -> Result<LocatedTable<'_>, ScrapeError> {
    locate(tables, section.caption()).ok_or(ScrapeError::SectionNotFound(section))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            rows.iter()
                .map(|cells| cells.iter().copied().collect())
                .collect(),
        )
    }

    #[test]
    fn finds_table_by_caption_in_any_row() {
        let tables = vec![
            table(&[&["Startup Procedure"], &["Acquire", "Locked"]]),
            table(&[
                &["Connection"],
                &["  Downstream Bonded Channels  "],
                &["Channel", "Lock Status"],
                &["1", "Locked"],
            ]),
        ];

        let located = locate(&tables, "Downstream Bonded Channels").unwrap();
        assert!(std::ptr::eq(located.table, &tables[1]));
        assert_eq!(located.caption_row, 1);
    }

    #[test]
    fn first_matching_table_wins() {
        let tables = vec![
            table(&[&["Upstream Bonded Channels"], &["a"]]),
            table(&[&["Upstream Bonded Channels"], &["b"]]),
        ];

        let located = locate(&tables, "Upstream Bonded Channels").unwrap();
        assert!(std::ptr::eq(located.table, &tables[0]));
    }

    #[test]
    fn caption_match_is_exact_and_case_sensitive() {
        let tables = vec![table(&[
            &["downstream bonded channels"],
            &["Downstream Bonded Channels (OFDM)"],
            &["Downstream", "Bonded Channels"],
        ])];

        assert!(locate(&tables, "Downstream Bonded Channels").is_none());
    }

    #[test]
    fn missing_section_is_reported() {
        let tables = vec![table(&[&["Downstream Bonded Channels"]])];

        let err = locate_section(&tables, ChannelSection::Upstream).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::SectionNotFound(ChannelSection::Upstream)
        ));
    }

    #[test]
    fn body_rows_skip_caption_and_header() {
        let tables = vec![table(&[
            &["Upstream Bonded Channels"],
            &["Channel", "Lock Status"],
            &["1", "Locked"],
            &["2", "Locked"],
        ])];

        let located = locate_section(&tables, ChannelSection::Upstream).unwrap();
        let indices: Vec<usize> = located.body_rows().map(|(i, _)| i).collect();
        assert_eq!(indices, [2, 3]);
    }

    #[test]
    fn body_rows_are_empty_when_header_is_last() {
        let tables = vec![table(&[&["Upstream Bonded Channels"], &["Channel"]])];

        let located = locate_section(&tables, ChannelSection::Upstream).unwrap();
        assert_eq!(located.body_rows().count(), 0);
    }
}
