//! HTML table extraction.
//!
//! Parses the status page and flattens every `<table>` into a [`Table`] of
//! [`TableRow`]s holding raw `<td>` text. Everything downstream of this
//! module works on those grids through [`TableSource`] and never touches the
//! HTML parser directly.
//!
//! Modem firmware nests tables freely, so rows and cells are collected from
//! all descendants, the same way a tag search over the document would.

use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// One `<tr>`: the untrimmed text of each of its `<td>` cells in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<String>,
}

impl TableRow {
    /// Creates a row from raw cell texts.
    #[must_use]
    pub const fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Number of cells in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no `<td>` cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the text of the cell at `index` with surrounding whitespace
    /// removed.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|c| c.trim())
    }

    /// Returns the trimmed text of the first cell.
    #[must_use]
    pub fn first_cell(&self) -> Option<&str> {
        self.cell(0)
    }
}

impl<S: Into<String>> FromIterator<S> for TableRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// One `<table>`: its rows in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<TableRow>,
}

impl Table {
    /// Creates a table from its rows.
    #[must_use]
    pub const fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// The table's rows in document order.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

/// Anything that can enumerate tables in document order.
pub trait TableSource {
    /// Returns every table in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if the source cannot be walked.
    fn tables(&self) -> Result<Vec<Table>, ScrapeError>;
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document. Malformed markup is repaired by the
    /// parser rather than rejected.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

impl TableSource for HtmlDocument {
    fn tables(&self) -> Result<Vec<Table>, ScrapeError> {
        let table_sel = parse_selector("table")?;
        let row_sel = parse_selector("tr")?;
        let cell_sel = parse_selector("td")?;

        let tables = self
            .html
            .select(&table_sel)
            .map(|table| {
                Table::new(
                    table
                        .select(&row_sel)
                        .map(|row| row.select(&cell_sel).map(cell_text).collect())
                        .collect(),
                )
            })
            .collect();

        Ok(tables)
    }
}

/// Concatenates every text node under a cell.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}
