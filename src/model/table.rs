//! Table cell grids.

use serde::{Deserialize, Serialize};

/// Cell grid returned by a layout source's table extraction.
///
/// Cells the extractor could not fill (merged or empty regions) are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Rows of optional cell strings
    pub rows: Vec<Vec<Option<String>>>,
}

impl TableGrid {
    /// Create a grid from rows.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Create a grid where every cell is present.
    pub fn from_strings<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the grid as pipe-delimited text.
    ///
    /// Each row becomes `|a|b|c|`; wrapped cell text is joined onto one line
    /// and missing cells are written as `None`. Rows are separated by `\n`
    /// with no trailing newline.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| match cell {
                        Some(text) => text.replace('\n', " "),
                        None => "None".to_string(),
                    })
                    .collect();
                format!("|{}|", cells.join("|"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
