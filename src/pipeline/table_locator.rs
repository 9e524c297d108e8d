//! Table locator.
//!
//! Tracks, for one page, whether the reading-order cursor is inside a table.
//! Tables are reported by the layout source as bounding boxes; the locator
//! enters a table on the first vector shape (usually a border rule) that
//! lines up with the next table not yet entered, and leaves it once a vector
//! shape outside the table is followed by something that is not a vector
//! shape.

use crate::model::{BoundingBox, TableBlock, Warning};
use crate::source::LayoutSource;

/// Locator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableState {
    /// Looking for the next table
    Searching,
    /// Inside the `table`-th table of the page
    Inside {
        /// Index of the table among the page's tables
        table: usize,
        /// Vertical bounds `(bottom, top)` including tolerance
        bounds: (f64, f64),
    },
}

/// What a vector shape did to the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTransition {
    /// Nothing changed
    None,
    /// Entered the given table; its cells should be rendered now
    Entered(usize),
    /// Left the given table
    Exited(usize),
    /// Left one table and entered the next on the same shape
    ExitedAndEntered(usize, usize),
}

/// Per-page table state machine.
#[derive(Debug, Clone)]
pub struct TableLocator {
    page: u32,
    tables: Vec<BoundingBox>,
    tolerance: f64,
    state: TableState,
    next: usize,
}

impl TableLocator {
    /// Create a locator for a page with the given table boxes (top to bottom).
    pub fn new(page: u32, tables: Vec<BoundingBox>, tolerance: f64) -> Self {
        Self {
            page,
            tables,
            tolerance,
            state: TableState::Searching,
            next: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> TableState {
        self.state
    }

    /// Check if the cursor is inside a table.
    pub fn is_inside(&self) -> bool {
        matches!(self.state, TableState::Inside { .. })
    }

    /// Number of tables entered so far.
    pub fn entered(&self) -> usize {
        self.next
    }

    /// Number of tables reported for the page.
    pub fn expected(&self) -> usize {
        self.tables.len()
    }

    /// Feed a vector shape. `next_is_shape` tells whether the element after
    /// it in reading order is also a vector shape; pass `false` for the last
    /// element of the page.
    pub fn on_vector_shape(&mut self, shape: &BoundingBox, next_is_shape: bool) -> TableTransition {
        match self.state {
            TableState::Searching => match self.try_enter(shape) {
                Some(table) => TableTransition::Entered(table),
                None => TableTransition::None,
            },
            TableState::Inside { table, bounds } => {
                if shape.within_vertical(bounds.0, bounds.1) || next_is_shape {
                    return TableTransition::None;
                }

                log::debug!("Page {}: leaving table {}", self.page, table);
                self.state = TableState::Searching;
                match self.try_enter(shape) {
                    Some(entered) => TableTransition::ExitedAndEntered(table, entered),
                    None => TableTransition::Exited(table),
                }
            }
        }
    }

    /// Whether a text element at `bbox` falls inside the current table and
    /// must not be emitted as a line.
    pub fn suppresses(&self, bbox: &BoundingBox) -> bool {
        match self.state {
            TableState::Inside { bounds, .. } => bbox.within_vertical(bounds.0, bounds.1),
            TableState::Searching => false,
        }
    }

    /// Finish the page. Reports tables that were never entered.
    pub fn finish(self) -> Option<Warning> {
        if self.next < self.tables.len() {
            let warning = Warning::TableDetectionIncomplete {
                page: self.page,
                expected: self.tables.len(),
                detected: self.next,
            };
            log::warn!("{}", warning);
            Some(warning)
        } else {
            None
        }
    }

    fn try_enter(&mut self, shape: &BoundingBox) -> Option<usize> {
        let table = self.next;
        let bbox = self.tables.get(table)?;
        if !shape.overlaps_vertically(bbox, self.tolerance) {
            return None;
        }

        let bounds = (bbox.y0 - self.tolerance, bbox.y1 + self.tolerance);
        log::debug!(
            "Page {}: entering table {} (y {:.1}..{:.1})",
            self.page,
            table,
            bbox.y0,
            bbox.y1
        );
        self.state = TableState::Inside { table, bounds };
        self.next += 1;
        Some(table)
    }
}

/// Extract and render one table through the layout source.
pub fn render_table<S: LayoutSource + ?Sized>(
    source: &S,
    page: u32,
    table: usize,
) -> crate::Result<TableBlock> {
    let grid = source.extract_table(page, table)?;
    log::debug!("Page {}: table {} has {} rows", page, table, grid.row_count());
    Ok(TableBlock {
        page,
        table,
        text: grid.render(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_box() -> BoundingBox {
        BoundingBox::new(50.0, 300.0, 550.0, 500.0)
    }

    #[test]
    fn test_enters_on_matching_shape() {
        let mut locator = TableLocator::new(0, vec![table_box()], 1.0);

        // A rule far above the table does not match
        let rule = BoundingBox::new(50.0, 700.0, 550.0, 701.0);
        assert_eq!(locator.on_vector_shape(&rule, false), TableTransition::None);
        assert!(!locator.is_inside());

        let border = BoundingBox::new(50.0, 499.5, 550.0, 500.5);
        assert_eq!(locator.on_vector_shape(&border, true), TableTransition::Entered(0));
        assert_eq!(
            locator.state(),
            TableState::Inside {
                table: 0,
                bounds: (299.0, 501.0)
            }
        );
        assert_eq!(locator.entered(), 1);
    }

    #[test]
    fn test_exit_waits_for_end_of_shape_run() {
        let mut locator = TableLocator::new(0, vec![table_box()], 1.0);
        locator.on_vector_shape(&BoundingBox::new(50.0, 499.0, 550.0, 500.0), true);

        let below = BoundingBox::new(50.0, 100.0, 550.0, 101.0);
        // Followed by another shape: still inside
        assert_eq!(locator.on_vector_shape(&below, true), TableTransition::None);
        assert!(locator.is_inside());

        // Followed by text (or end of page): exit
        assert_eq!(locator.on_vector_shape(&below, false), TableTransition::Exited(0));
        assert!(!locator.is_inside());
    }

    #[test]
    fn test_shape_inside_bounds_keeps_state() {
        let mut locator = TableLocator::new(0, vec![table_box()], 1.0);
        locator.on_vector_shape(&BoundingBox::new(50.0, 499.0, 550.0, 500.0), false);
        let inner = BoundingBox::new(50.0, 400.0, 550.0, 401.0);
        assert_eq!(locator.on_vector_shape(&inner, false), TableTransition::None);
        assert!(locator.is_inside());
    }

    #[test]
    fn test_suppression_only_inside_bounds() {
        let mut locator = TableLocator::new(0, vec![table_box()], 1.0);
        let cell_text = BoundingBox::new(60.0, 420.0, 200.0, 432.0);
        assert!(!locator.suppresses(&cell_text));

        locator.on_vector_shape(&BoundingBox::new(50.0, 499.0, 550.0, 500.0), true);
        assert!(locator.suppresses(&cell_text));

        let caption = BoundingBox::new(60.0, 250.0, 200.0, 262.0);
        assert!(!locator.suppresses(&caption));
    }

    #[test]
    fn test_exit_can_enter_next_table() {
        let second = BoundingBox::new(50.0, 100.0, 550.0, 200.0);
        let mut locator = TableLocator::new(3, vec![table_box(), second], 1.0);
        locator.on_vector_shape(&BoundingBox::new(50.0, 499.0, 550.0, 500.0), true);

        let top_of_second = BoundingBox::new(50.0, 199.0, 550.0, 200.0);
        assert_eq!(
            locator.on_vector_shape(&top_of_second, false),
            TableTransition::ExitedAndEntered(0, 1)
        );
        assert!(locator.finish().is_none());
    }

    #[test]
    fn test_incomplete_detection_warning() {
        let second = BoundingBox::new(50.0, 100.0, 550.0, 200.0);
        let mut locator = TableLocator::new(4, vec![table_box(), second], 1.0);
        locator.on_vector_shape(&BoundingBox::new(50.0, 499.0, 550.0, 500.0), false);

        assert_eq!(
            locator.finish(),
            Some(Warning::TableDetectionIncomplete {
                page: 4,
                expected: 2,
                detected: 1
            })
        );
    }

    #[test]
    fn test_no_tables_never_enters() {
        let mut locator = TableLocator::new(0, vec![], 1.0);
        let shape = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(locator.on_vector_shape(&shape, false), TableTransition::None);
        assert!(locator.finish().is_none());
    }
}
