//! Run diagnostics: soft warnings and category totals.

use serde::{Deserialize, Serialize};

use super::{Category, PageRecord, SequencedPage};

/// A recoverable problem recorded while processing continued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The table finder reported more tables than the locator could enter.
    TableDetectionIncomplete {
        /// Zero-based page index
        page: u32,
        /// Tables reported by the finder
        expected: usize,
        /// Tables entered and rendered
        detected: usize,
    },
    /// The table finder failed; the page was processed without tables.
    TableFinder {
        /// Zero-based page index
        page: u32,
        /// Collaborator message
        message: String,
    },
    /// Cell extraction failed for one table.
    TableExtraction {
        /// Zero-based page index
        page: u32,
        /// Table index on the page
        table: usize,
        /// Collaborator message
        message: String,
    },
    /// Rasterization or OCR failed for one figure.
    OcrFailure {
        /// Zero-based page index
        page: u32,
        /// Figure index in reading order
        figure: usize,
        /// Collaborator message
        message: String,
    },
}

impl Warning {
    /// Page the warning refers to.
    pub fn page(&self) -> u32 {
        match self {
            Warning::TableDetectionIncomplete { page, .. }
            | Warning::TableFinder { page, .. }
            | Warning::TableExtraction { page, .. }
            | Warning::OcrFailure { page, .. } => *page,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::TableDetectionIncomplete {
                page,
                expected,
                detected,
            } => write!(
                f,
                "page {}: {} of {} tables detected",
                page, detected, expected
            ),
            Warning::TableFinder { page, message } => {
                write!(f, "page {}: table finder failed: {}", page, message)
            }
            Warning::TableExtraction {
                page,
                table,
                message,
            } => write!(f, "page {}: table {} not extracted: {}", page, table, message),
            Warning::OcrFailure {
                page,
                figure,
                message,
            } => write!(f, "page {}: figure {} not recognized: {}", page, figure, message),
        }
    }
}

/// Run-scoped totals of classified lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Lines classified as headings
    pub heading: u32,
    /// Lines classified as subheadings
    pub subheading: u32,
    /// Lines classified as content
    pub content: u32,
}

impl CategoryCounts {
    /// Record one classified line.
    pub fn record(&mut self, category: Category) {
        match category {
            Category::Heading => self.heading += 1,
            Category::Subheading => self.subheading += 1,
            Category::Content => self.content += 1,
        }
    }

    /// Total lines recorded.
    pub fn total(&self) -> u32 {
        self.heading + self.subheading + self.content
    }
}

/// Everything a structuring run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureReport {
    /// One record per processed page
    pub records: Vec<PageRecord>,
    /// Sequencer output per page, in reading order
    pub pages: Vec<SequencedPage>,
    /// Soft errors recorded during the run
    pub warnings: Vec<Warning>,
    /// Classified line totals
    pub counts: CategoryCounts,
}

impl StructureReport {
    /// Check if any soft error was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
