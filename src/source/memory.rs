//! A fully materialized layout, usually deserialized from a layout dump.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, PageLayout, TableGrid};

use super::LayoutSource;

/// A table known to a [`MemoryPage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTable {
    /// Table bounding box in page space
    pub bbox: BoundingBox,
    /// Extracted cells
    pub cells: TableGrid,
}

/// One page of an [`InMemoryLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    /// Page elements
    #[serde(flatten)]
    pub layout: PageLayout,
    /// Tables on the page, top to bottom
    #[serde(default)]
    pub tables: Vec<MemoryTable>,
}

/// A [`LayoutSource`] backed by pages held in memory.
///
/// # Example
///
/// ```
/// use pagestruct::model::{BoundingBox, LayoutElement, PageLayout, TextRun};
/// use pagestruct::source::{InMemoryLayout, LayoutSource};
///
/// let page = PageLayout::letter(0).with(LayoutElement::TextRun(TextRun::uniform(
///     BoundingBox::new(72.0, 700.0, 300.0, 718.0),
///     "SECTION 1",
///     "Times-Bold",
///     18.0,
/// )));
/// let layout = InMemoryLayout::new().with_page(page);
/// assert_eq!(layout.page_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryLayout {
    /// Pages in order
    pub pages: Vec<MemoryPage>,
}

impl InMemoryLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layout dump from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::LayoutRead {
            page: 0,
            message: format!("invalid layout dump: {}", e),
        })
    }

    /// Parse a layout dump from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json(&json)
    }

    /// Append a page without tables.
    pub fn with_page(mut self, layout: PageLayout) -> Self {
        self.pages.push(MemoryPage {
            layout,
            tables: Vec::new(),
        });
        self
    }

    /// Append a page together with its tables.
    pub fn with_page_and_tables(mut self, layout: PageLayout, tables: Vec<MemoryTable>) -> Self {
        self.pages.push(MemoryPage { layout, tables });
        self
    }

    fn memory_page(&self, index: u32) -> Result<&MemoryPage> {
        self.pages
            .get(index as usize)
            .ok_or_else(|| Error::LayoutRead {
                page: index,
                message: format!("page out of range (document has {} pages)", self.pages.len()),
            })
    }
}

impl LayoutSource for InMemoryLayout {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, index: u32) -> Result<PageLayout> {
        let mut layout = self.memory_page(index)?.layout.clone();
        layout.index = index;
        Ok(layout)
    }

    fn find_tables(&self, index: u32) -> Result<Vec<BoundingBox>> {
        Ok(self
            .memory_page(index)?
            .tables
            .iter()
            .map(|t| t.bbox)
            .collect())
    }

    fn extract_table(&self, index: u32, table: usize) -> Result<TableGrid> {
        self.memory_page(index)?
            .tables
            .get(table)
            .map(|t| t.cells.clone())
            .ok_or_else(|| Error::TableExtract(format!("no table {} on page {}", table, index)))
    }
}
