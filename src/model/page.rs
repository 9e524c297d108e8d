//! Page-level sequencing output.

use serde::{Deserialize, Serialize};

/// Classification of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Top-level heading
    Heading,
    /// Subheading
    Subheading,
    /// Body content
    Content,
}

impl Category {
    /// Lowercase label used in logs and text output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Heading => "heading",
            Category::Subheading => "subheading",
            Category::Content => "content",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text run after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// Assigned category
    pub category: Category,
    /// Line text
    pub text: String,
}

/// A rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Zero-based page index
    pub page: u32,
    /// Index of the table among the tables reported for the page
    pub table: usize,
    /// Pipe-delimited rendering of the cells
    pub text: String,
}

/// Text recovered from a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Zero-based page index
    pub page: u32,
    /// Index of the figure in reading order on the page
    pub figure: usize,
    /// Recognized text (empty when OCR failed or is disabled)
    pub text: String,
}

/// One output of the page sequencer, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    /// A classified text line
    Line(ClassifiedLine),
    /// A table
    Table(TableBlock),
    /// Figure text
    Image(ImageBlock),
}

impl PageItem {
    /// Text carried by the item.
    pub fn text(&self) -> &str {
        match self {
            PageItem::Line(line) => &line.text,
            PageItem::Table(table) => &table.text,
            PageItem::Image(image) => &image.text,
        }
    }
}

/// Everything the sequencer produced for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequencedPage {
    /// Zero-based page index
    pub index: u32,
    /// Items in reading order
    pub items: Vec<PageItem>,
}

impl SequencedPage {
    /// Create an empty sequenced page.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            items: Vec::new(),
        }
    }

    /// Lines of the given category, in reading order.
    pub fn lines(&self, category: Category) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(move |item| match item {
            PageItem::Line(line) if line.category == category => Some(line.text.as_str()),
            _ => None,
        })
    }

    /// Tables in reading order.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Figure texts in reading order.
    pub fn images(&self) -> impl Iterator<Item = &ImageBlock> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Check if the sequencer produced nothing for this page.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
