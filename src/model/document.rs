//! Document identity and the persisted page record.

use serde::{Deserialize, Serialize};

/// Identity fields attached to every record of a document.
///
/// These are supplied by the caller; the pipeline never derives them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document identifier
    pub id: String,
    /// Document title
    pub title: String,
    /// Document URL or path
    pub url: String,
}

impl DocumentInfo {
    /// Create document identity fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traceability {
    /// Source label (organization or collection)
    pub source: String,
    /// Manual or publication reference
    pub manual_reference: String,
    /// Page locator within the document (e.g., "Page_2" for the third page)
    pub exact_location: String,
}

/// The structured record for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Document identifier
    pub document_id: String,
    /// Document title
    pub document_title: String,
    /// Document URL
    pub document_url: String,
    /// Page index (0-indexed)
    pub page_number: u32,
    /// Heading lines, newline-joined in reading order
    pub header: String,
    /// Subheading lines, newline-joined in reading order
    pub subheader: String,
    /// Body lines, newline-joined in reading order
    pub content: String,
    /// Rendered tables, newline-joined in reading order
    pub table_text: String,
    /// Figure texts, newline-joined in reading order
    pub image_text: String,
    /// Embedding placeholder, filled by an external collaborator
    pub vector: Option<Vec<f32>>,
    /// Provenance block
    pub traceability: Traceability,
}

impl PageRecord {
    /// All textual fields joined in record order, skipping empty ones.
    ///
    /// This is the text an embedding collaborator would embed into `vector`.
    pub fn combined_text(&self) -> String {
        [
            &self.header,
            &self.subheader,
            &self.content,
            &self.table_text,
            &self.image_text,
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("\n")
    }

    /// Check if the page produced no text at all.
    pub fn is_blank(&self) -> bool {
        self.combined_text().is_empty()
    }
}
