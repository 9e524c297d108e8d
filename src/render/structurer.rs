//! Mapping from sequenced pages to persisted page records.

use crate::model::{Category, DocumentInfo, PageRecord, SequencedPage, Traceability};
use crate::pipeline::StructureOptions;

/// Builds [`PageRecord`]s from sequenced pages.
///
/// This is a pure mapping: every field is a newline join of the page's items
/// of one kind, in reading order.
#[derive(Debug, Clone, Default)]
pub struct PageRecordStructurer {
    document: DocumentInfo,
    source_label: String,
    manual_reference: String,
}

impl PageRecordStructurer {
    /// Create a structurer using the identity and traceability fields of
    /// `options`.
    pub fn new(options: &StructureOptions) -> Self {
        Self {
            document: options.document.clone(),
            source_label: options.source_label.clone(),
            manual_reference: options.manual_reference.clone(),
        }
    }

    /// Map one sequenced page to its record.
    pub fn structure(&self, page: &SequencedPage) -> PageRecord {
        PageRecord {
            document_id: self.document.id.clone(),
            document_title: self.document.title.clone(),
            document_url: self.document.url.clone(),
            page_number: page.index,
            header: join(page.lines(Category::Heading)),
            subheader: join(page.lines(Category::Subheading)),
            content: join(page.lines(Category::Content)),
            table_text: join(page.tables().map(|t| t.text.as_str())),
            image_text: join(page.images().map(|i| i.text.as_str())),
            vector: None,
            traceability: Traceability {
                source: self.source_label.clone(),
                manual_reference: self.manual_reference.clone(),
                exact_location: format!("Page_{}", page.index),
            },
        }
    }

    /// Map every page.
    pub fn structure_all<'a, I>(&self, pages: I) -> Vec<PageRecord>
    where
        I: IntoIterator<Item = &'a SequencedPage>,
    {
        pages.into_iter().map(|page| self.structure(page)).collect()
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join("\n")
}
