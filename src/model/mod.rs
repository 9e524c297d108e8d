//! Data model for page structuring.
//!
//! Layout primitives come in from a layout source ([`PageLayout`]), the
//! sequencer turns them into ordered [`PageItem`]s, and the structurer maps
//! those into persisted [`PageRecord`]s.

mod document;
mod element;
mod font;
mod page;
mod report;
mod table;

pub use document::{DocumentInfo, PageRecord, Traceability};
pub use element::{BoundingBox, Figure, Glyph, LayoutElement, PageLayout, TextRun, VectorShape};
pub use font::{round_size, FontDetail};
pub use page::{Category, ClassifiedLine, ImageBlock, PageItem, SequencedPage, TableBlock};
pub use report::{CategoryCounts, StructureReport, Warning};
pub use table::TableGrid;
