//! Collaborator interfaces.
//!
//! The pipeline never decodes PDF bytes, renders pages, or recognizes
//! pixels itself. Those capabilities sit behind the traits in this module so
//! that any PDF library, renderer, or OCR engine can be plugged in.

mod memory;

pub use memory::{InMemoryLayout, MemoryPage, MemoryTable};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{BoundingBox, PageLayout, TableGrid};

/// Supplies positioned layout elements for the pages of one document.
///
/// Implementations wrap a concrete PDF layout engine. All coordinates are in
/// PDF page space (origin bottom-left), including table bounding boxes.
pub trait LayoutSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Elements of the page at `index` (zero-based), in the engine's order.
    ///
    /// A failure here is fatal for the document.
    fn page(&self, index: u32) -> Result<PageLayout>;

    /// Bounding boxes of the tables found on the page, top to bottom.
    fn find_tables(&self, index: u32) -> Result<Vec<BoundingBox>>;

    /// Cell grid of the `table`-th table on the page.
    fn extract_table(&self, index: u32, table: usize) -> Result<TableGrid>;
}

/// Renders a region of a page to an image file.
pub trait Rasterizer {
    /// Rasterize `region` of page `page` into a file inside `scratch_dir`
    /// and return the file's path.
    ///
    /// `scratch_dir` is owned by the caller and removed after the figure has
    /// been processed, whatever the outcome.
    fn rasterize(&self, page: u32, region: &BoundingBox, scratch_dir: &Path) -> Result<PathBuf>;
}

/// Recognizes text in an encoded image.
pub trait OcrEngine {
    /// Recognize the text in `image` (encoded bytes, e.g. PNG).
    fn recognize(&self, image: &[u8]) -> Result<String>;
}

impl<T: LayoutSource + ?Sized> LayoutSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page(&self, index: u32) -> Result<PageLayout> {
        (**self).page(index)
    }

    fn find_tables(&self, index: u32) -> Result<Vec<BoundingBox>> {
        (**self).find_tables(index)
    }

    fn extract_table(&self, index: u32, table: usize) -> Result<TableGrid> {
        (**self).extract_table(index, table)
    }
}
