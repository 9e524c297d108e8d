//! # pagestruct
//!
//! Reading-order reconstruction and font-driven structuring of PDF pages.
//!
//! This library takes the positioned layout primitives of a PDF (text runs
//! with font metadata, vector rectangles, embedded figures) and turns every
//! page into a structured record that separates headings, subheadings, body
//! content, tables, and figure text, in the order they appear on the page.
//!
//! PDF decoding, rasterization, and OCR are not part of this crate. They are
//! supplied through the [`LayoutSource`], [`Rasterizer`], and [`OcrEngine`]
//! traits.
//!
//! ## Quick Start
//!
//! ```
//! use pagestruct::model::{BoundingBox, LayoutElement, PageLayout, TextRun};
//! use pagestruct::{structure_document, InMemoryLayout, StructureOptions};
//!
//! fn main() -> pagestruct::Result<()> {
//!     let page = PageLayout::letter(0)
//!         .with(LayoutElement::TextRun(TextRun::uniform(
//!             BoundingBox::new(72.0, 700.0, 300.0, 718.0),
//!             "SECTION 1",
//!             "Times-Bold",
//!             18.0,
//!         )))
//!         .with(LayoutElement::TextRun(TextRun::uniform(
//!             BoundingBox::new(72.0, 660.0, 400.0, 670.0),
//!             "Body text.",
//!             "Times-Roman",
//!             10.0,
//!         )));
//!     let source = InMemoryLayout::new().with_page(page);
//!
//!     let records = structure_document(&source, &StructureOptions::default())?;
//!     assert_eq!(records.len(), 1);
//!     assert!(records[0].content.contains("Body text."));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: elements sorted top to bottom (single-column approximation)
//! - **Two classification policies**: k-means clustering or median/IQR thresholds
//! - **Table awareness**: table text is emitted once, as a pipe-delimited block
//! - **Figure OCR**: pluggable rasterizer and OCR engine with per-figure isolation
//! - **Parallel processing**: uses Rayon for the cluster assignment step

pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    Category, DocumentInfo, FontDetail, LayoutElement, PageLayout, PageRecord, StructureReport,
    Traceability, Warning,
};
pub use pipeline::{Classifier, FontAliasTable, Policy, PolicyKind, StructureOptions};
pub use render::{JsonFormat, PageRecordStructurer};
pub use source::{InMemoryLayout, LayoutSource, OcrEngine, Rasterizer};

use std::path::Path;

/// Structure every page of a document.
///
/// Figures keep their slot with empty text; use
/// [`structure_document_with_ocr`] to recognize them.
///
/// # Arguments
///
/// * `source` - Layout source for the document
/// * `options` - Structuring options
///
/// # Returns
///
/// One [`PageRecord`] per page, in page order.
pub fn structure_document<S: LayoutSource>(
    source: &S,
    options: &StructureOptions,
) -> Result<Vec<PageRecord>> {
    Ok(pipeline::run(source, options, None)?.records)
}

/// Structure every page of a document, recognizing figures.
///
/// A figure that cannot be rasterized or recognized yields empty text in its
/// slot; the rest of the page is unaffected.
///
/// # Example
///
/// ```no_run
/// use std::path::{Path, PathBuf};
/// use pagestruct::model::BoundingBox;
/// use pagestruct::{structure_document_with_ocr, InMemoryLayout, OcrEngine, Rasterizer, StructureOptions};
///
/// struct Renderer;
/// impl Rasterizer for Renderer {
///     fn rasterize(&self, page: u32, region: &BoundingBox, dir: &Path) -> pagestruct::Result<PathBuf> {
///         let path = dir.join("figure.png");
///         // render `region` of `page` to `path`
///         Ok(path)
///     }
/// }
///
/// struct Engine;
/// impl OcrEngine for Engine {
///     fn recognize(&self, image: &[u8]) -> pagestruct::Result<String> {
///         Ok(String::new())
///     }
/// }
///
/// let source = InMemoryLayout::from_json(&std::fs::read_to_string("layout.json")?)?;
/// let records = structure_document_with_ocr(&source, &Renderer, &Engine, &StructureOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn structure_document_with_ocr<S: LayoutSource>(
    source: &S,
    rasterizer: &dyn Rasterizer,
    ocr: &dyn OcrEngine,
    options: &StructureOptions,
) -> Result<Vec<PageRecord>> {
    Ok(pipeline::run(source, options, Some((rasterizer, ocr)))?.records)
}

/// Structure a document and return the full run report: records, sequenced
/// pages, warnings, and category totals.
pub fn structure_report<S: LayoutSource>(
    source: &S,
    options: &StructureOptions,
) -> Result<StructureReport> {
    pipeline::run(source, options, None)
}

/// Structure a layout dump stored as JSON.
///
/// # Example
///
/// ```no_run
/// use pagestruct::{structure_file, render, JsonFormat, StructureOptions};
///
/// let report = structure_file("layout.json", &StructureOptions::default()).unwrap();
/// let json = render::to_json(&report.records, JsonFormat::Pretty).unwrap();
/// std::fs::write("records.json", json).unwrap();
/// ```
pub fn structure_file<P: AsRef<Path>>(path: P, options: &StructureOptions) -> Result<StructureReport> {
    let file = std::fs::File::open(path)?;
    let source = InMemoryLayout::from_reader(std::io::BufReader::new(file))?;
    pipeline::run(&source, options, None)
}

/// Builder for structuring runs.
///
/// # Example
///
/// ```
/// use pagestruct::{Pagestruct, InMemoryLayout, DocumentInfo};
/// use pagestruct::model::PageLayout;
///
/// let source = InMemoryLayout::new().with_page(PageLayout::letter(0));
/// let report = Pagestruct::new()
///     .clustered()
///     .with_document(DocumentInfo::new("doc-1", "Manual", ""))
///     .with_source_label("Maintenance Library")
///     .structure(&source)?;
/// assert_eq!(report.records[0].traceability.exact_location, "Page_0");
/// # Ok::<(), pagestruct::Error>(())
/// ```
pub struct Pagestruct<'a> {
    options: StructureOptions,
    figures: Option<(&'a dyn Rasterizer, &'a dyn OcrEngine)>,
}

impl<'a> Pagestruct<'a> {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: StructureOptions::default(),
            figures: None,
        }
    }

    /// Start from existing options.
    pub fn with_options(mut self, options: StructureOptions) -> Self {
        self.options = options;
        self
    }

    /// Use the cluster policy.
    pub fn clustered(mut self) -> Self {
        self.options = self.options.clustered();
        self
    }

    /// Use the distribution policy.
    pub fn distribution(mut self) -> Self {
        self.options = self.options.distribution();
        self
    }

    /// Add one exact font alias.
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.options = self.options.with_alias(from, to);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set the document identity fields.
    pub fn with_document(mut self, document: DocumentInfo) -> Self {
        self.options = self.options.with_document(document);
        self
    }

    /// Set the traceability source label.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.options = self.options.with_source_label(label);
        self
    }

    /// Set the traceability manual reference.
    pub fn with_manual_reference(mut self, reference: impl Into<String>) -> Self {
        self.options = self.options.with_manual_reference(reference);
        self
    }

    /// Recognize figures with the given rasterizer and OCR engine.
    pub fn with_ocr(mut self, rasterizer: &'a dyn Rasterizer, ocr: &'a dyn OcrEngine) -> Self {
        self.figures = Some((rasterizer, ocr));
        self.options = self.options.with_ocr(true);
        self
    }

    /// The options the run will use.
    pub fn options(&self) -> &StructureOptions {
        &self.options
    }

    /// Run the pipeline over `source`.
    pub fn structure<S: LayoutSource>(&self, source: &S) -> Result<StructureReport> {
        pipeline::run(source, &self.options, self.figures)
    }
}

impl Default for Pagestruct<'_> {
    fn default() -> Self {
        Self::new()
    }
}
