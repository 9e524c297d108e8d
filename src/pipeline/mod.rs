//! The structuring pipeline.
//!
//! A run has two passes over the document:
//!
//! 1. Every page is loaded and its font details gathered into a
//!    [`FontCorpus`]; the classification [`Policy`] is fitted on it.
//! 2. Pages are sequenced in ascending order with the fitted policy, and
//!    each sequenced page is mapped to a [`PageRecord`](crate::model::PageRecord).
//!
//! The first pass is a hard barrier: no line is classified before every
//! page has been scanned.

mod classify;
mod cluster;
mod distribution;
mod figure;
mod fonts;
mod options;
mod sequencer;
mod table_locator;

pub use classify::{Classifier, FontCorpus, Policy};
pub use cluster::{
    kmeans, ClusterModel, ClusterPolicy, FontNameEncoder, KMeansFit, Point, CLUSTER_COUNT,
};
pub use distribution::{percentile, DistributionPolicy, SizeStats};
pub use figure::{crop_region, FigureResolver};
pub use fonts::{FontAliasTable, FontFeatureExtractor};
pub use options::{PolicyKind, StructureOptions};
pub use sequencer::{reading_order, PageOutput, PageSequencer};
pub use table_locator::{render_table, TableLocator, TableState, TableTransition};

use crate::error::{Error, Result};
use crate::model::{PageLayout, StructureReport};
use crate::render::PageRecordStructurer;
use crate::source::{LayoutSource, OcrEngine, Rasterizer};

/// Load every page of the document, in order.
///
/// Any failure is fatal and reported as [`Error::LayoutRead`].
pub fn load_pages(source: &dyn LayoutSource) -> Result<Vec<PageLayout>> {
    let count = source.page_count();
    log::debug!("Loading {} pages", count);

    (0..count)
        .map(|index| {
            let mut layout = source.page(index).map_err(|e| match e {
                e @ Error::LayoutRead { .. } => e,
                other => Error::LayoutRead {
                    page: index,
                    message: other.to_string(),
                },
            })?;
            layout.index = index;
            Ok(layout)
        })
        .collect()
}

/// Run both passes over a document.
///
/// `figures` supplies the rasterizer and OCR engine; without it (or with
/// OCR disabled in `options`) figures keep their slot with empty text.
pub fn run(
    source: &dyn LayoutSource,
    options: &StructureOptions,
    figures: Option<(&dyn Rasterizer, &dyn OcrEngine)>,
) -> Result<StructureReport> {
    options.validate()?;

    let pages = load_pages(source)?;
    let extractor = FontFeatureExtractor::new(options.aliases.clone());
    let corpus = FontCorpus::from_pages(&pages, &extractor);
    let policy = Policy::fitted(options, &corpus);

    let mut sequencer =
        PageSequencer::new(source, &extractor, &policy).with_table_tolerance(options.table_tolerance);
    if options.ocr {
        if let Some((rasterizer, ocr)) = figures {
            sequencer = sequencer.with_figures(FigureResolver::new(rasterizer, ocr));
        }
    }

    let mut report = StructureReport::default();
    for layout in &pages {
        let output = sequencer.sequence(layout, &mut report.counts)?;
        report.warnings.extend(output.warnings);
        report.pages.push(output.page);
    }
    report.records = PageRecordStructurer::new(options).structure_all(&report.pages);

    log::info!(
        "Structured {} pages: {} headings, {} subheadings, {} content lines ({} warnings)",
        report.records.len(),
        report.counts.heading,
        report.counts.subheading,
        report.counts.content,
        report.warnings.len()
    );

    Ok(report)
}
