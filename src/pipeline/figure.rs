//! Figure resolver: crop, rasterize, and recognize embedded figures.
//!
//! Every figure gets its own scratch directory. The directory and whatever
//! the rasterizer wrote into it are removed when the figure is done, on the
//! success path and on every failure path alike.

use std::fs;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Figure, ImageBlock, Warning};
use crate::source::{OcrEngine, Rasterizer};

/// The rasterizer and OCR engine pair used for figures.
pub struct FigureResolver<'a> {
    rasterizer: &'a dyn Rasterizer,
    ocr: &'a dyn OcrEngine,
}

impl<'a> FigureResolver<'a> {
    /// Create a resolver.
    pub fn new(rasterizer: &'a dyn Rasterizer, ocr: &'a dyn OcrEngine) -> Self {
        Self { rasterizer, ocr }
    }

    /// Recognize the text of one figure.
    ///
    /// Never fails: a rasterization or OCR error yields an empty block plus a
    /// warning, so the figure keeps its slot on the page.
    pub fn resolve(
        &self,
        page: u32,
        media_box: &BoundingBox,
        figure: &Figure,
        figure_index: usize,
    ) -> (ImageBlock, Option<Warning>) {
        match self.recognize(page, media_box, figure) {
            Ok(text) => {
                log::debug!(
                    "Page {}: figure {} recognized ({} chars)",
                    page,
                    figure_index,
                    text.len()
                );
                (
                    ImageBlock {
                        page,
                        figure: figure_index,
                        text,
                    },
                    None,
                )
            }
            Err(e) => {
                let warning = Warning::OcrFailure {
                    page,
                    figure: figure_index,
                    message: e.to_string(),
                };
                log::warn!("{}", warning);
                (empty_block(page, figure_index), Some(warning))
            }
        }
    }

    fn recognize(&self, page: u32, media_box: &BoundingBox, figure: &Figure) -> Result<String> {
        let region = crop_region(media_box, &figure.bbox).ok_or_else(|| {
            Error::Rasterize(format!(
                "figure at ({:.1}, {:.1}, {:.1}, {:.1}) lies outside the page",
                figure.bbox.x0, figure.bbox.y0, figure.bbox.x1, figure.bbox.y1
            ))
        })?;

        let scratch = tempfile::Builder::new().prefix("pagestruct-figure").tempdir()?;
        let image_path = self.rasterizer.rasterize(page, &region, scratch.path())?;
        let image = fs::read(&image_path)?;
        let text = self.ocr.recognize(&image)?;

        scratch.close()?;
        Ok(text.trim().to_string())
    }
}

/// Block emitted for a figure when OCR is disabled or failed.
pub fn empty_block(page: u32, figure: usize) -> ImageBlock {
    ImageBlock {
        page,
        figure,
        text: String::new(),
    }
}

/// The part of the figure that lies on the page.
pub fn crop_region(media_box: &BoundingBox, figure: &BoundingBox) -> Option<BoundingBox> {
    figure.intersect(media_box)
}
