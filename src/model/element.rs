//! Positioned layout primitives supplied by a layout source.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in PDF page space.
///
/// The origin is the bottom-left corner of the page and `y` grows upward,
/// so `y1` is the top edge and `y0` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f64,
    /// Bottom edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in points.
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height in points.
    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Whether the box has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether the vertical extent `[y0, y1]` lies within `[bottom, top]`.
    pub fn within_vertical(&self, bottom: f64, top: f64) -> bool {
        self.y0 >= bottom && self.y1 <= top
    }

    /// Whether the vertical extents of the two boxes overlap, allowing
    /// `tolerance` points of slack on both sides.
    pub fn overlaps_vertically(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.y0 <= other.y1 + tolerance && self.y1 >= other.y0 - tolerance
    }

    /// Intersection with another box, or `None` when they do not overlap.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let clipped = BoundingBox {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

/// A single character of a text run with its font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// The character as decoded by the layout source (may be a ligature)
    pub text: String,
    /// Font name as embedded in the PDF (e.g., "ABCDEF+Times-Italic")
    pub font_name: String,
    /// Font size in points
    pub size: f64,
}

impl Glyph {
    /// Create a new glyph.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            size,
        }
    }
}

/// A text container with its glyphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Bounding box of the run
    pub bbox: BoundingBox,
    /// Text as reported by the layout source
    pub text: String,
    /// Glyphs in content order; may be empty when the source has no font data
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
}

impl TextRun {
    /// Create a text run where every character shares one font.
    pub fn uniform(
        bbox: BoundingBox,
        text: impl Into<String>,
        font_name: impl Into<String>,
        size: f64,
    ) -> Self {
        let text = text.into();
        let font_name = font_name.into();
        let glyphs = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Glyph::new(c.to_string(), font_name.clone(), size))
            .collect();
        Self { bbox, text, glyphs }
    }
}

/// A vector rectangle (table borders, rules, boxes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorShape {
    /// Bounding box of the shape
    pub bbox: BoundingBox,
}

/// An embedded figure (raster image or form XObject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Bounding box of the figure
    pub bbox: BoundingBox,
    /// Optional name assigned by the source (XObject name)
    #[serde(default)]
    pub name: Option<String>,
}

/// A positioned primitive on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutElement {
    /// Text with font metadata
    TextRun(TextRun),
    /// A vector rectangle
    VectorShape(VectorShape),
    /// An embedded figure
    Figure(Figure),
}

impl LayoutElement {
    /// Bounding box of the element.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            LayoutElement::TextRun(run) => &run.bbox,
            LayoutElement::VectorShape(shape) => &shape.bbox,
            LayoutElement::Figure(figure) => &figure.bbox,
        }
    }

    /// Top edge of the element, the reading-order sort key.
    pub fn top(&self) -> f64 {
        self.bbox().y1
    }

    /// Check if this element is a vector shape.
    pub fn is_vector_shape(&self) -> bool {
        matches!(self, LayoutElement::VectorShape(_))
    }

    /// Shorthand for a vector shape element.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        LayoutElement::VectorShape(VectorShape {
            bbox: BoundingBox::new(x0, y0, x1, y1),
        })
    }

    /// Shorthand for a figure element.
    pub fn figure(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        LayoutElement::Figure(Figure {
            bbox: BoundingBox::new(x0, y0, x1, y1),
            name: None,
        })
    }
}

/// All layout elements of one page, in the source's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Zero-based page index
    pub index: u32,
    /// Page media box
    pub media_box: BoundingBox,
    /// Elements in source order (not reading order)
    pub elements: Vec<LayoutElement>,
}

impl PageLayout {
    /// Create an empty US Letter page.
    pub fn letter(index: u32) -> Self {
        Self {
            index,
            media_box: BoundingBox::new(0.0, 0.0, 612.0, 792.0),
            elements: Vec::new(),
        }
    }

    /// Add an element to the page.
    pub fn push(&mut self, element: LayoutElement) {
        self.elements.push(element);
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with(mut self, element: LayoutElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Iterate over the text runs of the page.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            LayoutElement::TextRun(run) => Some(run),
            _ => None,
        })
    }
}
