//! Page sequencer: one forward pass over a page in reading order.
//!
//! Reading order is approximated by sorting elements on their top edge,
//! highest first. Multi-column pages interleave their columns under this
//! order; no column detection is attempted.

use crate::error::Result;
use crate::model::{
    CategoryCounts, ClassifiedLine, LayoutElement, PageItem, PageLayout, SequencedPage, Warning,
};
use crate::source::LayoutSource;

use super::classify::Classifier;
use super::figure::{empty_block, FigureResolver};
use super::fonts::FontFeatureExtractor;
use super::table_locator::{render_table, TableLocator, TableTransition};

/// Elements of a page in reading order, each paired with its index in the
/// source order.
///
/// The sort is stable: elements sharing a top edge keep their source order.
/// A NaN top edge sorts after every finite one, so one malformed box cannot
/// stall the ordering of the rest of the page.
pub fn reading_order(elements: &[LayoutElement]) -> Vec<(usize, &LayoutElement)> {
    let mut ordered: Vec<(usize, &LayoutElement)> = elements.iter().enumerate().collect();
    ordered.sort_by(|(_, a), (_, b)| {
        let (a, b) = (a.top(), b.top());
        a.is_nan().cmp(&b.is_nan()).then_with(|| b.total_cmp(&a))
    });
    ordered
}

/// Sequencer output for one page.
#[derive(Debug, Clone, Default)]
pub struct PageOutput {
    /// Items in reading order
    pub page: SequencedPage,
    /// Soft errors recorded on this page
    pub warnings: Vec<Warning>,
}

/// Walks pages and dispatches each element to the extractor and classifier,
/// the table locator, or the figure resolver.
pub struct PageSequencer<'a> {
    source: &'a dyn LayoutSource,
    extractor: &'a FontFeatureExtractor,
    classifier: &'a dyn Classifier,
    figures: Option<FigureResolver<'a>>,
    table_tolerance: f64,
}

impl<'a> PageSequencer<'a> {
    /// Create a sequencer. Figures produce empty blocks until a resolver is
    /// attached with [`with_figures`](Self::with_figures).
    pub fn new(
        source: &'a dyn LayoutSource,
        extractor: &'a FontFeatureExtractor,
        classifier: &'a dyn Classifier,
    ) -> Self {
        Self {
            source,
            extractor,
            classifier,
            figures: None,
            table_tolerance: 1.0,
        }
    }

    /// Recognize figures with the given resolver.
    pub fn with_figures(mut self, resolver: FigureResolver<'a>) -> Self {
        self.figures = Some(resolver);
        self
    }

    /// Set the table matching tolerance in points.
    pub fn with_table_tolerance(mut self, tolerance: f64) -> Self {
        self.table_tolerance = tolerance;
        self
    }

    /// Sequence one page, adding its classified lines to `counts`.
    ///
    /// Fails only when classification fails; the error carries the page and
    /// the element's index in source order.
    pub fn sequence(&self, layout: &PageLayout, counts: &mut CategoryCounts) -> Result<PageOutput> {
        let index = layout.index;
        let order = reading_order(&layout.elements);
        let mut output = PageOutput {
            page: SequencedPage::new(index),
            warnings: Vec::new(),
        };

        let tables = match self.source.find_tables(index) {
            Ok(tables) => tables,
            Err(e) => {
                let warning = Warning::TableFinder {
                    page: index,
                    message: e.to_string(),
                };
                log::warn!("{}, continuing without tables", warning);
                output.warnings.push(warning);
                Vec::new()
            }
        };
        let mut locator = TableLocator::new(index, tables, self.table_tolerance);
        let mut figure_index = 0usize;

        log::debug!(
            "Page {}: sequencing {} elements ({} tables reported)",
            index,
            order.len(),
            locator.expected()
        );

        for (position, &(original, element)) in order.iter().enumerate() {
            match element {
                LayoutElement::TextRun(run) => {
                    if locator.suppresses(&run.bbox) {
                        log::trace!("Page {}: table text {:?} suppressed", index, run.text.trim());
                        continue;
                    }

                    let (text, details) = self.extractor.extract(run);
                    if text.is_empty() {
                        continue;
                    }

                    let category = self
                        .classifier
                        .classify(&details)
                        .map_err(|e| e.at(index, original))?;
                    counts.record(category);
                    output
                        .page
                        .items
                        .push(PageItem::Line(ClassifiedLine { category, text }));
                }
                LayoutElement::VectorShape(shape) => {
                    let next_is_shape = order
                        .get(position + 1)
                        .map(|(_, next)| next.is_vector_shape())
                        .unwrap_or(false);

                    match locator.on_vector_shape(&shape.bbox, next_is_shape) {
                        TableTransition::Entered(table)
                        | TableTransition::ExitedAndEntered(_, table) => {
                            self.emit_table(index, table, &mut output);
                        }
                        TableTransition::Exited(_) | TableTransition::None => {}
                    }
                }
                LayoutElement::Figure(figure) => {
                    let block = match &self.figures {
                        Some(resolver) => {
                            let (block, warning) =
                                resolver.resolve(index, &layout.media_box, figure, figure_index);
                            output.warnings.extend(warning);
                            block
                        }
                        None => empty_block(index, figure_index),
                    };
                    output.page.items.push(PageItem::Image(block));
                    figure_index += 1;
                }
            }
        }

        output.warnings.extend(locator.finish());
        Ok(output)
    }

    fn emit_table(&self, page: u32, table: usize, output: &mut PageOutput) {
        match render_table(self.source, page, table) {
            Ok(block) => output.page.items.push(PageItem::Table(block)),
            Err(e) => {
                let warning = Warning::TableExtraction {
                    page,
                    table,
                    message: e.to_string(),
                };
                log::warn!("{}", warning);
                output.warnings.push(warning);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BoundingBox, Category, FontDetail, TableGrid, TextRun};
    use crate::source::{InMemoryLayout, MemoryTable};

    /// Classifies by size alone: >= 16 heading, >= 12 subheading.
    struct SizeClassifier;

    impl Classifier for SizeClassifier {
        fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
            Ok(match metadata.first().map(|d| d.size) {
                Some(s) if s >= 16.0 => Category::Heading,
                Some(s) if s >= 12.0 => Category::Subheading,
                _ => Category::Content,
            })
        }
    }

    struct Unfitted;

    impl Classifier for Unfitted {
        fn classify(&self, _metadata: &[FontDetail]) -> Result<Category> {
            Err(Error::PolicyNotInitialized)
        }
    }

    fn text(y1: f64, text: &str, size: f64) -> LayoutElement {
        LayoutElement::TextRun(TextRun::uniform(
            BoundingBox::new(72.0, y1 - size, 400.0, y1),
            text,
            "Times-Roman",
            size,
        ))
    }

    #[test]
    fn test_reading_order_is_stable() {
        let elements = vec![
            text(100.0, "low", 10.0),
            text(500.0, "tie a", 10.0),
            text(700.0, "top", 10.0),
            text(500.0, "tie b", 10.0),
        ];
        let order: Vec<usize> = reading_order(&elements).into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_reading_order_with_nan_top() {
        let elements = vec![
            text(100.0, "bottom", 10.0),
            LayoutElement::figure(100.0, 400.0, 500.0, f64::NAN),
            text(700.0, "top", 10.0),
        ];
        let order: Vec<usize> = reading_order(&elements).into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_lines_follow_reading_order() {
        let page = PageLayout::letter(0)
            .with(text(300.0, "Body text.", 10.0))
            .with(text(700.0, "SECTION 1", 18.0))
            .with(text(650.0, "1.1 Scope", 13.0));
        let source = InMemoryLayout::new().with_page(page.clone());
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &SizeClassifier);

        let mut counts = CategoryCounts::default();
        let output = sequencer.sequence(&page, &mut counts).unwrap();

        let texts: Vec<&str> = output.page.items.iter().map(|i| i.text()).collect();
        assert_eq!(texts, vec!["SECTION 1", "1.1 Scope", "Body text."]);
        assert_eq!(counts.heading, 1);
        assert_eq!(counts.subheading, 1);
        assert_eq!(counts.content, 1);
    }

    #[test]
    fn test_table_text_suppressed() {
        let table = BoundingBox::new(50.0, 300.0, 550.0, 500.0);
        let page = PageLayout::letter(0)
            .with(text(600.0, "Before the table", 10.0))
            .with(LayoutElement::rect(50.0, 499.0, 550.0, 500.0))
            .with(text(480.0, "Bolt", 10.0))
            .with(LayoutElement::rect(50.0, 300.0, 550.0, 301.0))
            .with(LayoutElement::rect(50.0, 250.0, 550.0, 251.0))
            .with(text(200.0, "After the table", 10.0));
        let source = InMemoryLayout::new().with_page_and_tables(
            page.clone(),
            vec![MemoryTable {
                bbox: table,
                cells: TableGrid::from_strings([["Part", "Qty"], ["Bolt", "4"]]),
            }],
        );
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &SizeClassifier);

        let output = sequencer
            .sequence(&page, &mut CategoryCounts::default())
            .unwrap();

        let content: Vec<&str> = output.page.lines(Category::Content).collect();
        assert_eq!(content, vec!["Before the table", "After the table"]);
        let tables: Vec<&str> = output.page.tables().map(|t| t.text.as_str()).collect();
        assert_eq!(tables, vec!["|Part|Qty|\n|Bolt|4|"]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_trailing_shape_at_end_of_page() {
        let page = PageLayout::letter(0)
            .with(LayoutElement::rect(50.0, 499.0, 550.0, 500.0))
            .with(LayoutElement::rect(50.0, 50.0, 550.0, 51.0));
        let source = InMemoryLayout::new().with_page_and_tables(
            page.clone(),
            vec![MemoryTable {
                bbox: BoundingBox::new(50.0, 300.0, 550.0, 500.0),
                cells: TableGrid::from_strings([["A"]]),
            }],
        );
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &SizeClassifier);

        let output = sequencer
            .sequence(&page, &mut CategoryCounts::default())
            .unwrap();
        assert_eq!(output.page.tables().count(), 1);
    }

    #[test]
    fn test_unmatched_tables_warn() {
        let page = PageLayout::letter(2).with(text(700.0, "No borders here", 10.0));
        let source = InMemoryLayout::new()
            .with_page(PageLayout::letter(0))
            .with_page(PageLayout::letter(1))
            .with_page_and_tables(
                page.clone(),
                vec![MemoryTable {
                    bbox: BoundingBox::new(50.0, 300.0, 550.0, 500.0),
                    cells: TableGrid::from_strings([["A"]]),
                }],
            );
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &SizeClassifier);

        let output = sequencer
            .sequence(&page, &mut CategoryCounts::default())
            .unwrap();
        assert_eq!(
            output.warnings,
            vec![Warning::TableDetectionIncomplete {
                page: 2,
                expected: 1,
                detected: 0
            }]
        );
    }

    #[test]
    fn test_figures_without_ocr_keep_their_slot() {
        let page = PageLayout::letter(0)
            .with(text(700.0, "Figure 1", 10.0))
            .with(LayoutElement::figure(100.0, 400.0, 500.0, 650.0))
            .with(text(350.0, "Caption", 10.0));
        let source = InMemoryLayout::new().with_page(page.clone());
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &SizeClassifier);

        let output = sequencer
            .sequence(&page, &mut CategoryCounts::default())
            .unwrap();
        assert!(matches!(output.page.items[1], PageItem::Image(ref b) if b.text.is_empty()));
        assert_eq!(output.page.items.len(), 3);
    }

    #[test]
    fn test_classification_error_is_located() {
        let page = PageLayout::letter(5)
            .with(LayoutElement::rect(0.0, 0.0, 10.0, 10.0))
            .with(text(700.0, "Title", 18.0));
        let source = InMemoryLayout::new();
        let extractor = FontFeatureExtractor::default();
        let sequencer = PageSequencer::new(&source, &extractor, &Unfitted);

        let err = sequencer
            .sequence(&page, &mut CategoryCounts::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Located {
                page: 5,
                element: 1,
                ..
            }
        ));
        assert!(matches!(err.root(), Error::PolicyNotInitialized));
    }
}
