//! Benchmarks for page structuring performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks structure synthetic layouts of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagestruct::model::{BoundingBox, LayoutElement, PageLayout, TableGrid, TextRun};
use pagestruct::pipeline::{kmeans, Point};
use pagestruct::source::MemoryTable;
use pagestruct::{structure_document, InMemoryLayout, StructureOptions};

/// Creates a synthetic document: a heading, subheadings, body lines, and
/// one bordered table per page.
fn create_test_layout(page_count: u32) -> InMemoryLayout {
    let mut layout = InMemoryLayout::new();

    for index in 0..page_count {
        let mut page = PageLayout::letter(index);
        let mut y = 760.0;

        page.push(LayoutElement::TextRun(TextRun::uniform(
            BoundingBox::new(72.0, y - 20.0, 540.0, y),
            format!("SECTION {}", index + 1),
            "Times-Bold",
            20.0,
        )));
        y -= 30.0;

        for line in 0..30 {
            let (font, size) = if line % 10 == 0 {
                ("Times-Bold", 13.0)
            } else {
                ("Times-Roman", 10.0)
            };
            page.push(LayoutElement::TextRun(TextRun::uniform(
                BoundingBox::new(72.0, y - size, 540.0, y),
                format!("Line {} of page {} with some body text", line, index + 1),
                font,
                size,
            )));
            y -= 14.0;
        }

        let table = BoundingBox::new(50.0, y - 100.0, 550.0, y);
        page.push(LayoutElement::rect(50.0, y - 1.0, 550.0, y));
        page.push(LayoutElement::rect(50.0, y - 100.0, 550.0, y - 99.0));
        layout = layout.with_page_and_tables(
            page,
            vec![MemoryTable {
                bbox: table,
                cells: TableGrid::from_strings([["Part", "Qty"], ["Bolt", "4"]]),
            }],
        );
    }

    layout
}

fn bench_structuring(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure_document");

    for page_count in [1, 10, 50] {
        let layout = create_test_layout(page_count);
        let distribution = StructureOptions::default();
        let clustered = StructureOptions::new().clustered();

        group.bench_with_input(
            BenchmarkId::new("distribution", page_count),
            &layout,
            |b, layout| b.iter(|| structure_document(black_box(layout), &distribution)),
        );
        group.bench_with_input(
            BenchmarkId::new("cluster", page_count),
            &layout,
            |b, layout| b.iter(|| structure_document(black_box(layout), &clustered)),
        );
    }

    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let points: Vec<Point> = (0..20_000)
        .map(|i| [(i % 4) as f64, 8.0 + (i % 9) as f64 * 1.5])
        .collect();

    c.bench_function("kmeans_sequential", |b| {
        b.iter(|| kmeans(black_box(&points), 3, 300, false))
    });
    c.bench_function("kmeans_parallel", |b| {
        b.iter(|| kmeans(black_box(&points), 3, 300, true))
    });
}

criterion_group!(benches, bench_structuring, bench_kmeans);
criterion_main!(benches);
