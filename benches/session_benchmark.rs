//! Performance benchmarks for the preview session
//!
//! Run with: `cargo bench`
//!
//! Uses an in-memory renderer so the numbers reflect session bookkeeping
//! (locking, sequence checks, bounds checks) rather than PDFium.

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::RgbaImage;
use pdf_preview::{
    parse_page_order, parse_page_ranges, DocumentHandle, DocumentRenderer, FileSaver,
    PreviewSession, RenderedPage, Result,
};
use std::sync::Arc;

struct BlankRenderer;

#[async_trait]
impl DocumentRenderer for BlankRenderer {
    async fn open_document(&self, bytes: Arc<[u8]>) -> Result<DocumentHandle> {
        let pages = u32::from(bytes[0]);
        Ok(DocumentHandle::new(bytes, pages))
    }

    async fn render_page(
        &self,
        _handle: &DocumentHandle,
        page: u32,
        _scale: f32,
    ) -> Result<RenderedPage> {
        Ok(RenderedPage::new(page, RgbaImage::new(1, 1)))
    }
}

struct NullSaver;

impl FileSaver for NullSaver {
    fn save(&self, _bytes: &[u8], _suggested_name: &str, _mime_type: &str) {}
}

/// Benchmark page and part navigation across a split result
fn bench_navigation(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");
    let session = PreviewSession::new(BlankRenderer, NullSaver);
    runtime
        .block_on(session.open(vec![vec![200], vec![200]], "bench"))
        .expect("Failed to open session");

    let mut group = c.benchmark_group("navigation");

    group.bench_function("change_page_forward_back", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(session.change_page(1).await.unwrap());
                black_box(session.change_page(-1).await.unwrap());
            })
        });
    });

    group.bench_function("change_part_forward_back", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(session.change_part(1).await.unwrap());
                black_box(session.change_part(-1).await.unwrap());
            })
        });
    });

    group.bench_function("clamped_page_change", |b| {
        b.iter(|| runtime.block_on(session.change_page(black_box(10_000))).unwrap());
    });

    group.finish();
}

/// Benchmark opening sessions with many parts
fn bench_open(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");
    let session = PreviewSession::new(BlankRenderer, NullSaver);

    c.bench_function("open_50_parts", |b| {
        b.iter(|| {
            let parts = (0..50).map(|_| vec![10u8]).collect();
            runtime.block_on(session.open(parts, "bench")).unwrap()
        });
    });
}

/// Benchmark page selection parsing
fn bench_page_parsing(c: &mut Criterion) {
    let spec = "1-50,75,80-120,3,9-4";

    c.bench_function("parse_page_ranges", |b| {
        b.iter(|| parse_page_ranges(black_box("1-50,75,80-120,3"), 200).unwrap());
    });

    c.bench_function("parse_page_order", |b| {
        b.iter(|| parse_page_order(black_box(spec), 200).unwrap());
    });
}

criterion_group!(benches, bench_navigation, bench_open, bench_page_parsing);
criterion_main!(benches);
