//! Benchmarks for preview rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markpad::document::{MarkdownRenderer, Renderer, parse_with_layout};

fn sample_document() -> String {
    let section = "## Section\n\nSome *emphasis*, some **strong** text and `inline code` \
                   in a paragraph long enough to wrap across several preview lines.\n\n\
                   - first item\n- second item with a [link](https://example.com)\n\n\
                   > quoted text\n\n```rust\nfn main() {}\n```\n\n";
    format!("# Benchmark\n\n{}", section.repeat(50))
}

fn bench_render(c: &mut Criterion) {
    let md = sample_document();
    let renderer = MarkdownRenderer::new(60);

    c.bench_function("render_preview", |b| {
        b.iter(|| renderer.render(black_box(&md)));
    });
}

fn bench_rewrap(c: &mut Criterion) {
    let md = sample_document();

    c.bench_function("rewrap_narrow", |b| {
        b.iter(|| parse_with_layout(black_box(&md), black_box(30)));
    });
}

fn bench_visible_lines(c: &mut Criterion) {
    let doc = MarkdownRenderer::default().render(&sample_document());

    c.bench_function("visible_lines", |b| {
        b.iter(|| doc.visible_lines(black_box(0), black_box(24)).len());
    });
}

criterion_group!(benches, bench_render, bench_rewrap, bench_visible_lines);
criterion_main!(benches);
