//! Benchmarks for the normalization pipelines.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use markwell::config::DEFAULT_CODE_FONT_FAMILY;
use markwell::{AllowList, desemantify, parse_fragment, sanitize, semantify};

const DRAFT: &str = include_str!("../tests/fixtures/draft.html");
const PASTE: &str = include_str!("../tests/fixtures/paste_word.html");

/// A long presentational document built from the draft fixture.
fn large_document(copies: usize) -> String {
    let mut html = String::with_capacity(DRAFT.len() * copies);
    for i in 0..copies {
        html.push_str(DRAFT);
        html.push_str(&format!("<div>section {i} <b>bold <i>mixed</i></b> tail</div>"));
    }
    html
}

// ============================================================================
// Conversion Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let html = large_document(200);
    c.bench_function("parse_fragment", |b| {
        b.iter(|| parse_fragment(&html));
    });
}

fn bench_semantify(c: &mut Criterion) {
    let tree = parse_fragment(&large_document(200));
    c.bench_function("semantify", |b| {
        b.iter(|| semantify(&tree));
    });
}

fn bench_desemantify(c: &mut Criterion) {
    let semantic = semantify(&parse_fragment(&large_document(200)));
    c.bench_function("desemantify", |b| {
        b.iter(|| desemantify(&semantic, DEFAULT_CODE_FONT_FAMILY));
    });
}

// ============================================================================
// Sanitizer Benchmarks
// ============================================================================

fn bench_sanitize(c: &mut Criterion) {
    let tree = parse_fragment(&PASTE.repeat(50));
    let allow_list = AllowList::default();
    c.bench_function("sanitize", |b| {
        b.iter(|| sanitize(&tree, &allow_list));
    });
}

criterion_group!(conversion, bench_parse, bench_semantify, bench_desemantify);
criterion_group!(paste, bench_sanitize);
criterion_main!(conversion, paste);
