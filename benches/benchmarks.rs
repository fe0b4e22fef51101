//! Benchmarks for the composition core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typeline::{Composition, FontMetrics, TextStyle};

fn bench_insert_single_char(c: &mut Criterion) {
    c.bench_function("insert_single_char", |b| {
        let metrics = FontMetrics::default();
        let mut comp = Composition::default();
        b.iter(|| {
            comp.insert(black_box('x'), TextStyle::default(), false, &metrics);
        });
    });
}

fn bench_layout_document(c: &mut Criterion) {
    c.bench_function("layout_document", |b| {
        let metrics = FontMetrics::default();
        let mut comp = Composition::default();

        // ~40 rows of mixed-width content
        for i in 0..40 {
            for ch in "The quick brown fox jumps over the lazy dog".chars() {
                comp.insert(ch, TextStyle::default(), i % 2 == 0, &metrics);
            }
            comp.new_line(i % 2 == 0);
        }

        b.iter(|| {
            comp.layout(black_box(&metrics));
        });
    });
}

fn bench_hit_test(c: &mut Criterion) {
    c.bench_function("hit_test", |b| {
        let metrics = FontMetrics::default();
        let mut comp = Composition::default();
        for i in 0..40 {
            for ch in "The quick brown fox jumps over the lazy dog".chars() {
                comp.insert(ch, TextStyle::default(), false, &metrics);
            }
            comp.new_line(i % 2 == 0);
        }
        comp.layout(&metrics);

        let mut y = 0.0f32;
        b.iter(|| {
            y = (y + 17.0) % 700.0;
            comp.move_caret(black_box(250.0), black_box(y));
        });
    });
}

fn bench_draw_frame(c: &mut Criterion) {
    c.bench_function("draw_frame", |b| {
        let metrics = FontMetrics::default();
        let mut comp = Composition::default();
        for ch in "Hello, World! This is a small document.".chars() {
            comp.insert(ch, TextStyle::default(), false, &metrics);
        }

        b.iter(|| {
            black_box(comp.draw(&metrics));
        });
    });
}

criterion_group!(
    benches,
    bench_insert_single_char,
    bench_layout_document,
    bench_hit_test,
    bench_draw_frame
);
criterion_main!(benches);
