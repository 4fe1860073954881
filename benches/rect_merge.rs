//! Rect Merge Benchmarks
//!
//! The merge runs on every overlay render pass for every persisted
//! highlight, so it has to stay cheap even for selections spanning many
//! fragmented lines.
//!
//! Run with: `cargo bench --bench rect_merge`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use papershare_core::geometry::Rect;
use papershare_core::merge_rects;

/// Fragments laid out like a real text selection: `per_line` fragments
/// on each of `lines` visual lines, slightly jittered horizontally.
fn selection_fragments(lines: usize, per_line: usize) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(lines * per_line);
    for line in 0..lines {
        let y = 5.0 + line as f64 * 3.2;
        for frag in 0..per_line {
            let x = 8.0 + frag as f64 * 11.0;
            rects.push(Rect::new(x, y + (frag % 2) as f64 * 0.3, 10.0, 2.8));
        }
    }
    rects
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_rects");

    for (lines, per_line) in [(2, 3), (10, 5), (50, 8)] {
        let fragments = selection_fragments(lines, per_line);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}x{per_line}")),
            &fragments,
            |b, fragments| {
                b.iter(|| merge_rects(black_box(fragments)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
