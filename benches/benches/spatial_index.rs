// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use expanse_index::SpatialIndex;
use kurbo::{Rect, Vec2};

/// `n * n` boxes of side `side` laid out on a `pitch` grid.
fn grid_rects(n: usize, pitch: f64, side: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * pitch;
            let y0 = y as f64 * pitch;
            out.push(Rect::new(x0, y0, x0 + side, y0 + side));
        }
    }
    out
}

fn build(rects: &[Rect]) -> SpatialIndex<u32> {
    let mut index = SpatialIndex::new();
    for (i, r) in rects.iter().enumerate() {
        index.replace(i as u32, *r);
    }
    index
}

fn bench_spatial_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanse_index");

    for &n in &[32_usize, 64, 128] {
        let rects = grid_rects(n, 60.0, 50.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("build", n), &rects, |b, rects| {
            b.iter(|| black_box(build(rects)));
        });

        group.bench_with_input(BenchmarkId::new("move_all", n), &rects, |b, rects| {
            b.iter_batched(
                || build(rects),
                |mut index| {
                    for (i, r) in rects.iter().enumerate() {
                        index.replace(i as u32, *r + Vec2::new(25.0, 25.0));
                    }
                    black_box(index.len());
                },
                BatchSize::LargeInput,
            );
        });

        let index = build(&rects);
        let extent = n as f64 * 60.0;
        group.bench_with_input(BenchmarkId::new("query_viewport", n), &index, |b, index| {
            let view = Rect::new(extent * 0.25, extent * 0.25, extent * 0.25 + 800.0, extent * 0.25 + 600.0);
            b.iter(|| black_box(index.query_rect(view).len()));
        });
        group.bench_with_input(BenchmarkId::new("query_point", n), &index, |b, index| {
            let p = kurbo::Point::new(extent * 0.5 + 5.0, extent * 0.5 + 5.0);
            b.iter(|| black_box(index.query_point(p).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spatial_index);
criterion_main!(benches);
