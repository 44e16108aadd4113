// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use expanse_registry::{EntityData, EntityInit, EntityRegistry, RegistryConfig};
use kurbo::{Point, Rect, Size, Vec2};

fn populated(n: u32) -> EntityRegistry<u32, ()> {
    let mut reg = EntityRegistry::new(RegistryConfig::default());
    for y in 0..n {
        for x in 0..n {
            let id = y * n + x;
            let pos = Point::new(f64::from(x) * 70.0, f64::from(y) * 70.0);
            reg.register(id, EntityInit::new(pos, Size::new(50.0, 50.0)), EntityData::object())
                .unwrap();
        }
    }
    reg
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanse_registry");

    for &n in &[32_u32, 96] {
        let reg = populated(n);
        let view = Rect::new(500.0, 500.0, 1300.0, 1100.0);
        group.bench_function(format!("get_intersections_settled(n={n})"), |b| {
            b.iter(|| black_box(reg.get_intersections(view, 0.0, None).len()));
        });
        group.bench_function(format!("hit_test(n={n})"), |b| {
            b.iter(|| black_box(reg.hit_test(Point::new(720.0, 720.0)).len()));
        });

        group.bench_function(format!("drag_64_then_query(n={n})"), |b| {
            b.iter_batched(
                || populated(n),
                |mut reg| {
                    for id in 0..64 {
                        let _ = reg.set_gesture_offset(id, Vec2::new(300.0, 300.0));
                    }
                    // Debounced: stale entries join phase one.
                    black_box(reg.get_intersections(view, 0.0, None).len());
                    reg.advance_by(Duration::from_millis(500));
                    black_box(reg.get_intersections(view, 0.0, None).len());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_registry);
criterion_main!(benches);
