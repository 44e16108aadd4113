// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use expanse_transform::{NodeId, TransformGraph, TransformInit};
use kurbo::{Point, Size, Vec2};

/// A root with `fanout` children, each with `fanout` children, `depth` levels deep.
fn build_tree(depth: u32, fanout: u32) -> (TransformGraph, NodeId, Vec<NodeId>) {
    let mut graph = TransformGraph::new();
    let root = graph
        .insert(TransformInit::new(Point::ZERO, Size::new(10.0, 10.0)))
        .unwrap();
    let mut level = vec![root];
    let mut all = vec![root];
    for _ in 0..depth {
        let mut next = Vec::new();
        for &parent in &level {
            for i in 0..fanout {
                let id = graph
                    .insert(
                        TransformInit::new(Point::new(f64::from(i), 1.0), Size::new(10.0, 10.0))
                            .with_parent(parent),
                    )
                    .unwrap();
                next.push(id);
            }
        }
        all.extend_from_slice(&next);
        level = next;
    }
    (graph, root, all)
}

fn bench_transform_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanse_transform");

    for &(depth, fanout) in &[(3_u32, 8_u32), (6, 3)] {
        group.bench_function(format!("move_root_read_all(d={depth},f={fanout})"), |b| {
            b.iter_batched(
                || build_tree(depth, fanout),
                |(mut graph, root, all)| {
                    graph.set_gesture_offset(root, Vec2::new(5.0, 5.0));
                    let sum = all
                        .iter()
                        .filter_map(|&id| graph.world_origin(id))
                        .fold(0.0, |acc, p| acc + p.x);
                    black_box(sum);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("memoized_reads(d={depth},f={fanout})"), |b| {
            let (graph, _, all) = build_tree(depth, fanout);
            for &id in &all {
                black_box(graph.bounds(id));
            }
            b.iter(|| {
                let count = all.iter().filter_map(|&id| graph.bounds(id)).count();
                black_box(count);
            });
        });

        group.bench_function(format!("reparent_leaves(d={depth},f={fanout})"), |b| {
            b.iter_batched(
                || build_tree(depth, fanout),
                |(mut graph, root, all)| {
                    for &id in all.iter().rev().take(64) {
                        let _ = graph.set_parent(id, Some(root));
                    }
                    black_box(graph.generation());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform_graph);
criterion_main!(benches);
