//! Performance benchmarks for tree assembly and path search.
//!
//! Run with: `cargo bench --bench traversal`
//!
//! Forests are complete trees with a fixed fan-out where every topic has
//! been edited once, so child lookups always have a stale version to skip.

use criterion::{
    black_box, criterion_group, criterion_main,
    BenchmarkId, Criterion, Throughput,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

use topic_graph::{InMemoryTopicStore, TopicGraph, TopicVersion};

struct Forest {
    graph: TopicGraph<InMemoryTopicStore>,
    root: TopicVersion,
    /// Deepest, left-most topic.
    first_leaf: TopicVersion,
    /// Deepest, right-most topic.
    last_leaf: TopicVersion,
}

/// Build a complete tree of `depth` levels below the root.
fn build_forest(rt: &Runtime, fan_out: usize, depth: usize) -> Forest {
    rt.block_on(async {
        let graph = TopicGraph::new(Arc::new(InMemoryTopicStore::new()));
        let root = graph.create("root", "v1", None).await.unwrap();
        let root = graph.update(&root.id, "root", "v2").await.unwrap();

        let mut level = vec![root.clone()];
        for d in 0..depth {
            let mut next = Vec::with_capacity(level.len() * fan_out);
            for parent in &level {
                for i in 0..fan_out {
                    let name = format!("{}-{}", d, i);
                    let child = graph.create(&name, "v1", Some(parent.id)).await.unwrap();
                    let child = graph.update(&child.id, &name, "v2").await.unwrap();
                    next.push(child);
                }
            }
            level = next;
        }

        let first_leaf = level.first().cloned().unwrap_or_else(|| root.clone());
        let last_leaf = level.last().cloned().unwrap_or_else(|| root.clone());
        Forest { graph, root, first_leaf, last_leaf }
    })
}

/// Benchmark tree snapshots over growing hierarchies.
fn bench_build_tree(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("build_tree");

    for depth in [2, 4, 6] {
        let forest = build_forest(&rt, 3, depth);
        let nodes: usize = (0..=depth).map(|d| 3usize.pow(d as u32)).sum();

        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::new("depth", depth), &forest, |b, forest| {
            b.iter(|| {
                let tree = rt
                    .block_on(forest.graph.build_tree(black_box(&forest.root.id)))
                    .unwrap();
                assert_eq!(tree.node_count(), nodes);
                tree
            })
        });
    }

    group.finish();
}

/// Benchmark worst-case path search between opposite leaves.
fn bench_shortest_path(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("shortest_path");

    for depth in [2, 4, 6] {
        let forest = build_forest(&rt, 3, depth);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("depth", depth), &forest, |b, forest| {
            b.iter(|| {
                let path = rt
                    .block_on(forest.graph.shortest_path(
                        black_box(&forest.first_leaf.id),
                        black_box(&forest.last_leaf.id),
                    ))
                    .unwrap();
                assert_eq!(path.hop_count(), depth * 2);
                path
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_shortest_path);
criterion_main!(benches);
