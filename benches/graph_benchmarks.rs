use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graph_engine::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Benchmarks for each algorithm family over seeded random graphs

fn create_test_graph(node_count: u32, edge_count: usize) -> GraphStore {
    let mut rng = Pcg64::seed_from_u64(42);
    let mut graph = GraphStore::with_capacity(edge_count + node_count as usize);

    // Chain keeps the undirected view connected
    for i in 1..node_count {
        graph.add_edge(i - 1, i, rng.gen_range(-1000..=1000));
    }
    for _ in 0..edge_count {
        let from = rng.gen_range(0..node_count);
        let to = rng.gen_range(0..node_count);
        graph.add_edge(from, to, rng.gen_range(-1000..=1000));
    }

    graph
}

fn benchmark_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for &size in &[1000u32, 10000, 100000] {
        let graph = create_test_graph(size, size as usize * 4);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("bfs", size), &graph, |b, graph| {
            b.iter(|| black_box(bfs(graph, 0)))
        });
        group.bench_with_input(BenchmarkId::new("dfs", size), &graph, |b, graph| {
            b.iter(|| black_box(dfs(graph, 0)))
        });
    }

    group.finish();
}

fn benchmark_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");

    for &size in &[1000u32, 10000, 50000] {
        let graph = create_test_graph(size, size as usize * 4);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("dijkstra", size), &graph, |b, graph| {
            b.iter(|| black_box(shortest_distance(graph, 0, size - 1)))
        });
    }

    for &size in &[50u32, 100, 200] {
        let graph = create_test_graph(size, size as usize * 4);
        group.bench_with_input(BenchmarkId::new("floyd_warshall", size), &graph, |b, graph| {
            b.iter(|| black_box(all_shortest_paths(graph)))
        });
    }

    group.finish();
}

fn benchmark_spanning_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("spanning_tree");

    for &size in &[1000u32, 10000, 50000] {
        let graph = create_test_graph(size, size as usize * 5);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));
        group.bench_with_input(BenchmarkId::new("kruskal", size), &graph, |b, graph| {
            b.iter(|| black_box(kruskal(graph)))
        });
        group.bench_with_input(BenchmarkId::new("prim", size), &graph, |b, graph| {
            b.iter(|| black_box(prim(graph)))
        });
    }

    group.finish();
}

fn benchmark_max_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_flow");

    for &size in &[100u32, 500, 2000] {
        let graph = create_test_graph(size, size as usize * 4);
        group.bench_with_input(BenchmarkId::new("ford_fulkerson", size), &graph, |b, graph| {
            b.iter(|| black_box(max_flow(graph, 0, size - 1)))
        });
    }

    group.finish();
}

fn benchmark_betweenness(c: &mut Criterion) {
    let mut group = c.benchmark_group("betweenness");
    group.sample_size(10);

    for &size in &[100u32, 500, 1000] {
        let graph = create_test_graph(size, size as usize * 3);
        group.bench_with_input(BenchmarkId::new("brandes", size), &graph, |b, graph| {
            b.iter(|| black_box(betweenness(graph)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_traversal,
    benchmark_shortest_paths,
    benchmark_spanning_tree,
    benchmark_max_flow,
    benchmark_betweenness
);
criterion_main!(benches);
