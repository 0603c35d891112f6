use cograph::{build_graph, compute_metrics, BuildOptions, Dataset, MetricsConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const FIELDS: [&str; 4] = ["author", "venue", "topic", "year"];

/// Synthetic bibliography: values repeat with different periods so the
/// graph has hubs, a long tail and overlapping groups
fn synthetic_dataset(rows: usize) -> Dataset {
    let mut dataset = Dataset::new(FIELDS);
    for i in 0..rows {
        let author = format!("author{}", (i * 7) % (rows / 3 + 1));
        let venue = format!("venue{}", i % 40);
        let topic = if i % 5 == 0 {
            None
        } else {
            Some(format!("topic{}", (i / 3) % 120))
        };
        let year = format!("{}", 1990 + i % 30);
        dataset
            .push_row(vec![Some(author), Some(venue), topic, Some(year)])
            .expect("row matches columns");
    }
    dataset
}

/// Benchmark graph construction from rows
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for size in [1_000, 10_000, 100_000].iter() {
        let dataset = synthetic_dataset(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| build_graph(&dataset, &FIELDS, &BuildOptions::default()).unwrap());
        });
    }
    group.finish();
}

/// Benchmark pruning at increasing thresholds
fn bench_pruned_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph_pruned");
    let dataset = synthetic_dataset(20_000);

    for min_weight in [2u64, 5, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(min_weight),
            min_weight,
            |b, &min_weight| {
                b.iter(|| {
                    build_graph(&dataset, &FIELDS, &BuildOptions::with_min_weight(min_weight))
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

/// Benchmark the full metrics computation, sampled and exact
fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_metrics");
    group.sample_size(10);

    for size in [500, 2_000, 5_000].iter() {
        let dataset = synthetic_dataset(*size);
        let graph = build_graph(&dataset, &FIELDS, &BuildOptions::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("sampled", size), size, |b, _| {
            b.iter(|| compute_metrics(&graph, &MetricsConfig::default()).unwrap());
        });
        if graph.node_count() <= MetricsConfig::default().max_nodes_for_exact {
            group.bench_with_input(BenchmarkId::new("exact", size), size, |b, _| {
                b.iter(|| compute_metrics(&graph, &MetricsConfig::exact()).unwrap());
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_pruned_build, bench_metrics);
criterion_main!(benches);
