//! Benchmarks for codeowners-query-core
//!
//! Run with: cargo bench -p codeowners-query-core
//!
//! Filter benchmarks:
//!   cargo bench -- "rules"
//!   cargo bench -- "resolve"

use codeowners_query_core::{OwnershipResolver, RuleStore};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Synthetic CODEOWNERS text with `n` rules mixing every pattern shape.
fn codeowners_with_rules(n: usize) -> String {
    let mut out = String::from("* @org/default\n");
    for i in 0..n {
        let line = match i % 5 {
            0 => format!("*.ext{} @org/team{}\n", i, i % 17),
            1 => format!("/service{}/ @org/team{}\n", i, i % 17),
            2 => format!("docs/section{}/** @user{}\n", i, i),
            3 => format!("!generated{}/**\n", i),
            _ => format!("**/module{}/*.rs @org/team{} dev{}@example.com\n", i, i % 17, i),
        };
        out.push_str(&line);
    }
    out
}

fn sample_paths() -> Vec<String> {
    (0..500)
        .map(|i| match i % 4 {
            0 => format!("service{}/src/main.rs", i),
            1 => format!("docs/section{}/index.md", i),
            2 => format!("crates/module{}/lib.rs", i),
            _ => format!("generated{}/out.ext{}", i, i),
        })
        .collect()
}

/// Benchmark building the rule store
fn bench_rule_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");

    for size in [10, 100, 1000] {
        let content = codeowners_with_rules(size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", size), &content, |b, input| {
            b.iter(|| RuleStore::parse("CODEOWNERS", std::hint::black_box(input)))
        });
    }
    group.finish();
}

/// Benchmark uncached resolution (a fresh resolver per iteration)
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let paths = sample_paths();

    for size in [10, 100, 1000] {
        let store = RuleStore::parse("CODEOWNERS", &codeowners_with_rules(size));
        group.throughput(Throughput::Elements(paths.len() as u64));
        group.bench_with_input(BenchmarkId::new("cold", size), &store, |b, store| {
            b.iter(|| {
                let resolver = OwnershipResolver::new(store.clone());
                for path in &paths {
                    std::hint::black_box(resolver.resolve(path));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rule_store, bench_resolve);
criterion_main!(benches);
