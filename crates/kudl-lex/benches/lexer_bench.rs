//! Tokenizer benchmarks
//!
//! Measures tokenizer throughput on representative documents.
//! Run with: `cargo bench --package kudl-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kudl_lex::tokenize;

fn token_count(source: &str) -> usize {
    tokenize(source).map(|(tokens, _)| tokens.len()).unwrap_or(0)
}

fn bench_tokenizer_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    let source = "node 1 2 key=\"value\" { child #true; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("single_node", |b| {
        b.iter(|| token_count(black_box("node 1 2 3")))
    });

    group.bench_function("node_with_children", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_tokenizer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer_strings");

    let escaped = r#"node "line one\nline two\t\u{1F600}" "plain text value""#;
    let multiline = "node \"\"\"\n    Lorem ipsum dolor sit amet\n    consectetur adipiscing elit\n    \"\"\"";
    let raw = "node #\"C:\\Users\\nobody\"#";

    group.bench_function("escaped_strings", |b| {
        b.iter(|| token_count(black_box(escaped)))
    });

    group.bench_function("multiline_string", |b| {
        b.iter(|| token_count(black_box(multiline)))
    });

    group.bench_function("raw_string", |b| b.iter(|| token_count(black_box(raw))));

    group.finish();
}

fn bench_tokenizer_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer_document");

    // A config-shaped document with many nodes.
    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "service-{i} port={} host=\"10.0.0.{}\" {{\n    replica count={} /- disabled\n}}\n",
            8000 + i,
            i % 256,
            i % 7,
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("config_200_nodes", |b| {
        b.iter(|| token_count(black_box(&source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenizer_simple,
    bench_tokenizer_strings,
    bench_tokenizer_document
);
criterion_main!(benches);
