//! Generation benchmarks over the bundled protocol schema.

use amp_codegen::Generator;
use amp_schema::{ProtocolIr, Schema, parse_schema};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const TRANSPORT: &str = include_str!("../../amp-protocol/schema/transport.xml");
const MESSAGING: &str = include_str!("../../amp-protocol/schema/messaging.xml");

fn merged_schema() -> Schema {
    let transport = parse_schema(TRANSPORT).expect("transport schema");
    let messaging = parse_schema(MESSAGING).expect("messaging schema");
    Schema::merge([transport, messaging])
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse_transport", |b| {
        b.iter(|| parse_schema(black_box(TRANSPORT)))
    });
}

fn benchmark_resolve(c: &mut Criterion) {
    let schema = merged_schema();

    c.bench_function("resolve_protocol", |b| {
        b.iter(|| ProtocolIr::from_schema(black_box(&schema)))
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let ir = ProtocolIr::from_schema(&merged_schema()).expect("resolved protocol");

    c.bench_function("generate_artifacts", |b| {
        b.iter(|| Generator::new(black_box(&ir)).generate())
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_resolve,
    benchmark_generate
);
criterion_main!(benches);
