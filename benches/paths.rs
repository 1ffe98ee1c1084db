//! Benchmarks for object path text handling.
//!
//! Tests parsing and serialization performance for typical object paths:
//! - Single string key
//! - Multiple mixed keys with a host prefix
//! - Association paths with nested reference keys

extern crate cimscope;

use cimscope::{codec::path, model::ObjectPath};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Benchmark parsing a path with one quoted key.
/// Path: root/cimv2:CIM_LogicalDisk.DeviceID="C:"
fn bench_parse_single_key(c: &mut Criterion) {
    let text = r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:""#;

    c.bench_function("path_parse_single_key", |b| {
        b.iter(|| {
            let path = path::parse(black_box(text)).unwrap();
            black_box(path)
        });
    });
}

/// Benchmark parsing a path with a host and mixed key kinds.
fn bench_parse_mixed_keys(c: &mut Criterion) {
    let text = r#"//server.example/root/cimv2:CIM_DiskPartition.DeviceID="Disk #0, Partition #1",Index=1,Bootable=TRUE,Offset=-512"#;

    c.bench_function("path_parse_mixed_keys", |b| {
        b.iter(|| {
            let path = path::parse(black_box(text)).unwrap();
            black_box(path)
        });
    });
}

fn association_path() -> ObjectPath {
    let system = ObjectPath::new("root/cimv2", "CIM_ComputerSystem")
        .with_key("CreationClassName", "CIM_ComputerSystem")
        .with_key("Name", "host1.example");
    let disk = ObjectPath::new("root/cimv2", "CIM_LogicalDisk")
        .with_key("CreationClassName", "CIM_LogicalDisk")
        .with_key("DeviceID", "C:")
        .with_key("SystemName", "host1.example");
    ObjectPath::new("root/cimv2", "CIM_SystemDevice")
        .with_key("GroupComponent", system)
        .with_key("PartComponent", disk)
}

/// Benchmark parsing an association path, its reference keys escaped twice.
fn bench_parse_association(c: &mut Criterion) {
    let text = path::serialize(&association_path());

    c.bench_function("path_parse_association", |b| {
        b.iter(|| {
            let path = path::parse(black_box(&text)).unwrap();
            black_box(path)
        });
    });
}

/// Benchmark serializing an association path.
fn bench_serialize_association(c: &mut Criterion) {
    let path = association_path();

    c.bench_function("path_serialize_association", |b| {
        b.iter(|| {
            let text = path::serialize(black_box(&path));
            black_box(text)
        });
    });
}

criterion_group!(
    benches,
    bench_parse_single_key,
    bench_parse_mixed_keys,
    bench_parse_association,
    bench_serialize_association
);
criterion_main!(benches);
