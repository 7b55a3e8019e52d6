#![allow(unused)]
extern crate cellscope;

use cellscope::{
    disassembler::{disassemble, flatten_program, StackContext},
    Boc, Cell, CellBuilder,
};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::{hint::black_box, sync::Arc};

/// A chain of `depth` cells, each `PUSHINT_4 1; ADD; CALLREF` into the next.
fn build_chain(depth: usize) -> Arc<Cell> {
    let mut builder = CellBuilder::new();
    builder.store_uint(0xDB30, 16).unwrap();
    let mut cell = builder.build().unwrap();

    for _ in 0..depth {
        let mut builder = CellBuilder::new();
        builder
            .store_uint(0x71A0, 16)
            .unwrap()
            .store_uint(0xDB3C, 16)
            .unwrap()
            .store_ref(cell)
            .unwrap();
        cell = builder.build().unwrap();
    }
    cell
}

/// A single cell packed with simple stack and arithmetic instructions.
fn build_flat() -> Arc<Cell> {
    let mut builder = CellBuilder::new();
    for _ in 0..63 {
        builder.store_uint(0x71A0, 16).unwrap();
    }
    builder.build().unwrap()
}

fn bench_disassemble(c: &mut Criterion) {
    let flat = build_flat();
    let chain = build_chain(64);

    let mut group = c.benchmark_group("disassemble");
    group.throughput(Throughput::Elements(126));
    group.bench_function("flat_cell", |b| {
        b.iter(|| black_box(disassemble(black_box(&flat)).unwrap()));
    });
    group.throughput(Throughput::Elements(64 * 3 + 1));
    group.bench_function("ref_chain_64", |b| {
        b.iter(|| black_box(disassemble(black_box(&chain)).unwrap()));
    });
    group.finish();

    let program = disassemble(&chain).unwrap();
    c.bench_function("flatten/ref_chain_64", |b| {
        b.iter(|| black_box(flatten_program(black_box(&program), &StackContext::entry())));
    });
}

fn bench_boc(c: &mut Criterion) {
    // Root: NOP; PUSHINT_4 1
    let data = [
        0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00, 0x04, 0x00,
        0x71,
    ];

    let mut group = c.benchmark_group("boc");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("from_slice", |b| {
        b.iter(|| black_box(Boc::from_slice(black_box(&data)).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_disassemble, bench_boc);
criterion_main!(benches);
