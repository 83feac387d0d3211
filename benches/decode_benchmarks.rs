//! Benchmarks for the two bit-exact hot paths: witness decoding and
//! compact-target arithmetic.

use ckb_explorer_core::config::ScriptConstants;
use ckb_explorer_core::{address, compact, witness};
use ckb_explorer_core::{HashType, Network, Script};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_witness_parsing(c: &mut Criterion) {
    let script = Script::new(
        ScriptConstants::default().secp_sighash,
        HashType::Type,
        vec![0x11; 20],
    );
    let witness_hex = hex::encode(witness::serialize_cellbase_witness(&script, b"bench"));

    c.bench_function("parse_cellbase_witness", |b| {
        b.iter(|| witness::parse_cellbase_witness(black_box(&witness_hex)).unwrap())
    });

    let constants = ScriptConstants::default();
    c.bench_function("encode_address", |b| {
        b.iter(|| address::encode_address(black_box(&script), Network::Mainnet, &constants))
    });
}

fn bench_compact_target(c: &mut Criterion) {
    c.bench_function("compact_to_target", |b| {
        b.iter(|| compact::compact_to_target(black_box(0x1a08_645a)))
    });

    c.bench_function("compact_to_difficulty", |b| {
        b.iter(|| compact::compact_to_difficulty(black_box(0x1a08_645a)))
    });
}

criterion_group!(benches, bench_witness_parsing, bench_compact_target);
criterion_main!(benches);
