// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

// Signing & verification benchmarks for the ledger driver.
//
// Covers canonical serialization, condition URI derivation, transaction
// signing and verification, and signing at various input counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use ledger_driver::crypto::keys::Ed25519Keypair;
use ledger_driver::transaction::{
    ed25519_condition, make_create_transaction, make_ed25519_condition, make_output,
    make_threshold_condition, serialize_transaction_into_canonical_string, sign_transaction,
    verify_transaction, Transaction,
};

fn sample_create(keypair: &Ed25519Keypair, issuers: usize) -> Transaction {
    let output =
        make_output(make_ed25519_condition(&keypair.public_key()).unwrap(), Some("1000")).unwrap();
    let issuers = vec![keypair.public_key(); issuers];
    make_create_transaction(
        Some(json!({ "bicycle": { "serial": "abcd1234", "manufacturer": "bkfab" } })),
        Some(json!({ "planet": "earth" })),
        vec![output],
        &issuers,
    )
}

fn bench_canonical_serialization(c: &mut Criterion) {
    let keypair = Ed25519Keypair::generate();
    let tx = sample_create(&keypair, 1);

    c.bench_function("canonical/serialize_transaction", |b| {
        b.iter(|| serialize_transaction_into_canonical_string(&tx).unwrap());
    });
}

fn bench_threshold_condition(c: &mut Criterion) {
    let keys: Vec<String> = (0..5)
        .map(|_| Ed25519Keypair::generate().public_key())
        .collect();

    c.bench_function("condition/threshold_3_of_5", |b| {
        b.iter(|| {
            let subs = keys
                .iter()
                .map(|k| ed25519_condition(k).unwrap())
                .collect();
            make_threshold_condition(3, subs).unwrap()
        });
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let keypair = Ed25519Keypair::generate();
    let tx = sample_create(&keypair, 1);
    let private_key = keypair.private_key();

    c.bench_function("transaction/sign", |b| {
        b.iter(|| sign_transaction(&tx, &[private_key.as_str()]).unwrap());
    });
}

fn bench_verify_transaction(c: &mut Criterion) {
    let keypair = Ed25519Keypair::generate();
    let private_key = keypair.private_key();
    let signed = sign_transaction(&sample_create(&keypair, 1), &[private_key.as_str()]).unwrap();

    c.bench_function("transaction/verify", |b| {
        b.iter(|| verify_transaction(&signed).unwrap());
    });
}

fn bench_sign_many_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/sign_inputs");
    let keypair = Ed25519Keypair::generate();
    let private_key = keypair.private_key();

    for size in [1, 10, 50] {
        let tx = sample_create(&keypair, size);
        let keys = vec![private_key.as_str(); size];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tx, |b, tx| {
            b.iter(|| sign_transaction(tx, &keys).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_canonical_serialization,
    bench_threshold_condition,
    bench_sign_transaction,
    bench_verify_transaction,
    bench_sign_many_inputs,
);
criterion_main!(benches);
