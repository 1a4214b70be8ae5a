// Serialization throughput benchmarks for the ABI codec.
//
// Covers name packing, transaction encode/decode through the bootstrap
// schema, action data through a contract schema, and binary ABI parsing.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use antelope_abi::codec::Name;
use antelope_abi::schema::{AbiAction, AbiField, AbiStruct};
use antelope_abi::{abi_to_raw, raw_abi_to_abi, Abi, Contract, TypeRegistry};

fn token_abi() -> Abi {
    Abi {
        version: "eosio::abi/1.1".into(),
        structs: vec![AbiStruct {
            name: "transfer".into(),
            base: String::new(),
            fields: [
                ("from", "name"),
                ("to", "name"),
                ("quantity", "asset"),
                ("memo", "string"),
            ]
            .iter()
            .map(|(name, ty)| AbiField {
                name: (*name).into(),
                ty: (*ty).into(),
            })
            .collect(),
        }],
        actions: vec![AbiAction {
            name: "transfer".into(),
            ty: "transfer".into(),
            ricardian_contract: String::new(),
        }],
        ..Abi::default()
    }
}

fn transaction_with(actions: usize) -> Value {
    let action = json!({
        "account": "eosio.token",
        "name": "transfer",
        "authorization": [{ "actor": "alice", "permission": "active" }],
        "data": "0000000000855C340000000000000E3D102700000000000004535953000000000474657374",
    });
    json!({
        "expiration": "2026-10-18T12:00:30.000",
        "ref_block_num": 4242,
        "ref_block_prefix": 3_735_928_559u32,
        "max_net_usage_words": 0,
        "max_cpu_usage_ms": 0,
        "delay_sec": 0,
        "context_free_actions": [],
        "actions": vec![action; actions],
        "transaction_extensions": [],
    })
}

fn bench_name_packing(c: &mut Criterion) {
    c.bench_function("name/parse", |b| {
        b.iter(|| Name::parse("eosio.token"));
    });
    let name = Name::parse("eosio.token").unwrap_or_default();
    c.bench_function("name/display", |b| {
        b.iter(|| name.to_string());
    });
}

fn bench_transaction_serialize(c: &mut Criterion) {
    let registry = TypeRegistry::transactions().unwrap();
    let mut group = c.benchmark_group("transaction/serialize");

    for actions in [1usize, 10, 100] {
        let trx = transaction_with(actions);
        group.throughput(Throughput::Elements(actions as u64));
        group.bench_with_input(BenchmarkId::from_parameter(actions), &trx, |b, trx| {
            b.iter(|| registry.encode("transaction", trx));
        });
    }
    group.finish();
}

fn bench_transaction_deserialize(c: &mut Criterion) {
    let registry = TypeRegistry::transactions().unwrap();
    let mut group = c.benchmark_group("transaction/deserialize");

    for actions in [1usize, 10, 100] {
        let bytes = registry
            .encode("transaction", &transaction_with(actions))
            .unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(actions), &bytes, |b, bytes| {
            b.iter(|| registry.decode_exact("transaction", bytes));
        });
    }
    group.finish();
}

fn bench_action_data(c: &mut Criterion) {
    let contract = Contract::from_abi(&token_abi()).unwrap();
    let data = json!({
        "from": "alice",
        "to": "bob",
        "quantity": "1.0000 SYS",
        "memo": "test",
    });

    c.bench_function("action/serialize_transfer", |b| {
        b.iter(|| contract.serialize_action_data("eosio.token", "transfer", &data));
    });

    let bytes = contract
        .serialize_action_data("eosio.token", "transfer", &data)
        .unwrap();
    c.bench_function("action/deserialize_transfer", |b| {
        b.iter(|| contract.deserialize_action_data("eosio.token", "transfer", &bytes));
    });
}

fn bench_raw_abi(c: &mut Criterion) {
    let abi_types = TypeRegistry::abi_definitions().unwrap();
    let raw = abi_to_raw(&abi_types, &token_abi()).unwrap();

    c.bench_function("abi/raw_to_abi", |b| {
        b.iter(|| raw_abi_to_abi(&abi_types, &raw));
    });
    c.bench_function("abi/contract_from_abi", |b| {
        let abi = token_abi();
        b.iter(|| Contract::from_abi(&abi));
    });
}

criterion_group!(
    benches,
    bench_name_packing,
    bench_transaction_serialize,
    bench_transaction_deserialize,
    bench_action_data,
    bench_raw_abi,
);
criterion_main!(benches);
