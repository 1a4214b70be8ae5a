//! Wire-format regression fixtures.
//!
//! Byte vectors here are what a node expects on the wire. If one of these
//! changes, every transaction built by this crate changes with it, so treat
//! a failure as a compatibility break until proven otherwise.

use serde_json::{json, Value};

use antelope_abi::schema::{abi_definition_schema, AbiAction, AbiField, AbiStruct, AbiVariant};
use antelope_abi::config::MAX_VALUE_DEPTH;
use antelope_abi::{abi_to_raw, raw_abi_to_abi, Abi, Contract, SerializeError, TypeRegistry};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn encode_hex(registry: &TypeRegistry, ty: &str, value: Value) -> String {
    hex::encode_upper(registry.encode(ty, &value).unwrap())
}

fn round_trip(registry: &TypeRegistry, ty: &str, value: Value) -> Value {
    let bytes = registry.encode(ty, &value).unwrap();
    registry.decode_exact(ty, &bytes).unwrap()
}

fn fields(pairs: &[(&str, &str)]) -> Vec<AbiField> {
    pairs
        .iter()
        .map(|(name, ty)| AbiField {
            name: (*name).into(),
            ty: (*ty).into(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Builtin vectors
// ---------------------------------------------------------------------------

#[test]
fn exact_byte_vectors() {
    let r = TypeRegistry::new();
    assert_eq!(
        encode_hex(&r, "uint64", json!("18446744073709551615")),
        "FFFFFFFFFFFFFFFF"
    );
    assert_eq!(
        encode_hex(&r, "int64", json!("-90909090909090909")),
        "A38B82D9A906BDFE"
    );
    assert_eq!(encode_hex(&r, "name", json!("abcd")), "000000000090D031");
    assert_eq!(
        encode_hex(&r, "name", json!("zzzzzzzzzzzzz")),
        encode_hex(&r, "name", json!("zzzzzzzzzzzzj"))
    );
    assert_eq!(encode_hex(&r, "varuint32", json!(128)), "8001");
    assert_eq!(encode_hex(&r, "varint32", json!(-1)), "01");
    assert_eq!(encode_hex(&r, "float32", json!(0.125)), "0000003E");
    assert_eq!(
        encode_hex(&r, "time_point_sec", json!("1970-01-01T00:00:00.000")),
        "00000000"
    );
    assert_eq!(
        encode_hex(&r, "block_timestamp_type", json!("2000-01-01T00:00:00.500")),
        "01000000"
    );
    assert_eq!(
        encode_hex(&r, "time_point_sec", json!("2018-06-15T19:17:47.000")),
        "DB10245B"
    );
}

#[test]
fn builtin_round_trips() {
    let r = TypeRegistry::new();
    let cases = [
        ("bool", json!(false)),
        ("int8", json!(-5)),
        ("uint32", json!(4_000_000_000u32)),
        ("int64", json!(-9_007_199_254_740_991i64)),
        ("int64", json!("-9223372036854775808")),
        ("uint64", json!("18446744073709551615")),
        ("int128", json!("-170141183460469231731687303715884105728")),
        ("uint128", json!("340282366920938463463374607431768211455")),
        ("varint32", json!(-2_147_483_648i64)),
        ("varuint32", json!(4_294_967_295u32)),
        ("float64", json!(3.14159)),
        ("float64", json!(-0.0)),
        ("float64", json!("Infinity")),
        ("float32", json!(-0.5)),
        ("name", json!("abc.5")),
        ("name", json!("eosio.token")),
        ("bytes", json!("00FF10")),
        ("string", json!("žluťoučký kůň 🐎")),
        ("symbol", json!("4,SYS")),
        ("symbol_code", json!("EOS")),
        ("asset", json!("1.2345 SYS")),
        ("asset", json!("-0.0001 SYS")),
        ("asset", json!("100 NOPREC")),
        (
            "extended_asset",
            json!({ "quantity": "5.000 ABC", "contract": "token.abc" }),
        ),
        ("checksum160", json!("AB".repeat(20))),
        ("checksum256", json!("01".repeat(32))),
        ("checksum512", json!("FE".repeat(64))),
        ("float128", json!("00".repeat(15) + "80")),
        ("time_point", json!("2020-02-29T12:34:56.789")),
        ("time_point_sec", json!("2038-01-19T03:14:08.000")),
        ("block_timestamp_type", json!("2021-07-01T00:00:01.500")),
    ];
    for (ty, value) in cases {
        assert_eq!(round_trip(&r, ty, value.clone()), value, "type {ty}");
    }
}

#[test]
fn negative_zero_keeps_its_sign() {
    let r = TypeRegistry::new();
    assert_eq!(encode_hex(&r, "float32", json!(-0.0)), "00000080");
    let decoded = r.decode("float64", &(-0.0f64).to_le_bytes()).unwrap();
    assert!(decoded.as_f64().unwrap().is_sign_negative());
}

#[test]
fn range_enforcement() {
    let r = TypeRegistry::new();
    for (ty, value) in [
        ("uint8", json!(256)),
        ("uint8", json!(-1)),
        ("int128", json!("170141183460469231731687303715884105728")),
        ("varuint32", json!(-1)),
        ("varuint32", json!(4_294_967_296u64)),
        ("int16", json!(32_768)),
        ("uint64", json!("-1")),
    ] {
        assert!(
            matches!(
                r.encode(ty, &value),
                Err(SerializeError::OutOfRange { .. })
            ),
            "{ty} {value}"
        );
    }
}

#[test]
fn name_alphabet_enforcement() {
    let r = TypeRegistry::new();
    for bad in ["abc.57", "Alice", "alice!", "fourteenchars1"] {
        assert!(
            matches!(
                r.encode("name", &json!(bad)),
                Err(SerializeError::InvalidName(_))
            ),
            "{bad}"
        );
    }
}

#[test]
fn lenient_and_strict_fixed_width_decode() {
    let r = TypeRegistry::new();
    assert_eq!(r.decode("int8", &[0x80]).unwrap(), json!(-128));
    assert_eq!(r.decode("uint8", &[0x00, 0x01]).unwrap(), json!(0));
    assert_eq!(
        r.decode_exact("int8", &[0x7f, 0xff]),
        Err(SerializeError::TrailingBytes(1))
    );
    assert_eq!(
        r.decode_exact("uint8", &[0x00, 0x01]),
        Err(SerializeError::TrailingBytes(1))
    );
}

#[test]
fn truncated_input_is_a_decode_error() {
    let r = TypeRegistry::new();
    for (ty, bytes) in [
        ("uint32", vec![0x01, 0x02]),
        ("string", vec![0x05, b'a']),
        ("checksum256", vec![0u8; 31]),
        ("asset", vec![0u8; 15]),
    ] {
        assert!(
            matches!(r.decode(ty, &bytes), Err(SerializeError::ReadPastEnd { .. })),
            "{ty}"
        );
    }
}

// ---------------------------------------------------------------------------
// Transaction schema
// ---------------------------------------------------------------------------

#[test]
fn transaction_wire_layout() {
    let r = TypeRegistry::transactions().unwrap();
    let trx = json!({
        "expiration": "2018-06-15T19:17:47.000",
        "ref_block_num": 1234,
        "ref_block_prefix": 5678,
        "max_net_usage_words": 0,
        "max_cpu_usage_ms": 0,
        "delay_sec": 0,
        "context_free_actions": [],
        "actions": [{
            "account": "eosio.token",
            "name": "transfer",
            "authorization": [{ "actor": "alice", "permission": "active" }],
            "data": "0102",
        }],
        "transaction_extensions": [],
    });
    let expected = concat!(
        "DB10245B",
        "D204",
        "2E160000",
        "000000",
        "00",
        "01",
        "00A6823403EA3055",
        "000000572D3CCDCD",
        "01",
        "0000000000855C34",
        "00000000A8ED3232",
        "020102",
        "00",
    );
    assert_eq!(encode_hex(&r, "transaction", trx.clone()), expected);
    assert_eq!(round_trip(&r, "transaction", trx.clone()), trx);
}

#[test]
fn transaction_header_alone() {
    let r = TypeRegistry::transactions().unwrap();
    let header = json!({
        "expiration": "2018-06-15T19:17:47.000",
        "ref_block_num": 1234,
        "ref_block_prefix": 5678,
        "max_net_usage_words": 300,
        "max_cpu_usage_ms": 255,
        "delay_sec": 0,
    });
    assert_eq!(
        encode_hex(&r, "transaction_header", header),
        "DB10245BD2042E160000AC02FF00"
    );
}

// ---------------------------------------------------------------------------
// ABI bootstrap and contracts
// ---------------------------------------------------------------------------

fn game_abi() -> Abi {
    Abi {
        version: "eosio::abi/1.2".into(),
        structs: vec![
            AbiStruct {
                name: "player".into(),
                base: String::new(),
                fields: fields(&[("account", "name"), ("score", "uint64"), ("team", "team?")]),
            },
            AbiStruct {
                name: "team".into(),
                base: String::new(),
                fields: fields(&[("name", "string"), ("members", "player[]")]),
            },
            AbiStruct {
                name: "move".into(),
                base: "player".into(),
                fields: fields(&[("position", "position"), ("note", "string$")]),
            },
        ],
        variants: vec![AbiVariant {
            name: "position".into(),
            types: vec!["uint8".into(), "string".into(), "player".into()],
        }],
        actions: vec![AbiAction {
            name: "move".into(),
            ty: "move".into(),
            ricardian_contract: String::new(),
        }],
        ..Abi::default()
    }
}

#[test]
fn mutually_recursive_contract_types() {
    let contract = Contract::from_abi(&game_abi()).unwrap();
    let data = json!({
        "account": "alice",
        "score": "18446744073709551615",
        "team": {
            "name": "red",
            "members": [{ "account": "bob", "score": 1, "team": null }],
        },
        "position": ["player", { "account": "carol", "score": 0, "team": null }],
        "note": "gg",
    });
    let bytes = contract.serialize_action_data("game", "move", &data).unwrap();
    let decoded = contract.deserialize_action_data("game", "move", &bytes).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn trailing_extension_is_optional_in_action_data() {
    let contract = Contract::from_abi(&game_abi()).unwrap();
    let data = json!({
        "account": "alice",
        "score": 7,
        "team": null,
        "position": ["uint8", 3],
    });
    let bytes = contract.serialize_action_data("game", "move", &data).unwrap();
    assert_eq!(
        contract.deserialize_action_data("game", "move", &bytes).unwrap(),
        data
    );
}

#[test]
fn binary_abi_round_trip_through_schema() {
    let abi_types = TypeRegistry::abi_definitions().unwrap();
    let raw = abi_to_raw(&abi_types, &game_abi()).unwrap();
    let parsed = raw_abi_to_abi(&abi_types, &raw).unwrap();
    assert_eq!(parsed, game_abi());

    let contract = Contract::from_abi(&parsed).unwrap();
    assert_eq!(contract.action_type("move"), Some("move"));
}

#[test]
fn abi_of_abis_describes_itself() {
    let abi_types = TypeRegistry::abi_definitions().unwrap();
    let schema = abi_definition_schema();
    let raw = abi_to_raw(&abi_types, &schema).unwrap();
    assert_eq!(raw_abi_to_abi(&abi_types, &raw).unwrap(), schema);
}

#[test]
fn unsupported_abi_version() {
    let abi_types = TypeRegistry::abi_definitions().unwrap();
    let mut abi = game_abi();
    abi.version = "eosio::abi/9.0".into();
    let raw = abi_to_raw(&abi_types, &abi).unwrap();
    assert_eq!(
        raw_abi_to_abi(&abi_types, &raw),
        Err(SerializeError::UnsupportedAbiVersion("eosio::abi/9.0".into()))
    );
}

// ---------------------------------------------------------------------------
// Nesting limits
// ---------------------------------------------------------------------------

fn linked_list() -> TypeRegistry {
    TypeRegistry::from_abi(&Abi {
        version: "eosio::abi/1.1".into(),
        structs: vec![AbiStruct {
            name: "node".into(),
            base: String::new(),
            fields: fields(&[("next", "node?")]),
        }],
        ..Abi::default()
    })
    .unwrap()
}

fn chain_of(links: usize) -> Value {
    let mut value = json!({ "next": null });
    for _ in 0..links {
        value = json!({ "next": value });
    }
    value
}

#[test]
fn short_recursive_chain_round_trips() {
    let r = linked_list();
    let mut bytes = vec![1u8; 10];
    bytes.push(0);
    let decoded = r.decode_exact("node", &bytes).unwrap();
    assert_eq!(decoded, chain_of(10));
    assert_eq!(r.encode("node", &decoded).unwrap(), bytes);
}

#[test]
fn long_recursive_chain_is_rejected_on_decode() {
    let r = linked_list();
    let mut bytes = vec![1u8; 20_000];
    bytes.push(0);
    assert_eq!(
        r.decode("node", &bytes),
        Err(SerializeError::TooDeep {
            limit: MAX_VALUE_DEPTH
        })
    );
}

#[test]
fn long_recursive_chain_is_rejected_on_encode() {
    let r = linked_list();
    assert_eq!(
        r.encode("node", &chain_of(1_000)),
        Err(SerializeError::TooDeep {
            limit: MAX_VALUE_DEPTH
        })
    );
}

#[test]
fn sibling_values_do_not_accumulate_depth() {
    let r = linked_list();
    // varuint32 200, then 200 empty nodes
    let mut bytes = vec![0xC8, 0x01];
    bytes.extend(std::iter::repeat(0u8).take(200));
    let decoded = r.decode_exact("node[]", &bytes).unwrap();
    assert_eq!(decoded.as_array().map(Vec::len), Some(200));
    assert_eq!(r.encode("node[]", &decoded).unwrap(), bytes);
}
