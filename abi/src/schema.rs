//! # ABI Definitions
//!
//! The structured form of an ABI, the two fixed schemas the registry is
//! bootstrapped from, and conversion between binary and structured ABIs.
//!
//! The binary ABI format is itself described by an ABI (the `abi_def`
//! schema below), so decoding a contract's ABI is just another registry
//! pass over the ABI-of-ABIs.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::buffer::SerialBuffer;
use crate::codec::primitive::get_string;
use crate::config::{supported_abi_version, ABI_VERSION};
use crate::error::{SerializeError, SerializeResult};
use crate::types::TypeRegistry;

// ---------------------------------------------------------------------------
// Structured ABI
// ---------------------------------------------------------------------------

/// `new_type_name` is an alias for `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiTypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A struct declaration. An empty `base` means no base.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiStruct {
    pub name: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<AbiField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiAction {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiTable {
    pub name: String,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiClause {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiErrorMessage {
    /// uint64 on the wire; large codes decode as decimal strings.
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub error_code: u64,
    pub error_msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiExtension {
    pub tag: u16,
    /// Hex-encoded payload.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiVariant {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiActionResult {
    pub name: String,
    pub result_type: String,
}

/// A complete ABI. Every section but `version` may be omitted in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Abi {
    pub version: String,
    pub types: Vec<AbiTypeDef>,
    pub structs: Vec<AbiStruct>,
    pub actions: Vec<AbiAction>,
    pub tables: Vec<AbiTable>,
    pub ricardian_clauses: Vec<AbiClause>,
    pub error_messages: Vec<AbiErrorMessage>,
    pub abi_extensions: Vec<AbiExtension>,
    pub variants: Vec<AbiVariant>,
    pub action_results: Vec<AbiActionResult>,
}

fn u64_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Bootstrap schemas
// ---------------------------------------------------------------------------

fn alias(new_type_name: &str, ty: &str) -> AbiTypeDef {
    AbiTypeDef {
        new_type_name: new_type_name.into(),
        ty: ty.into(),
    }
}

fn structure(name: &str, base: &str, fields: &[(&str, &str)]) -> AbiStruct {
    AbiStruct {
        name: name.into(),
        base: base.into(),
        fields: fields
            .iter()
            .map(|(name, ty)| AbiField {
                name: (*name).into(),
                ty: (*ty).into(),
            })
            .collect(),
    }
}

/// The ABI-of-ABIs: describes the binary layout of `abi_def` itself.
pub fn abi_definition_schema() -> Abi {
    Abi {
        version: ABI_VERSION.into(),
        structs: vec![
            structure("extensions_entry", "", &[("tag", "uint16"), ("value", "bytes")]),
            structure("type_def", "", &[("new_type_name", "string"), ("type", "string")]),
            structure("field_def", "", &[("name", "string"), ("type", "string")]),
            structure(
                "struct_def",
                "",
                &[("name", "string"), ("base", "string"), ("fields", "field_def[]")],
            ),
            structure(
                "action_def",
                "",
                &[("name", "name"), ("type", "string"), ("ricardian_contract", "string")],
            ),
            structure(
                "table_def",
                "",
                &[
                    ("name", "name"),
                    ("index_type", "string"),
                    ("key_names", "string[]"),
                    ("key_types", "string[]"),
                    ("type", "string"),
                ],
            ),
            structure("clause_pair", "", &[("id", "string"), ("body", "string")]),
            structure(
                "error_message",
                "",
                &[("error_code", "uint64"), ("error_msg", "string")],
            ),
            structure("variant_def", "", &[("name", "string"), ("types", "string[]")]),
            structure(
                "action_result_def",
                "",
                &[("name", "name"), ("result_type", "string")],
            ),
            structure(
                "abi_def",
                "",
                &[
                    ("version", "string"),
                    ("types", "type_def[]"),
                    ("structs", "struct_def[]"),
                    ("actions", "action_def[]"),
                    ("tables", "table_def[]"),
                    ("ricardian_clauses", "clause_pair[]"),
                    ("error_messages", "error_message[]"),
                    ("abi_extensions", "extensions_entry[]"),
                    ("variants", "variant_def[]$"),
                    ("action_results", "action_result_def[]$"),
                ],
            ),
        ],
        ..Abi::default()
    }
}

/// Layout of `transaction` and the action envelope it carries.
pub fn transaction_schema() -> Abi {
    Abi {
        version: ABI_VERSION.into(),
        types: vec![
            alias("account_name", "name"),
            alias("action_name", "name"),
            alias("permission_name", "name"),
        ],
        structs: vec![
            structure(
                "permission_level",
                "",
                &[("actor", "account_name"), ("permission", "permission_name")],
            ),
            structure(
                "action",
                "",
                &[
                    ("account", "account_name"),
                    ("name", "action_name"),
                    ("authorization", "permission_level[]"),
                    ("data", "bytes"),
                ],
            ),
            structure("extension", "", &[("type", "uint16"), ("data", "bytes")]),
            structure(
                "transaction_header",
                "",
                &[
                    ("expiration", "time_point_sec"),
                    ("ref_block_num", "uint16"),
                    ("ref_block_prefix", "uint32"),
                    ("max_net_usage_words", "varuint32"),
                    ("max_cpu_usage_ms", "uint8"),
                    ("delay_sec", "varuint32"),
                ],
            ),
            structure(
                "transaction",
                "transaction_header",
                &[
                    ("context_free_actions", "action[]"),
                    ("actions", "action[]"),
                    ("transaction_extensions", "extension[]"),
                ],
            ),
        ],
        ..Abi::default()
    }
}

// ---------------------------------------------------------------------------
// Binary <-> structured
// ---------------------------------------------------------------------------

/// Decodes a binary ABI. `abi_types` must be the registry built from
/// [`abi_definition_schema`].
pub fn raw_abi_to_abi(abi_types: &TypeRegistry, raw: &[u8]) -> SerializeResult<Abi> {
    let mut buf = SerialBuffer::from_bytes(raw.to_vec());
    let version = get_string(&mut buf)?;
    if !supported_abi_version(&version) {
        return Err(SerializeError::UnsupportedAbiVersion(version));
    }
    buf.restart_read();
    let value = abi_types.deserialize(&mut buf, "abi_def")?;
    let abi: Abi =
        serde_json::from_value(value).map_err(|e| SerializeError::InvalidAbi(e.to_string()))?;
    debug!(
        version = %abi.version,
        structs = abi.structs.len(),
        actions = abi.actions.len(),
        "decoded binary abi"
    );
    Ok(abi)
}

/// Encodes a structured ABI into its binary form.
pub fn abi_to_raw(abi_types: &TypeRegistry, abi: &Abi) -> SerializeResult<Vec<u8>> {
    let value = serde_json::to_value(abi).map_err(|e| SerializeError::InvalidAbi(e.to_string()))?;
    abi_types.encode("abi_def", &value)
}
