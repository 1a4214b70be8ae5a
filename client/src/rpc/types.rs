//! # Chain API Payloads
//!
//! Request and response shapes for the handful of node endpoints the
//! transaction lifecycle depends on, plus the argument bundles passed to
//! the signing and authority collaborators.
//!
//! | Endpoint                                 | Used for                          |
//! |------------------------------------------|-----------------------------------|
//! | `/v1/chain/get_info`                     | head block, chain id, version     |
//! | `/v1/chain/get_block_header_state`       | TAPOS reference block             |
//! | `/v1/chain/get_raw_abi`                  | contract schemas                  |
//! | `/v1/chain/get_required_keys`            | signing key selection             |
//! | `/v1/chain/push_transaction`             | legacy broadcast                  |
//! | `/v1/chain/send_transaction`             | legacy broadcast                  |
//! | `/v1/chain/send_transaction2`            | default and retry broadcast       |
//! | `/v1/chain/send_read_only_transaction`   | read-only execution               |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use antelope_abi::codec::bytes_to_hex;

// ---------------------------------------------------------------------------
// Node info and blocks
// ---------------------------------------------------------------------------

/// Subset of `get_info` the controller reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetInfoResult {
    #[serde(default)]
    pub server_version: String,
    pub chain_id: String,
    pub head_block_num: u32,
    #[serde(default)]
    pub last_irreversible_block_num: u32,
    #[serde(default)]
    pub head_block_id: String,
    #[serde(default)]
    pub head_block_time: String,
    /// Human-readable release, e.g. `v4.0.1`. Absent on very old nodes.
    #[serde(default)]
    pub server_version_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    pub timestamp: String,
    #[serde(default)]
    pub producer: String,
}

/// Reference block data for TAPOS. Header-state responses nest the
/// timestamp under `header`; block responses carry it at the top level
/// together with an explicit `ref_block_prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeaderState {
    pub block_num: u32,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<BlockHeader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_prefix: Option<u32>,
}

impl BlockHeaderState {
    /// The block time, wherever the node put it.
    pub fn block_time(&self) -> Option<&str> {
        self.header
            .as_ref()
            .map(|h| h.timestamp.as_str())
            .or(self.timestamp.as_deref())
    }
}

// ---------------------------------------------------------------------------
// ABIs
// ---------------------------------------------------------------------------

/// `get_raw_abi` response with the ABI already decoded from base64.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetRawAbiResult {
    pub account_name: String,
    #[serde(default)]
    pub code_hash: String,
    #[serde(default)]
    pub abi_hash: String,
    pub abi: Vec<u8>,
}

/// A binary ABI handed to the signer so it can render what it signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryAbi {
    pub account_name: String,
    pub abi: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Input to [`super::AuthorityProvider::get_required_keys`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorityProviderArgs {
    /// The transaction with actions already serialized.
    pub transaction: Value,
    pub available_keys: Vec<String>,
}

/// Input to [`super::SignatureProvider::sign`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureProviderArgs {
    pub chain_id: String,
    pub required_keys: Vec<String>,
    pub serialized_transaction: Vec<u8>,
    pub serialized_context_free_data: Option<Vec<u8>>,
    pub abis: Vec<BinaryAbi>,
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// A serialized transaction with whatever signatures it has collected.
/// This is what `transact` returns when broadcasting is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushTransactionArgs {
    pub signatures: Vec<String>,
    pub serialized_transaction: Vec<u8>,
    pub serialized_context_free_data: Option<Vec<u8>>,
}

/// Wire shape of a transaction on the push/send endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackedTransaction {
    pub signatures: Vec<String>,
    /// Always 0: packed transactions are sent uncompressed.
    pub compression: u8,
    pub packed_context_free_data: String,
    pub packed_trx: String,
}

impl From<&PushTransactionArgs> for PackedTransaction {
    fn from(args: &PushTransactionArgs) -> Self {
        Self {
            signatures: args.signatures.clone(),
            compression: 0,
            packed_context_free_data: args
                .serialized_context_free_data
                .as_deref()
                .map(bytes_to_hex)
                .unwrap_or_default(),
            packed_trx: bytes_to_hex(&args.serialized_transaction),
        }
    }
}

impl From<PushTransactionArgs> for PackedTransaction {
    fn from(args: PushTransactionArgs) -> Self {
        Self::from(&args)
    }
}

/// Arguments to `send_transaction2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransaction2Args {
    pub return_failure_trace: bool,
    pub retry_trx: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_trx_num_blocks: Option<u32>,
    pub transaction: PackedTransaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_packed_transaction_from_args() {
        let args = PushTransactionArgs {
            signatures: vec!["SIG_K1_test".into()],
            serialized_transaction: vec![0xde, 0xad],
            serialized_context_free_data: None,
        };
        let packed = PackedTransaction::from(&args);
        assert_eq!(packed.packed_trx, "DEAD");
        assert_eq!(packed.packed_context_free_data, "");
        assert_eq!(packed.compression, 0);
        assert_eq!(packed.signatures, args.signatures);
    }

    #[test]
    fn test_send_transaction2_omits_absent_block_count() {
        let args = SendTransaction2Args {
            return_failure_trace: true,
            retry_trx: false,
            retry_trx_num_blocks: None,
            transaction: PackedTransaction::default(),
        };
        let value = serde_json::to_value(&args).unwrap();
        assert!(value.get("retry_trx_num_blocks").is_none());
        assert_eq!(value["retry_trx"], json!(false));
    }

    #[test]
    fn test_block_time_prefers_header() {
        let state: BlockHeaderState = serde_json::from_value(json!({
            "block_num": 10,
            "id": "0000000a00000000",
            "header": { "timestamp": "2026-10-18T12:00:00.000" },
        }))
        .unwrap();
        assert_eq!(state.block_time(), Some("2026-10-18T12:00:00.000"));

        let block = BlockHeaderState {
            timestamp: Some("2026-10-18T12:00:00.500".into()),
            ..BlockHeaderState::default()
        };
        assert_eq!(block.block_time(), Some("2026-10-18T12:00:00.500"));
    }

    #[test]
    fn test_get_info_tolerates_missing_optionals() {
        let info: GetInfoResult = serde_json::from_value(json!({
            "chain_id": "aa",
            "head_block_num": 100,
        }))
        .unwrap();
        assert_eq!(info.server_version_string, None);
        assert_eq!(info.head_block_num, 100);
    }
}
