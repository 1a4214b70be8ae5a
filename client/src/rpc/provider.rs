//! Collaborator traits.
//!
//! The controller never performs I/O itself. Transport, ABI lookup, key
//! selection and signing are injected as trait objects, so the same
//! controller runs against a live node, a test double, or a hardware
//! signer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiResult;

use super::types::{
    AuthorityProviderArgs, BlockHeaderState, GetInfoResult, GetRawAbiResult, PackedTransaction,
    PushTransactionArgs, SendTransaction2Args, SignatureProviderArgs,
};

/// The node endpoints used by the transaction lifecycle.
///
/// Broadcast methods return the node's JSON verbatim. Implementations
/// should map node-side failures to [`crate::ApiError::Rpc`].
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn get_info(&self) -> ApiResult<GetInfoResult>;

    async fn get_block_header_state(&self, block_num: u32) -> ApiResult<BlockHeaderState>;

    async fn push_transaction(&self, transaction: PackedTransaction) -> ApiResult<Value>;

    async fn send_transaction(&self, transaction: PackedTransaction) -> ApiResult<Value>;

    async fn send_transaction2(&self, args: SendTransaction2Args) -> ApiResult<Value>;

    async fn send_readonly_transaction(&self, transaction: PackedTransaction) -> ApiResult<Value>;
}

/// Source of binary contract ABIs.
#[async_trait]
pub trait AbiProvider: Send + Sync {
    async fn get_raw_abi(&self, account_name: &str) -> ApiResult<GetRawAbiResult>;
}

/// Decides which keys must sign a transaction.
#[async_trait]
pub trait AuthorityProvider: Send + Sync {
    async fn get_required_keys(&self, args: AuthorityProviderArgs) -> ApiResult<Vec<String>>;
}

/// Holds keys and produces signatures.
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    /// Public keys this provider can sign with.
    async fn get_available_keys(&self) -> ApiResult<Vec<String>>;

    /// Signs the serialized transaction, returning it with signatures attached.
    async fn sign(&self, args: SignatureProviderArgs) -> ApiResult<PushTransactionArgs>;
}
