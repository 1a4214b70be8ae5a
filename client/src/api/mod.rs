//! # Transaction Controller
//!
//! [`Api`] ties the codec to the outside world. It fetches and caches
//! contract ABIs, turns structured actions into wire bytes and back, and
//! drives [`Api::transact`] through TAPOS, signing and broadcast.
//!
//! ```text
//!   Transaction ──► TAPOS header ──► ABIs ──► serialize ──► sign ──► broadcast
//!                   (ChainRpc)     (AbiProvider)        (Authority/Signature)
//! ```
//!
//! Every collaborator is an injected trait object. The controller holds no
//! per-transaction state; node info is fetched at most once per call.

pub mod cache;
mod transact;

pub use cache::{AbiCache, CachedAbi};
pub use transact::TransactResult;

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, trace};

use antelope_abi::codec::{bytes_to_hex, hex_to_bytes, push_bytes, push_varuint32};
use antelope_abi::{raw_abi_to_abi, Abi, Contract, SerialBuffer, SerializeError, TypeRegistry};

use crate::config::{DEFAULT_DELAY_SEC, DEFAULT_MAX_CPU_USAGE_MS, DEFAULT_MAX_NET_USAGE_WORDS};
use crate::error::{ApiError, ApiResult};
use crate::rpc::{AbiProvider, AuthorityProvider, BinaryAbi, ChainRpc, SignatureProvider};
use crate::transaction::{Action, SerializedAction, Transaction};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Collaborators and fixed settings for an [`Api`].
#[derive(Clone)]
pub struct ApiOptions {
    pub rpc: Arc<dyn ChainRpc>,
    pub abi_provider: Arc<dyn AbiProvider>,
    pub authority_provider: Arc<dyn AuthorityProvider>,
    pub signature_provider: Arc<dyn SignatureProvider>,
    /// Chain to sign for. When unset it is read from `get_info` per call.
    pub chain_id: Option<String>,
}

impl ApiOptions {
    /// Uses one node client for RPC, ABI lookup and key selection.
    pub fn from_node<N>(node: Arc<N>, signature_provider: Arc<dyn SignatureProvider>) -> Self
    where
        N: ChainRpc + AbiProvider + AuthorityProvider + 'static,
    {
        Self {
            rpc: node.clone(),
            abi_provider: node.clone(),
            authority_provider: node,
            signature_provider,
            chain_id: None,
        }
    }

    pub fn abi_provider(mut self, provider: Arc<dyn AbiProvider>) -> Self {
        self.abi_provider = provider;
        self
    }

    pub fn authority_provider(mut self, provider: Arc<dyn AuthorityProvider>) -> Self {
        self.authority_provider = provider;
        self
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

/// A serialized transaction given either as bytes or as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTransaction<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
}

impl<'a> From<&'a [u8]> for RawTransaction<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for RawTransaction<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for RawTransaction<'a> {
    fn from(hex: &'a str) -> Self {
        Self::Hex(hex)
    }
}

// ---------------------------------------------------------------------------
// Api
// ---------------------------------------------------------------------------

pub struct Api {
    rpc: Arc<dyn ChainRpc>,
    abi_provider: Arc<dyn AbiProvider>,
    authority_provider: Arc<dyn AuthorityProvider>,
    signature_provider: Arc<dyn SignatureProvider>,
    chain_id: Option<String>,
    abi_types: TypeRegistry,
    transaction_types: TypeRegistry,
    cache: AbiCache,
}

impl Api {
    pub fn new(options: ApiOptions) -> ApiResult<Self> {
        Ok(Self {
            rpc: options.rpc,
            abi_provider: options.abi_provider,
            authority_provider: options.authority_provider,
            signature_provider: options.signature_provider,
            chain_id: options.chain_id,
            abi_types: TypeRegistry::abi_definitions()?,
            transaction_types: TypeRegistry::transactions()?,
            cache: AbiCache::new(),
        })
    }

    /// The configured chain id, if any.
    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    /// Registry that decodes binary ABIs.
    pub fn abi_types(&self) -> &TypeRegistry {
        &self.abi_types
    }

    /// Registry for `transaction` and its parts.
    pub fn transaction_types(&self) -> &TypeRegistry {
        &self.transaction_types
    }

    pub fn cache(&self) -> &AbiCache {
        &self.cache
    }

    // -----------------------------------------------------------------------
    // ABIs and contracts
    // -----------------------------------------------------------------------

    /// Fetches (or reuses) `account`'s ABI. `reload` forces a fetch.
    pub async fn get_cached_abi(&self, account: &str, reload: bool) -> ApiResult<Arc<CachedAbi>> {
        if !reload {
            if let Some(cached) = self.cache.abi(account) {
                trace!(account, "abi cache hit");
                return Ok(cached);
            }
        }

        let fetched = self.fetch_abi(account).await.map_err(|e| ApiError::AbiFetch {
            account: account.to_string(),
            source: Box::new(e),
        })?;
        debug!(account, bytes = fetched.raw_abi.len(), "cached contract abi");
        Ok(self.cache.insert_abi(account, fetched))
    }

    async fn fetch_abi(&self, account: &str) -> ApiResult<CachedAbi> {
        let raw = self.abi_provider.get_raw_abi(account).await?;
        let abi = raw_abi_to_abi(&self.abi_types, &raw.abi)?;
        Ok(CachedAbi {
            raw_abi: raw.abi,
            abi,
        })
    }

    /// The parsed ABI of `account`.
    pub async fn get_abi(&self, account: &str, reload: bool) -> ApiResult<Abi> {
        Ok(self.get_cached_abi(account, reload).await?.abi.clone())
    }

    /// Binary ABIs of every contract the transaction touches, one per
    /// account, fetched concurrently.
    pub async fn get_transaction_abis(
        &self,
        transaction: &Transaction,
        reload: bool,
    ) -> ApiResult<Vec<BinaryAbi>> {
        try_join_all(transaction.accounts().into_iter().map(|account| async move {
            let cached = self.get_cached_abi(account, reload).await?;
            Ok::<_, ApiError>(BinaryAbi {
                account_name: account.to_string(),
                abi: cached.raw_abi.clone(),
            })
        }))
        .await
    }

    /// The action schema of `account`.
    pub async fn get_contract(&self, account: &str, reload: bool) -> ApiResult<Arc<Contract>> {
        if !reload {
            if let Some(contract) = self.cache.contract(account) {
                return Ok(contract);
            }
        }
        let cached = self.get_cached_abi(account, reload).await?;
        let contract = Contract::from_abi(&cached.abi)?;
        Ok(self.cache.insert_contract(account, contract))
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    async fn serialize_action(&self, action: &Action) -> ApiResult<SerializedAction> {
        let contract = self.get_contract(&action.account, false).await?;
        let data = match &action.data {
            // Already encoded.
            Value::String(hex) => bytes_to_hex(&hex_to_bytes(hex)?),
            data => bytes_to_hex(&contract.serialize_action_data(
                &action.account,
                &action.name,
                data,
            )?),
        };
        Ok(SerializedAction {
            account: action.account.clone(),
            name: action.name.clone(),
            authorization: action.authorization.clone(),
            data,
        })
    }

    /// Encodes each action's data with its contract's ABI.
    pub async fn serialize_actions(&self, actions: &[Action]) -> ApiResult<Vec<SerializedAction>> {
        try_join_all(actions.iter().map(|action| self.serialize_action(action))).await
    }

    async fn deserialize_action(&self, action: &SerializedAction) -> ApiResult<Action> {
        let contract = self.get_contract(&action.account, false).await?;
        let data = contract.deserialize_action_data(
            &action.account,
            &action.name,
            &hex_to_bytes(&action.data)?,
        )?;
        Ok(Action {
            account: action.account.clone(),
            name: action.name.clone(),
            authorization: action.authorization.clone(),
            data,
        })
    }

    /// Decodes each action's data with its contract's ABI.
    pub async fn deserialize_actions(&self, actions: &[SerializedAction]) -> ApiResult<Vec<Action>> {
        try_join_all(actions.iter().map(|action| self.deserialize_action(action))).await
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// Encodes a `transaction` value whose action data is already hex.
    /// Missing limits, delay and action lists default to zero and empty.
    pub fn serialize_transaction(&self, transaction: &Value) -> ApiResult<Vec<u8>> {
        let mut value = serde_json::json!({
            "max_net_usage_words": DEFAULT_MAX_NET_USAGE_WORDS,
            "max_cpu_usage_ms": DEFAULT_MAX_CPU_USAGE_MS,
            "delay_sec": DEFAULT_DELAY_SEC,
            "context_free_actions": [],
            "actions": [],
            "transaction_extensions": [],
        });
        let fields = transaction.as_object().ok_or_else(|| SerializeError::TypeMismatch {
            expected: "object",
            got: transaction.to_string(),
        })?;
        if let Some(defaults) = value.as_object_mut() {
            for (key, field) in fields {
                defaults.insert(key.clone(), field.clone());
            }
        }
        Ok(self.transaction_types.encode("transaction", &value)?)
    }

    /// Decodes a serialized transaction, leaving action data as hex.
    pub fn deserialize_transaction(&self, bytes: &[u8]) -> ApiResult<Value> {
        Ok(self.transaction_types.decode("transaction", bytes)?)
    }

    /// Decodes a serialized transaction including each action's data.
    pub async fn deserialize_transaction_with_actions<'a>(
        &self,
        raw: impl Into<RawTransaction<'a>>,
    ) -> ApiResult<Transaction> {
        let bytes = match raw.into() {
            RawTransaction::Bytes(bytes) => Cow::Borrowed(bytes),
            RawTransaction::Hex(hex) => Cow::Owned(hex_to_bytes(hex)?),
        };
        let mut value = self.deserialize_transaction(&bytes)?;
        let context_free_actions = take_serialized_actions(&mut value, "context_free_actions")?;
        let actions = take_serialized_actions(&mut value, "actions")?;

        let mut transaction: Transaction =
            serde_json::from_value(value).map_err(|e| SerializeError::TypeMismatch {
                expected: "transaction",
                got: e.to_string(),
            })?;
        transaction.context_free_actions = self.deserialize_actions(&context_free_actions).await?;
        transaction.actions = self.deserialize_actions(&actions).await?;
        Ok(transaction)
    }

    /// `varuint32` count followed by each blob length-prefixed. `None` when
    /// there is no data, which the node expects as an empty field.
    pub fn serialize_context_free_data(&self, data: &[Vec<u8>]) -> ApiResult<Option<Vec<u8>>> {
        if data.is_empty() {
            return Ok(None);
        }
        let count = u32::try_from(data.len()).map_err(|_| SerializeError::OutOfRange {
            ty: "varuint32",
            value: data.len().to_string(),
        })?;
        let mut buf = SerialBuffer::new();
        push_varuint32(&mut buf, count);
        for blob in data {
            push_bytes(&mut buf, blob)?;
        }
        Ok(Some(buf.into_bytes()))
    }
}

/// Moves an action list out of a decoded transaction value, leaving `[]`.
fn take_serialized_actions(value: &mut Value, key: &'static str) -> ApiResult<Vec<SerializedAction>> {
    let list = value
        .get_mut(key)
        .map(|v| std::mem::replace(v, Value::Array(Vec::new())))
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(list).map_err(|e| {
        ApiError::from(SerializeError::TypeMismatch {
            expected: "action[]",
            got: e.to_string(),
        })
    })
}
