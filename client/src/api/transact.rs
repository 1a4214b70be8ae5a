//! The `transact` pipeline and the broadcast helpers.
//!
//! Option conflicts and missing TAPOS inputs are rejected before any
//! network call. Node info is fetched lazily and at most once per call.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::TransactConfig;
use crate::error::{ApiError, ApiResult};
use crate::rpc::{
    AuthorityProviderArgs, ChainRpc, GetInfoResult, PackedTransaction, PushTransactionArgs,
    SendTransaction2Args, SignatureProviderArgs,
};
use crate::transaction::{tapos_block_num, transaction_header, Transaction, TransactionHeader};
use crate::version::ChainSemanticVersion;

use super::Api;

/// Outcome of [`Api::transact`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransactResult {
    /// The node's response to the broadcast.
    Broadcast(Value),
    /// The serialized (and possibly signed) transaction, not sent.
    Packed(PushTransactionArgs),
}

impl TransactResult {
    pub fn broadcast(&self) -> Option<&Value> {
        match self {
            Self::Broadcast(value) => Some(value),
            Self::Packed(_) => None,
        }
    }

    pub fn packed(&self) -> Option<&PushTransactionArgs> {
        match self {
            Self::Packed(args) => Some(args),
            Self::Broadcast(_) => None,
        }
    }
}

/// Node info for one `transact` call, fetched on first use.
struct CallContext<'a> {
    rpc: &'a dyn ChainRpc,
    info: Option<GetInfoResult>,
}

impl<'a> CallContext<'a> {
    fn new(rpc: &'a dyn ChainRpc) -> Self {
        Self { rpc, info: None }
    }

    async fn info(&mut self) -> ApiResult<&GetInfoResult> {
        if self.info.is_none() {
            let info = self.rpc.get_info().await?;
            debug!(
                head = info.head_block_num,
                chain_id = %info.chain_id,
                "fetched node info"
            );
            self.info = Some(info);
        }
        self.info
            .as_ref()
            .ok_or_else(|| ApiError::provider("node info unavailable"))
    }
}

/// Rejects option combinations the node cannot honor.
fn check_flags(config: &TransactConfig) -> ApiResult<()> {
    if config.is_retry() {
        if config.uses_legacy_rpc() {
            return Err(ApiError::config(
                "Retry transaction feature not compatible with old RPC",
            ));
        }
        if config.read_only {
            return Err(ApiError::config(
                "Retry transaction feature not compatible with read only transaction",
            ));
        }
        if config.retry_irreversible && config.retry_trx_num_blocks > 0 {
            return Err(ApiError::config(
                "Must specify retry irreversible or retry until block height, not both",
            ));
        }
    }
    if config.read_only && config.uses_legacy_rpc() {
        return Err(ApiError::config(
            "Old RPC not compatible with read only transaction, please disable old RPC",
        ));
    }
    Ok(())
}

impl Api {
    /// Completes, serializes, signs and broadcasts a transaction.
    ///
    /// TAPOS fields are derived from a reference block when the config
    /// carries both `blocks_behind` and `expire_seconds` and the
    /// transaction does not already have them. With `broadcast` off the
    /// packed payload is returned instead of sent.
    pub async fn transact(
        &self,
        transaction: Transaction,
        config: &TransactConfig,
    ) -> ApiResult<TransactResult> {
        check_flags(config)?;
        let tapos = config.tapos_inputs();
        if !transaction.has_tapos() && tapos.is_none() {
            return Err(ApiError::config(
                "Required configuration or TAPOS fields are not present",
            ));
        }

        let mut ctx = CallContext::new(self.rpc.as_ref());
        if config.is_retry() || config.read_only {
            self.check_node_version(&mut ctx, config).await?;
        }

        let transaction = match tapos {
            Some((blocks_behind, expire_seconds)) if !transaction.has_tapos() => {
                let header = self
                    .reference_header(&mut ctx, blocks_behind, config.search_blocks_ahead, expire_seconds)
                    .await?;
                transaction.with_header(&header)
            }
            _ => transaction,
        };
        if !transaction.has_tapos() {
            return Err(ApiError::config(
                "Required configuration or TAPOS fields are not present",
            ));
        }

        let abis = self.get_transaction_abis(&transaction, false).await?;
        let context_free_actions = self
            .serialize_actions(&transaction.context_free_actions)
            .await?;
        let actions = self.serialize_actions(&transaction.actions).await?;
        let serialized = transaction.to_serialized_value(&context_free_actions, &actions);
        let serialized_transaction = self.serialize_transaction(&serialized)?;
        let serialized_context_free_data =
            self.serialize_context_free_data(&transaction.context_free_data)?;
        debug!(
            bytes = serialized_transaction.len(),
            actions = actions.len(),
            context_free_actions = context_free_actions.len(),
            "serialized transaction"
        );

        let mut push_args = PushTransactionArgs {
            signatures: Vec::new(),
            serialized_transaction,
            serialized_context_free_data,
        };

        if config.sign && !config.read_only {
            let chain_id = match &self.chain_id {
                Some(chain_id) => chain_id.clone(),
                None => ctx.info().await?.chain_id.clone(),
            };
            let available_keys = self.signature_provider.get_available_keys().await?;
            let required_keys = self
                .authority_provider
                .get_required_keys(AuthorityProviderArgs {
                    transaction: serialized,
                    available_keys,
                })
                .await?;
            debug!(%chain_id, keys = required_keys.len(), "signing transaction");
            push_args = self
                .signature_provider
                .sign(SignatureProviderArgs {
                    chain_id,
                    required_keys,
                    serialized_transaction: push_args.serialized_transaction,
                    serialized_context_free_data: push_args.serialized_context_free_data,
                    abis,
                })
                .await?;
        }

        if !config.broadcast {
            return Ok(TransactResult::Packed(push_args));
        }
        self.broadcast(push_args, config)
            .await
            .map(TransactResult::Broadcast)
    }

    /// Retry needs a Leap 3.1 node, read-only a Leap 4.0 node.
    async fn check_node_version(
        &self,
        ctx: &mut CallContext<'_>,
        config: &TransactConfig,
    ) -> ApiResult<()> {
        let info = ctx.info().await?;
        let version =
            ChainSemanticVersion::new(info.server_version_string.as_deref().unwrap_or_default());
        debug!(
            version = version.as_str(),
            leap3 = version.supports_leap3_features(),
            leap4 = version.supports_leap4_features(),
            "checked node version"
        );
        if config.is_retry() && !version.supports_leap3_features() {
            return Err(ApiError::Unsupported {
                feature: "Retry transaction feature".into(),
                version: version.as_str().to_string(),
            });
        }
        if config.read_only && !version.supports_leap4_features() {
            return Err(ApiError::Unsupported {
                feature: "Read only transaction feature".into(),
                version: version.as_str().to_string(),
            });
        }
        Ok(())
    }

    async fn reference_header(
        &self,
        ctx: &mut CallContext<'_>,
        blocks_behind: u32,
        search_blocks_ahead: u32,
        expire_seconds: u32,
    ) -> ApiResult<TransactionHeader> {
        let head = ctx.info().await?.head_block_num;
        let block_num = tapos_block_num(head, blocks_behind, search_blocks_ahead);
        let ref_block = self.rpc.get_block_header_state(block_num).await?;
        let header = transaction_header(&ref_block, expire_seconds)?;
        debug!(
            head,
            block_num,
            expiration = %header.expiration,
            "derived tapos header"
        );
        Ok(header)
    }

    async fn broadcast(&self, args: PushTransactionArgs, config: &TransactConfig) -> ApiResult<Value> {
        if config.is_retry() {
            let retry_trx_num_blocks =
                (config.retry_trx_num_blocks > 0).then_some(config.retry_trx_num_blocks);
            info!(
                retry_trx_num_blocks,
                retry_irreversible = config.retry_irreversible,
                "broadcasting with node-side retry"
            );
            return self
                .send_signed_transaction2(SendTransaction2Args {
                    return_failure_trace: config.return_failure_trace,
                    retry_trx: true,
                    retry_trx_num_blocks,
                    transaction: PackedTransaction::from(args),
                })
                .await;
        }
        if config.read_only {
            info!("executing read only transaction");
            return self.send_readonly_transaction(&args).await;
        }
        if config.use_old_send_rpc {
            info!(endpoint = "send_transaction", "broadcasting transaction");
            return self.send_signed_transaction(&args).await;
        }
        if config.use_old_rpc {
            info!(endpoint = "push_transaction", "broadcasting transaction");
            return self.push_signed_transaction(&args).await;
        }
        info!(endpoint = "send_transaction2", "broadcasting transaction");
        self.send_signed_transaction2(SendTransaction2Args {
            return_failure_trace: config.return_failure_trace,
            retry_trx: false,
            retry_trx_num_blocks: None,
            transaction: PackedTransaction::from(args),
        })
        .await
    }

    /// Broadcasts through the legacy `push_transaction` endpoint.
    pub async fn push_signed_transaction(&self, args: &PushTransactionArgs) -> ApiResult<Value> {
        self.rpc.push_transaction(PackedTransaction::from(args)).await
    }

    /// Broadcasts through the legacy `send_transaction` endpoint.
    pub async fn send_signed_transaction(&self, args: &PushTransactionArgs) -> ApiResult<Value> {
        self.rpc.send_transaction(PackedTransaction::from(args)).await
    }

    pub async fn send_signed_transaction2(&self, args: SendTransaction2Args) -> ApiResult<Value> {
        self.rpc.send_transaction2(args).await
    }

    /// Executes without committing; the node returns the traces.
    pub async fn send_readonly_transaction(&self, args: &PushTransactionArgs) -> ApiResult<Value> {
        self.rpc
            .send_readonly_transaction(PackedTransaction::from(args))
            .await
    }
}
