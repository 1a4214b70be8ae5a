//! Transaction construction via the builder pattern.
//!
//! The builder only assembles fields. TAPOS can be set here explicitly or
//! left for [`crate::Api::transact`] to derive from a reference block.

use super::types::{Action, Extension, Transaction};

/// Fluent builder for [`Transaction`].
///
/// ```rust
/// use antelope_client::{Action, TransactionBuilder};
/// use serde_json::json;
///
/// let trx = TransactionBuilder::new()
///     .action(
///         Action::new("eosio.token", "transfer")
///             .authorization("alice", "active")
///             .data(json!({ "from": "alice", "to": "bob", "quantity": "1.0000 SYS", "memo": "" })),
///     )
///     .build();
/// assert!(!trx.has_tapos());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expiration (`YYYY-MM-DDTHH:MM:SS[.sss]`, UTC).
    pub fn expiration(mut self, expiration: impl Into<String>) -> Self {
        self.transaction.expiration = Some(expiration.into());
        self
    }

    /// Sets the reference block explicitly, bypassing TAPOS derivation.
    pub fn ref_block(mut self, ref_block_num: u16, ref_block_prefix: u32) -> Self {
        self.transaction.ref_block_num = Some(ref_block_num);
        self.transaction.ref_block_prefix = Some(ref_block_prefix);
        self
    }

    pub fn max_net_usage_words(mut self, words: u32) -> Self {
        self.transaction.max_net_usage_words = words;
        self
    }

    pub fn max_cpu_usage_ms(mut self, ms: u8) -> Self {
        self.transaction.max_cpu_usage_ms = ms;
        self
    }

    pub fn delay_sec(mut self, seconds: u32) -> Self {
        self.transaction.delay_sec = seconds;
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.transaction.actions.push(action);
        self
    }

    pub fn context_free_action(mut self, action: Action) -> Self {
        self.transaction.context_free_actions.push(action);
        self
    }

    /// Appends one context-free data blob.
    pub fn context_free_data(mut self, data: Vec<u8>) -> Self {
        self.transaction.context_free_data.push(data);
        self
    }

    pub fn extension(mut self, ty: u16, data: impl Into<String>) -> Self {
        self.transaction.transaction_extensions.push(Extension {
            ty,
            data: data.into(),
        });
        self
    }

    pub fn build(self) -> Transaction {
        self.transaction
    }
}
