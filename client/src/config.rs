//! # Client Configuration
//!
//! Defaults for the transaction header and the per-call [`TransactConfig`]
//! that selects TAPOS, signing and broadcast behaviour.
//!
//! The controller keeps no per-transaction state between calls; everything
//! a submission needs is either in the transaction, in this config, or
//! fetched fresh from the node for that call.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Header Defaults
// ---------------------------------------------------------------------------

/// Zero means "use the chain's configured limit".
pub const DEFAULT_MAX_NET_USAGE_WORDS: u32 = 0;

/// Zero means "use the chain's configured limit".
pub const DEFAULT_MAX_CPU_USAGE_MS: u8 = 0;

/// Transactions execute as soon as they land unless asked otherwise.
pub const DEFAULT_DELAY_SEC: u32 = 0;

/// Thirty seconds is long enough to survive a slow signer and short enough
/// that a stuck transaction does not haunt the mempool.
pub const DEFAULT_EXPIRE_SECONDS: u32 = 30;

/// Three blocks behind head (1.5 s) is comfortably past micro-forks.
pub const DEFAULT_BLOCKS_BEHIND: u32 = 3;

/// `ref_block_num` holds the low 16 bits of the reference block number.
pub const REF_BLOCK_NUM_MASK: u32 = 0xffff;

/// Hex-character window of the block id holding `ref_block_prefix`
/// (bytes 8..12, little-endian).
pub const REF_BLOCK_PREFIX_HEX_RANGE: std::ops::Range<usize> = 16..24;

// ---------------------------------------------------------------------------
// Node capability thresholds
// ---------------------------------------------------------------------------

/// First node release accepting `retry_trx` on `send_transaction2`.
pub const LEAP3_MIN_VERSION: (u64, u64) = (3, 1);

/// First node release accepting `send_read_only_transaction`.
pub const LEAP4_MIN_VERSION: (u64, u64) = (4, 0);

// ---------------------------------------------------------------------------
// TransactConfig
// ---------------------------------------------------------------------------

/// Options for one [`crate::Api::transact`] call.
///
/// ```rust
/// use antelope_client::TransactConfig;
///
/// let config = TransactConfig::default()
///     .blocks_behind(3)
///     .expire_seconds(30)
///     .retry_trx_num_blocks(10);
/// assert!(config.is_retry());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactConfig {
    /// Submit to the node. When false the (optionally signed) payload is returned.
    pub broadcast: bool,
    /// Ask the signature provider for signatures.
    pub sign: bool,
    /// Reference block distance behind head for TAPOS.
    pub blocks_behind: Option<u32>,
    /// Forward correction for single-producer test chains whose irreversible
    /// blocks age out quickly.
    pub search_blocks_ahead: u32,
    /// Expiration offset from the reference block's time.
    pub expire_seconds: Option<u32>,
    /// Broadcast through legacy `push_transaction`.
    pub use_old_rpc: bool,
    /// Broadcast through legacy `send_transaction`.
    pub use_old_send_rpc: bool,
    /// Execute without committing state and without signatures.
    pub read_only: bool,
    /// Ask the node to return partial traces on failure.
    pub return_failure_trace: bool,
    /// Ask the node to keep retrying until the transaction is this many blocks deep.
    pub retry_trx_num_blocks: u32,
    /// Ask the node to keep retrying until the transaction is irreversible.
    pub retry_irreversible: bool,
}

impl Default for TransactConfig {
    fn default() -> Self {
        Self {
            broadcast: true,
            sign: true,
            blocks_behind: None,
            search_blocks_ahead: 0,
            expire_seconds: None,
            use_old_rpc: false,
            use_old_send_rpc: false,
            read_only: false,
            return_failure_trace: true,
            retry_trx_num_blocks: 0,
            retry_irreversible: false,
        }
    }
}

impl TransactConfig {
    pub fn broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }

    pub fn sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    pub fn blocks_behind(mut self, blocks: u32) -> Self {
        self.blocks_behind = Some(blocks);
        self
    }

    pub fn search_blocks_ahead(mut self, blocks: u32) -> Self {
        self.search_blocks_ahead = blocks;
        self
    }

    pub fn expire_seconds(mut self, seconds: u32) -> Self {
        self.expire_seconds = Some(seconds);
        self
    }

    pub fn use_old_rpc(mut self, enabled: bool) -> Self {
        self.use_old_rpc = enabled;
        self
    }

    pub fn use_old_send_rpc(mut self, enabled: bool) -> Self {
        self.use_old_send_rpc = enabled;
        self
    }

    pub fn read_only(mut self, enabled: bool) -> Self {
        self.read_only = enabled;
        self
    }

    pub fn return_failure_trace(mut self, enabled: bool) -> Self {
        self.return_failure_trace = enabled;
        self
    }

    pub fn retry_trx_num_blocks(mut self, blocks: u32) -> Self {
        self.retry_trx_num_blocks = blocks;
        self
    }

    pub fn retry_irreversible(mut self, enabled: bool) -> Self {
        self.retry_irreversible = enabled;
        self
    }

    /// `true` when the node is asked to retry inclusion.
    pub fn is_retry(&self) -> bool {
        self.retry_irreversible || self.retry_trx_num_blocks > 0
    }

    /// `true` when one of the two legacy broadcast endpoints is selected.
    pub fn uses_legacy_rpc(&self) -> bool {
        self.use_old_rpc || self.use_old_send_rpc
    }

    /// Both TAPOS inputs are present, so the reference block can be fetched.
    /// A zero `expire_seconds` counts as absent.
    pub fn tapos_inputs(&self) -> Option<(u32, u32)> {
        match (self.blocks_behind, self.expire_seconds) {
            (Some(behind), Some(expire)) if expire > 0 => Some((behind, expire)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransactConfig::default();
        assert!(config.broadcast);
        assert!(config.sign);
        assert!(config.return_failure_trace);
        assert!(!config.is_retry());
        assert!(!config.uses_legacy_rpc());
        assert_eq!(config.tapos_inputs(), None);
    }

    #[test]
    fn test_setters_chain() {
        let config = TransactConfig::default()
            .blocks_behind(DEFAULT_BLOCKS_BEHIND)
            .expire_seconds(DEFAULT_EXPIRE_SECONDS)
            .use_old_send_rpc(true)
            .broadcast(false);
        assert_eq!(config.tapos_inputs(), Some((3, 30)));
        assert!(config.uses_legacy_rpc());
        assert!(!config.broadcast);
    }

    #[test]
    fn test_zero_expiry_disables_tapos() {
        let config = TransactConfig::default().blocks_behind(3).expire_seconds(0);
        assert_eq!(config.tapos_inputs(), None);
    }

    #[test]
    fn test_retry_modes() {
        assert!(TransactConfig::default().retry_irreversible(true).is_retry());
        assert!(TransactConfig::default().retry_trx_num_blocks(1).is_retry());
    }

    #[test]
    fn test_deserializes_partial_json() {
        let config: TransactConfig =
            serde_json::from_str(r#"{"blocks_behind":3,"expire_seconds":30,"read_only":true}"#)
                .unwrap();
        assert_eq!(config.tapos_inputs(), Some((3, 30)));
        assert!(config.read_only);
        assert!(config.sign);
    }
}
