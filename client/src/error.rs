//! Error types for the transaction lifecycle.
//!
//! Protocol errors (bad flag combinations, missing TAPOS, node too old)
//! are raised before anything touches the network. Remote errors carry the
//! node's JSON so callers can dig into traces.

use thiserror::Error;

use antelope_abi::SerializeError;

use crate::rpc::RpcError;

/// Errors surfaced by [`crate::Api`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Incompatible options or an incomplete transaction header.
    #[error("{0}")]
    Config(String),

    /// The node's version does not support the requested feature.
    #[error("{feature} unavailable for nodeos: {version}")]
    Unsupported { feature: String, version: String },

    /// Encoding or decoding failed.
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// An account's ABI could not be fetched or parsed.
    #[error("failed to get abi for {account}: {source}")]
    AbiFetch {
        account: String,
        #[source]
        source: Box<ApiError>,
    },

    /// The node rejected a request.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// A collaborator (signer, authority provider, transport) failed.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Convenience alias used across the crate.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}
