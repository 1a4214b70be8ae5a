// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Antelope Client — Transaction Lifecycle
//!
//! Takes a transaction from structured actions to a node response: TAPOS
//! header derivation, contract ABI resolution, serialization, the signing
//! hand-off, and broadcast over whichever endpoint the node supports.
//!
//! ## Architecture
//!
//! - **api** — The [`Api`] controller, its ABI caches and the `transact` pipeline.
//! - **transaction** — Transaction shapes, the fluent builder, TAPOS derivation.
//! - **rpc** — Node payloads and the collaborator traits. No transport lives here.
//! - **version** — Node version parsing and feature gates.
//! - **config** — Header defaults and per-call [`TransactConfig`].
//! - **error** — [`ApiError`] and the node error wrapper.
//!
//! Transport, key storage and signing algorithms are injected through the
//! traits in [`rpc`]. This crate only orchestrates them.

pub mod api;
pub mod config;
pub mod error;
pub mod rpc;
pub mod transaction;
pub mod version;

pub use api::{AbiCache, Api, ApiOptions, CachedAbi, RawTransaction, TransactResult};
pub use config::TransactConfig;
pub use error::{ApiError, ApiResult};
pub use rpc::{
    AbiProvider, AuthorityProvider, AuthorityProviderArgs, BinaryAbi, BlockHeaderState, ChainRpc,
    GetInfoResult, GetRawAbiResult, PackedTransaction, PushTransactionArgs, RpcError,
    SendTransaction2Args, SignatureProvider, SignatureProviderArgs,
};
pub use transaction::{Action, PermissionLevel, SerializedAction, Transaction, TransactionBuilder};
pub use version::ChainSemanticVersion;
