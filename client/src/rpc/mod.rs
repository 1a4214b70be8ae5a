//! # Node Interface
//!
//! Payload types, the collaborator traits the controller is wired with,
//! and the wrapper for node-reported errors. No transport lives here.

pub mod error;
pub mod provider;
pub mod types;

pub use error::RpcError;
pub use provider::{AbiProvider, AuthorityProvider, ChainRpc, SignatureProvider};
pub use types::{
    AuthorityProviderArgs, BinaryAbi, BlockHeader, BlockHeaderState, GetInfoResult,
    GetRawAbiResult, PackedTransaction, PushTransactionArgs, SendTransaction2Args,
    SignatureProviderArgs,
};
