//! # Transactions
//!
//! Caller-facing transaction shapes, the fluent builder, and TAPOS header
//! derivation from a reference block.

pub mod builder;
pub mod tapos;
pub mod types;

pub use builder::TransactionBuilder;
pub use tapos::{ref_block_prefix_from_id, tapos_block_num, transaction_header, TransactionHeader};
pub use types::{Action, Extension, PermissionLevel, SerializedAction, Transaction};
