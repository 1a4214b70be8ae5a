// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Antelope ABI — Binary Serialization Core
//!
//! Converts structured values to and from the Antelope wire format, driven
//! by an ABI. The format is compact and unforgiving: no field names, no
//! type tags outside of variants, and a single wrong byte makes a node
//! reject the transaction. So every codec here is exact to the byte and
//! every range check fails loudly instead of clamping.
//!
//! ## Architecture
//!
//! - **buffer** — Append-only bytes with a read cursor. Every codec goes through it.
//! - **codec** — Wire encodings: LEB128, strings, names, assets, timestamps.
//! - **types** — Builtins and the name-indexed registry that composes them.
//! - **schema** — ABI definitions, the ABI-of-ABIs, and binary ABI conversion.
//! - **contract** — One account's action schemas.
//! - **config** — Format constants. Touch these and nothing talks to a node.
//!
//! Structured values are `serde_json::Value`. 64-bit integers beyond the
//! IEEE-754 safe range and all 128-bit integers travel as decimal strings.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod contract;
pub mod error;
pub mod schema;
pub mod types;

pub use buffer::SerialBuffer;
pub use contract::Contract;
pub use error::{SerializeError, SerializeResult};
pub use schema::{abi_to_raw, raw_abi_to_abi, Abi};
pub use types::{Builtin, TypeRegistry};
