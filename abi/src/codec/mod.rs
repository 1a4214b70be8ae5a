//! # Codec Layer
//!
//! Wire encodings for every built-in ABI type. Submodules work on native
//! Rust values; [`crate::types::Builtin`] maps them onto JSON.

pub mod asset;
pub mod name;
pub(crate) mod numeric;
pub mod primitive;
pub mod time;

pub use asset::{Asset, ExtendedAsset, Symbol, SymbolCode};
pub use name::Name;
pub use primitive::{
    bytes_to_hex, get_bytes, get_string, get_varint32, get_varuint32, hex_to_bytes, push_bytes,
    push_string, push_varint32, push_varuint32,
};
pub use time::{format_date, parse_date};
