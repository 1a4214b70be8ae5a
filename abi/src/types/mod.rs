//! # Type System
//!
//! Built-in codecs plus the ABI-driven registry that composes them into
//! structs, variants, aliases, arrays, optionals and extensions.

pub mod builtin;
pub mod registry;

pub use builtin::Builtin;
pub use registry::{FieldDef, StructDef, TypeDef, TypeRegistry, VariantDef};
