//! # Type Registry
//!
//! Name-indexed table of type definitions. Definitions refer to each other
//! by name only and are looked up at (de)serialize time, so forward and
//! mutually recursive references need no construction order. Suffixes are
//! never registered; `T[]`, `T?` and `T$` are derived from `T` on lookup.
//!
//! A struct's `base` is flattened into an ordered list of field groups,
//! base first, rather than modelled as a hierarchy.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::buffer::SerialBuffer;
use crate::codec::numeric::describe;
use crate::codec::primitive::{get_varuint32, push_varuint32};
use crate::config::{MAX_TYPE_CHAIN_DEPTH, MAX_VALUE_DEPTH};
use crate::error::{SerializeError, SerializeResult};
use crate::schema::{abi_definition_schema, transaction_schema, Abi};

use super::builtin::Builtin;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructDef {
    pub base: Option<String>,
    pub fields: Vec<FieldDef>,
}

/// Tagged union; the tag is the member's position in `types`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantDef {
    pub types: Vec<String>,
}

/// A registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    Builtin(Builtin),
    Alias(String),
    Struct(StructDef),
    Variant(VariantDef),
}

/// Result of resolving a type name through aliases and suffixes.
#[derive(Debug, Clone, Copy)]
enum Resolved<'a> {
    Builtin(Builtin),
    Struct(&'a str, &'a StructDef),
    Variant(&'a str, &'a VariantDef),
    Array(&'a str),
    Optional(&'a str),
    Extension(&'a str),
}

/// Carried through one top-level (de)serialize call.
#[derive(Debug, Default)]
struct PassState {
    skipped_binary_extension: bool,
    depth: usize,
}

impl PassState {
    fn enter(&mut self) -> SerializeResult<()> {
        if self.depth >= MAX_VALUE_DEPTH {
            return Err(SerializeError::TooDeep {
                limit: MAX_VALUE_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// Name to type table, seeded with every [`Builtin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDef>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the builtins.
    pub fn new() -> Self {
        let types = Builtin::ALL
            .iter()
            .map(|b| (b.name().to_string(), TypeDef::Builtin(*b)))
            .collect();
        Self { types }
    }

    /// Builtins plus everything `abi` declares, validated.
    pub fn from_abi(abi: &Abi) -> SerializeResult<Self> {
        let mut registry = Self::new();
        registry.extend_from_abi(abi)?;
        Ok(registry)
    }

    /// Registry for decoding and encoding binary ABIs.
    pub fn abi_definitions() -> SerializeResult<Self> {
        Self::from_abi(&abi_definition_schema())
    }

    /// Registry for the `transaction` struct and its action envelope.
    pub fn transactions() -> SerializeResult<Self> {
        Self::from_abi(&transaction_schema())
    }

    /// Registers the aliases, structs and variants of `abi`, then checks
    /// that every referenced name resolves.
    pub fn extend_from_abi(&mut self, abi: &Abi) -> SerializeResult<()> {
        for def in &abi.types {
            self.insert(&def.new_type_name, TypeDef::Alias(def.ty.clone()));
        }
        for strukt in &abi.structs {
            let base = Some(strukt.base.clone()).filter(|b| !b.is_empty());
            let fields = strukt
                .fields
                .iter()
                .map(|f| FieldDef {
                    name: f.name.clone(),
                    type_name: f.ty.clone(),
                })
                .collect();
            self.insert(&strukt.name, TypeDef::Struct(StructDef { base, fields }));
        }
        for variant in &abi.variants {
            self.insert(
                &variant.name,
                TypeDef::Variant(VariantDef {
                    types: variant.types.clone(),
                }),
            );
        }
        self.validate()?;
        debug!(
            aliases = abi.types.len(),
            structs = abi.structs.len(),
            variants = abi.variants.len(),
            "registered abi types"
        );
        Ok(())
    }

    /// Registers a definition without validating it.
    pub fn insert(&mut self, name: &str, def: TypeDef) {
        self.types.insert(name.to_string(), def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// `true` if `name` resolves, including through suffixes.
    pub fn contains(&self, name: &str) -> bool {
        self.check_type(name).is_ok()
    }

    /// Checks that every alias target, base, field type and variant member
    /// resolves.
    pub fn validate(&self) -> SerializeResult<()> {
        for (name, def) in &self.types {
            match def {
                TypeDef::Builtin(_) => {}
                TypeDef::Alias(target) => self.check_type(target)?,
                TypeDef::Struct(strukt) => {
                    self.field_groups(name, strukt)?;
                    for field in &strukt.fields {
                        self.check_type(&field.type_name)?;
                    }
                }
                TypeDef::Variant(variant) => {
                    for member in &variant.types {
                        self.check_type(member)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves `name` down to a concrete type, following suffixes to
    /// their innermost element.
    pub fn check_type(&self, name: &str) -> SerializeResult<()> {
        let mut current = name;
        for _ in 0..MAX_TYPE_CHAIN_DEPTH {
            match self.resolve(current)? {
                Resolved::Array(inner) | Resolved::Optional(inner) | Resolved::Extension(inner) => {
                    current = inner
                }
                _ => return Ok(()),
            }
        }
        Err(SerializeError::TypeCycle(name.to_string()))
    }

    fn resolve<'a>(&'a self, name: &'a str) -> SerializeResult<Resolved<'a>> {
        let mut current = name;
        for _ in 0..MAX_TYPE_CHAIN_DEPTH {
            match self.types.get(current) {
                Some(TypeDef::Builtin(b)) => return Ok(Resolved::Builtin(*b)),
                Some(TypeDef::Alias(target)) => {
                    current = target;
                    continue;
                }
                Some(TypeDef::Struct(s)) => return Ok(Resolved::Struct(current, s)),
                Some(TypeDef::Variant(v)) => return Ok(Resolved::Variant(current, v)),
                None => {}
            }
            if let Some(inner) = current.strip_suffix("[]") {
                return Ok(Resolved::Array(inner));
            }
            if let Some(inner) = current.strip_suffix('?') {
                return Ok(Resolved::Optional(inner));
            }
            if let Some(inner) = current.strip_suffix('$') {
                return Ok(Resolved::Extension(inner));
            }
            return Err(SerializeError::UnknownType(current.to_string()));
        }
        Err(SerializeError::TypeCycle(name.to_string()))
    }

    fn is_extension(&self, name: &str) -> SerializeResult<bool> {
        Ok(matches!(self.resolve(name)?, Resolved::Extension(_)))
    }

    /// The struct and its bases as field groups, base first.
    fn field_groups<'a>(
        &'a self,
        name: &'a str,
        def: &'a StructDef,
    ) -> SerializeResult<Vec<(&'a str, &'a StructDef)>> {
        let mut chain = vec![(name, def)];
        let mut current = def;
        while let Some(base) = current.base.as_deref() {
            if chain.len() > MAX_TYPE_CHAIN_DEPTH {
                return Err(SerializeError::TypeCycle(name.to_string()));
            }
            match self.resolve(base)? {
                Resolved::Struct(base_name, base_def) => {
                    chain.push((base_name, base_def));
                    current = base_def;
                }
                _ => {
                    return Err(SerializeError::InvalidBase {
                        strukt: name.to_string(),
                        base: base.to_string(),
                    })
                }
            }
        }
        chain.reverse();
        Ok(chain)
    }

    // -----------------------------------------------------------------------
    // Serialize
    // -----------------------------------------------------------------------

    /// Appends `value` encoded as `type_name`. Trailing extension fields may
    /// be omitted from top-level structs.
    pub fn serialize(
        &self,
        buf: &mut SerialBuffer,
        type_name: &str,
        value: &Value,
    ) -> SerializeResult<()> {
        let mut state = PassState::default();
        self.serialize_value(buf, type_name, value, &mut state, true)
    }

    /// Encodes `value` into a fresh byte vector.
    pub fn encode(&self, type_name: &str, value: &Value) -> SerializeResult<Vec<u8>> {
        let mut buf = SerialBuffer::new();
        self.serialize(&mut buf, type_name, value)?;
        Ok(buf.into_bytes())
    }

    fn serialize_value(
        &self,
        buf: &mut SerialBuffer,
        type_name: &str,
        value: &Value,
        state: &mut PassState,
        allow_extensions: bool,
    ) -> SerializeResult<()> {
        state.enter()?;
        let result = self.serialize_resolved(buf, type_name, value, state, allow_extensions);
        state.leave();
        result
    }

    fn serialize_resolved(
        &self,
        buf: &mut SerialBuffer,
        type_name: &str,
        value: &Value,
        state: &mut PassState,
        allow_extensions: bool,
    ) -> SerializeResult<()> {
        match self.resolve(type_name)? {
            Resolved::Builtin(builtin) => builtin.serialize(buf, value),
            Resolved::Struct(name, def) => {
                self.serialize_struct(buf, name, def, value, state, allow_extensions)
            }
            Resolved::Variant(name, def) => {
                let pair = value
                    .as_array()
                    .filter(|pair| pair.len() == 2)
                    .ok_or_else(|| SerializeError::TypeMismatch {
                        expected: "[type, value] pair",
                        got: describe(value),
                    })?;
                let member = pair[0].as_str().ok_or_else(|| SerializeError::TypeMismatch {
                    expected: "variant member type name",
                    got: describe(&pair[0]),
                })?;
                let index = def.types.iter().position(|t| t == member).ok_or_else(|| {
                    SerializeError::UnknownVariantMember {
                        variant: name.to_string(),
                        member: member.to_string(),
                    }
                })?;
                push_varuint32(buf, index as u32);
                self.serialize_value(buf, &def.types[index], &pair[1], state, allow_extensions)
            }
            Resolved::Array(element) => {
                let items = value.as_array().ok_or_else(|| SerializeError::TypeMismatch {
                    expected: "array",
                    got: describe(value),
                })?;
                let count = u32::try_from(items.len()).map_err(|_| SerializeError::OutOfRange {
                    ty: "array length",
                    value: items.len().to_string(),
                })?;
                push_varuint32(buf, count);
                for item in items {
                    self.serialize_value(buf, element, item, state, false)?;
                }
                Ok(())
            }
            Resolved::Optional(inner) => {
                if value.is_null() {
                    buf.push(0);
                    Ok(())
                } else {
                    buf.push(1);
                    self.serialize_value(buf, inner, value, state, allow_extensions)
                }
            }
            Resolved::Extension(inner) => {
                self.serialize_value(buf, inner, value, state, allow_extensions)
            }
        }
    }

    fn serialize_struct(
        &self,
        buf: &mut SerialBuffer,
        name: &str,
        def: &StructDef,
        value: &Value,
        state: &mut PassState,
        allow_extensions: bool,
    ) -> SerializeResult<()> {
        let object = value.as_object().ok_or_else(|| SerializeError::TypeMismatch {
            expected: "object",
            got: describe(value),
        })?;
        for (group_name, group) in self.field_groups(name, def)? {
            let last = group.fields.len().saturating_sub(1);
            for (i, field) in group.fields.iter().enumerate() {
                match object.get(&field.name) {
                    Some(field_value) => {
                        if state.skipped_binary_extension {
                            return Err(SerializeError::UnexpectedField {
                                strukt: group_name.to_string(),
                                field: field.name.clone(),
                            });
                        }
                        self.serialize_value(
                            buf,
                            &field.type_name,
                            field_value,
                            state,
                            allow_extensions && i == last,
                        )?;
                    }
                    None if allow_extensions && self.is_extension(&field.type_name)? => {
                        state.skipped_binary_extension = true;
                    }
                    None => {
                        return Err(SerializeError::MissingField {
                            strukt: group_name.to_string(),
                            field: field.name.clone(),
                            ty: field.type_name.clone(),
                        })
                    }
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Deserialize
    // -----------------------------------------------------------------------

    /// Consumes one `type_name` value from the read cursor. Trailing
    /// extension fields are left out when the buffer runs dry.
    pub fn deserialize(&self, buf: &mut SerialBuffer, type_name: &str) -> SerializeResult<Value> {
        let mut state = PassState::default();
        self.deserialize_value(buf, type_name, &mut state, true)
    }

    /// Decodes the first value in `bytes`; trailing bytes are ignored.
    pub fn decode(&self, type_name: &str, bytes: &[u8]) -> SerializeResult<Value> {
        let mut buf = SerialBuffer::from_bytes(bytes.to_vec());
        self.deserialize(&mut buf, type_name)
    }

    /// Decodes `bytes` as exactly one value, rejecting leftovers.
    pub fn decode_exact(&self, type_name: &str, bytes: &[u8]) -> SerializeResult<Value> {
        let mut buf = SerialBuffer::from_bytes(bytes.to_vec());
        let value = self.deserialize(&mut buf, type_name)?;
        match buf.remaining() {
            0 => Ok(value),
            n => Err(SerializeError::TrailingBytes(n)),
        }
    }

    fn deserialize_value(
        &self,
        buf: &mut SerialBuffer,
        type_name: &str,
        state: &mut PassState,
        allow_extensions: bool,
    ) -> SerializeResult<Value> {
        state.enter()?;
        let result = self.deserialize_resolved(buf, type_name, state, allow_extensions);
        state.leave();
        result
    }

    fn deserialize_resolved(
        &self,
        buf: &mut SerialBuffer,
        type_name: &str,
        state: &mut PassState,
        allow_extensions: bool,
    ) -> SerializeResult<Value> {
        match self.resolve(type_name)? {
            Resolved::Builtin(builtin) => builtin.deserialize(buf),
            Resolved::Struct(name, def) => {
                let mut object = Map::new();
                for (_, group) in self.field_groups(name, def)? {
                    for field in &group.fields {
                        if allow_extensions
                            && self.is_extension(&field.type_name)?
                            && !buf.have_read_data()
                        {
                            state.skipped_binary_extension = true;
                        } else {
                            let value = self.deserialize_value(
                                buf,
                                &field.type_name,
                                state,
                                allow_extensions,
                            )?;
                            object.insert(field.name.clone(), value);
                        }
                    }
                }
                Ok(Value::Object(object))
            }
            Resolved::Variant(name, def) => {
                let index = get_varuint32(buf)?;
                let member = def.types.get(index as usize).ok_or_else(|| {
                    SerializeError::InvalidVariantIndex {
                        variant: name.to_string(),
                        index,
                    }
                })?;
                let value = self.deserialize_value(buf, member, state, allow_extensions)?;
                Ok(Value::Array(vec![Value::String(member.clone()), value]))
            }
            Resolved::Array(element) => {
                let count = get_varuint32(buf)? as usize;
                let mut items = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    items.push(self.deserialize_value(buf, element, state, false)?);
                }
                Ok(Value::Array(items))
            }
            Resolved::Optional(inner) => match buf.get()? {
                0 => Ok(Value::Null),
                1 => self.deserialize_value(buf, inner, state, allow_extensions),
                other => Err(SerializeError::TypeMismatch {
                    expected: "optional presence byte 0 or 1",
                    got: format!("{other:#04x}"),
                }),
            },
            Resolved::Extension(inner) => {
                self.deserialize_value(buf, inner, state, allow_extensions)
            }
        }
    }
}
