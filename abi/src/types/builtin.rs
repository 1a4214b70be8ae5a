//! Built-in types and their JSON mapping.

use serde_json::{json, Value};

use crate::buffer::SerialBuffer;
use crate::codec::numeric::{
    describe, from_float, from_i64, from_u64, to_bool, to_f32, to_float, to_i128, to_integer, to_u128,
};
use crate::codec::{asset, name::Name, primitive, time};
use crate::config::{CHECKSUM160_SIZE, CHECKSUM256_SIZE, CHECKSUM512_SIZE, FLOAT128_SIZE};
use crate::error::{SerializeError, SerializeResult};

/// Every type the registry knows without an ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    Varint32,
    Varuint32,
    Float32,
    Float64,
    Float128,
    TimePoint,
    TimePointSec,
    BlockTimestamp,
    Name,
    Bytes,
    String,
    Checksum160,
    Checksum256,
    Checksum512,
    Symbol,
    SymbolCode,
    Asset,
    ExtendedAsset,
}

fn expect_str<'a>(value: &'a Value) -> SerializeResult<&'a str> {
    value.as_str().ok_or_else(|| SerializeError::TypeMismatch {
        expected: "string",
        got: describe(value),
    })
}

fn push_int(
    buf: &mut SerialBuffer,
    ty: &'static str,
    value: &Value,
    width: usize,
    signed: bool,
) -> SerializeResult<()> {
    let bits = 8 * width as u32;
    let (min, max) = if signed {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    };
    let v = to_integer(ty, value, min, max)?;
    buf.push_array(&v.to_le_bytes()[..width]);
    Ok(())
}

fn push_hex_fixed(buf: &mut SerialBuffer, value: &Value, size: usize) -> SerializeResult<()> {
    buf.push_array(&primitive::hex_to_fixed(expect_str(value)?, size)?);
    Ok(())
}

fn get_hex_fixed(buf: &mut SerialBuffer, size: usize) -> SerializeResult<Value> {
    Ok(Value::String(primitive::bytes_to_hex(buf.get_bytes(size)?)))
}

fn bytes_from_value(value: &Value) -> SerializeResult<Vec<u8>> {
    match value {
        Value::String(s) => primitive::hex_to_bytes(s),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| SerializeError::OutOfRange {
                        ty: "bytes",
                        value: describe(item),
                    })
            })
            .collect(),
        other => Err(SerializeError::TypeMismatch {
            expected: "hex string or byte array",
            got: describe(other),
        }),
    }
}

fn extended_asset_field<'a>(value: &'a Value, field: &str, ty: &str) -> SerializeResult<&'a str> {
    let member = value.get(field).ok_or_else(|| SerializeError::MissingField {
        strukt: "extended_asset".into(),
        field: field.into(),
        ty: ty.into(),
    })?;
    expect_str(member)
}

impl Builtin {
    pub const ALL: [Builtin; 29] = [
        Builtin::Bool,
        Builtin::Int8,
        Builtin::Uint8,
        Builtin::Int16,
        Builtin::Uint16,
        Builtin::Int32,
        Builtin::Uint32,
        Builtin::Int64,
        Builtin::Uint64,
        Builtin::Int128,
        Builtin::Uint128,
        Builtin::Varint32,
        Builtin::Varuint32,
        Builtin::Float32,
        Builtin::Float64,
        Builtin::Float128,
        Builtin::TimePoint,
        Builtin::TimePointSec,
        Builtin::BlockTimestamp,
        Builtin::Name,
        Builtin::Bytes,
        Builtin::String,
        Builtin::Checksum160,
        Builtin::Checksum256,
        Builtin::Checksum512,
        Builtin::Symbol,
        Builtin::SymbolCode,
        Builtin::Asset,
        Builtin::ExtendedAsset,
    ];

    /// The ABI spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int8 => "int8",
            Builtin::Uint8 => "uint8",
            Builtin::Int16 => "int16",
            Builtin::Uint16 => "uint16",
            Builtin::Int32 => "int32",
            Builtin::Uint32 => "uint32",
            Builtin::Int64 => "int64",
            Builtin::Uint64 => "uint64",
            Builtin::Int128 => "int128",
            Builtin::Uint128 => "uint128",
            Builtin::Varint32 => "varint32",
            Builtin::Varuint32 => "varuint32",
            Builtin::Float32 => "float32",
            Builtin::Float64 => "float64",
            Builtin::Float128 => "float128",
            Builtin::TimePoint => "time_point",
            Builtin::TimePointSec => "time_point_sec",
            Builtin::BlockTimestamp => "block_timestamp_type",
            Builtin::Name => "name",
            Builtin::Bytes => "bytes",
            Builtin::String => "string",
            Builtin::Checksum160 => "checksum160",
            Builtin::Checksum256 => "checksum256",
            Builtin::Checksum512 => "checksum512",
            Builtin::Symbol => "symbol",
            Builtin::SymbolCode => "symbol_code",
            Builtin::Asset => "asset",
            Builtin::ExtendedAsset => "extended_asset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Appends the wire form of `value`.
    pub fn serialize(self, buf: &mut SerialBuffer, value: &Value) -> SerializeResult<()> {
        let ty = self.name();
        match self {
            Builtin::Bool => buf.push(u8::from(to_bool(value)?)),
            Builtin::Int8 => push_int(buf, ty, value, 1, true)?,
            Builtin::Uint8 => push_int(buf, ty, value, 1, false)?,
            Builtin::Int16 => push_int(buf, ty, value, 2, true)?,
            Builtin::Uint16 => push_int(buf, ty, value, 2, false)?,
            Builtin::Int32 => push_int(buf, ty, value, 4, true)?,
            Builtin::Uint32 => push_int(buf, ty, value, 4, false)?,
            Builtin::Int64 => push_int(buf, ty, value, 8, true)?,
            Builtin::Uint64 => push_int(buf, ty, value, 8, false)?,
            Builtin::Int128 => buf.push_array(&to_i128(ty, value)?.to_le_bytes()),
            Builtin::Uint128 => buf.push_array(&to_u128(ty, value)?.to_le_bytes()),
            Builtin::Varint32 => {
                let v = to_integer(ty, value, i128::from(i32::MIN), i128::from(i32::MAX))?;
                primitive::push_varint32(buf, v as i32);
            }
            Builtin::Varuint32 => {
                let v = to_integer(ty, value, 0, i128::from(u32::MAX))?;
                primitive::push_varuint32(buf, v as u32);
            }
            Builtin::Float32 => buf.push_array(&to_f32(ty, value)?.to_le_bytes()),
            Builtin::Float64 => buf.push_array(&to_float(ty, value)?.to_le_bytes()),
            Builtin::Float128 => push_hex_fixed(buf, value, FLOAT128_SIZE)?,
            Builtin::TimePoint => time::push_time_point(buf, expect_str(value)?)?,
            Builtin::TimePointSec => time::push_time_point_sec(buf, expect_str(value)?)?,
            Builtin::BlockTimestamp => time::push_block_timestamp(buf, expect_str(value)?)?,
            Builtin::Name => Name::parse(expect_str(value)?)?.write(buf),
            Builtin::Bytes => primitive::push_bytes(buf, &bytes_from_value(value)?)?,
            Builtin::String => primitive::push_string(buf, expect_str(value)?)?,
            Builtin::Checksum160 => push_hex_fixed(buf, value, CHECKSUM160_SIZE)?,
            Builtin::Checksum256 => push_hex_fixed(buf, value, CHECKSUM256_SIZE)?,
            Builtin::Checksum512 => push_hex_fixed(buf, value, CHECKSUM512_SIZE)?,
            Builtin::Symbol => asset::Symbol::parse(expect_str(value)?)?.write(buf),
            Builtin::SymbolCode => asset::SymbolCode::parse(expect_str(value)?)?.write(buf),
            Builtin::Asset => asset::Asset::parse(expect_str(value)?)?.write(buf),
            Builtin::ExtendedAsset => {
                let quantity = extended_asset_field(value, "quantity", "asset")?;
                let contract = extended_asset_field(value, "contract", "name")?;
                asset::ExtendedAsset {
                    quantity: asset::Asset::parse(quantity)?,
                    contract: Name::parse(contract)?,
                }
                .write(buf);
            }
        }
        Ok(())
    }

    /// Consumes one value of this type from the read cursor.
    pub fn deserialize(self, buf: &mut SerialBuffer) -> SerializeResult<Value> {
        let value = match self {
            Builtin::Bool => match buf.get()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => return Err(SerializeError::ExpectedBool(format!("byte {other:#04x}"))),
            },
            Builtin::Int8 => Value::from(i8::from_le_bytes(buf.get_array()?)),
            Builtin::Uint8 => Value::from(buf.get()?),
            Builtin::Int16 => Value::from(i16::from_le_bytes(buf.get_array()?)),
            Builtin::Uint16 => Value::from(u16::from_le_bytes(buf.get_array()?)),
            Builtin::Int32 => Value::from(i32::from_le_bytes(buf.get_array()?)),
            Builtin::Uint32 => Value::from(u32::from_le_bytes(buf.get_array()?)),
            Builtin::Int64 => from_i64(i64::from_le_bytes(buf.get_array()?)),
            Builtin::Uint64 => from_u64(u64::from_le_bytes(buf.get_array()?)),
            Builtin::Int128 => Value::String(i128::from_le_bytes(buf.get_array()?).to_string()),
            Builtin::Uint128 => Value::String(u128::from_le_bytes(buf.get_array()?).to_string()),
            Builtin::Varint32 => Value::from(primitive::get_varint32(buf)?),
            Builtin::Varuint32 => Value::from(primitive::get_varuint32(buf)?),
            Builtin::Float32 => from_float(f64::from(f32::from_le_bytes(buf.get_array()?))),
            Builtin::Float64 => from_float(f64::from_le_bytes(buf.get_array()?)),
            Builtin::Float128 => get_hex_fixed(buf, FLOAT128_SIZE)?,
            Builtin::TimePoint => Value::String(time::get_time_point(buf)?),
            Builtin::TimePointSec => Value::String(time::get_time_point_sec(buf)?),
            Builtin::BlockTimestamp => Value::String(time::get_block_timestamp(buf)?),
            Builtin::Name => Value::String(Name::read(buf)?.to_string()),
            Builtin::Bytes => Value::String(primitive::bytes_to_hex(&primitive::get_bytes(buf)?)),
            Builtin::String => Value::String(primitive::get_string(buf)?),
            Builtin::Checksum160 => get_hex_fixed(buf, CHECKSUM160_SIZE)?,
            Builtin::Checksum256 => get_hex_fixed(buf, CHECKSUM256_SIZE)?,
            Builtin::Checksum512 => get_hex_fixed(buf, CHECKSUM512_SIZE)?,
            Builtin::Symbol => Value::String(asset::Symbol::read(buf)?.to_string()),
            Builtin::SymbolCode => Value::String(asset::SymbolCode::read(buf)?.to_string()),
            Builtin::Asset => Value::String(asset::Asset::read(buf)?.to_string()),
            Builtin::ExtendedAsset => {
                let ext = asset::ExtendedAsset::read(buf)?;
                json!({
                    "quantity": ext.quantity.to_string(),
                    "contract": ext.contract.to_string(),
                })
            }
        };
        Ok(value)
    }
}
