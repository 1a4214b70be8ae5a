//! Error types for binary serialization.
//!
//! A single [`SerializeError`] covers the three failure families of the
//! codec: decode errors (the bytes are short or malformed), encode range
//! errors (the value does not fit its declared type), and schema errors
//! (the type graph itself is broken). None of them are recoverable inside
//! the current pass; the caller gets the first failure.

use thiserror::Error;

/// Errors raised while encoding, decoding, or resolving ABI types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    // -- decode ------------------------------------------------------------
    /// A read would advance the cursor past the written region.
    #[error("read past end of buffer: wanted {wanted} bytes, {remaining} remaining")]
    ReadPastEnd { wanted: usize, remaining: usize },

    /// A string payload was not valid UTF-8.
    #[error("invalid utf-8 in string payload")]
    InvalidUtf8,

    /// A variant tag selected a member that does not exist.
    #[error("type index {index} is not valid for variant {variant}")]
    InvalidVariantIndex { variant: String, index: u32 },

    /// A value nests deeper than the pass allows.
    #[error("value nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    /// A strict whole-buffer decode left bytes unread.
    #[error("{0} unread bytes remain after decoding")]
    TrailingBytes(usize),

    // -- encode ------------------------------------------------------------
    /// A numeric value is outside the representable range of its type.
    #[error("number is out of range for {ty}: {value}")]
    OutOfRange { ty: &'static str, value: String },

    /// A number (or a string of digits) was required.
    #[error("expected number for {ty}, got {got}")]
    ExpectedNumber { ty: &'static str, got: String },

    /// A string claimed to be a number but is not a decimal integer.
    #[error("invalid number for {ty}: {value}")]
    InvalidNumber { ty: &'static str, value: String },

    /// bool accepts only true/false, 0/1, or the strings "true"/"false".
    #[error("expected true or false, got {0}")]
    ExpectedBool(String),

    /// The JSON shape does not match what the type needs.
    #[error("expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: String },

    /// Hex input was odd-length or contained non-hex characters.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A fixed-size blob had the wrong length.
    #[error("binary data has incorrect size: expected {expected} bytes, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    /// A name used characters outside `.1-5a-z` or was too long.
    #[error("invalid name {0:?}: names are up to 13 characters from .12345abcdefghijklmnopqrstuvwxyz")]
    InvalidName(String),

    /// A symbol or symbol code was malformed.
    #[error("invalid symbol {0:?}: expected up to 7 uppercase letters")]
    InvalidSymbol(String),

    /// An asset string did not parse.
    #[error("invalid asset {value:?}: {reason}")]
    InvalidAsset { value: String, reason: String },

    /// A date string did not parse or is outside the type's epoch range.
    #[error("invalid date {0:?}")]
    InvalidDate(String),

    /// A struct value lacks a non-extension field.
    #[error("missing {strukt}.{field} (type={ty})")]
    MissingField {
        strukt: String,
        field: String,
        ty: String,
    },

    /// A field follows a skipped binary extension, which the format cannot express.
    #[error("unexpected {strukt}.{field}: it follows a skipped binary extension")]
    UnexpectedField { strukt: String, field: String },

    /// A variant value named a type that is not one of its members.
    #[error("type {member} is not a member of variant {variant}")]
    UnknownVariantMember { variant: String, member: String },

    // -- schema ------------------------------------------------------------
    /// A type name resolved to nothing, even after suffix stripping.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// An alias or base chain loops back on itself.
    #[error("type chain through {0} is cyclic or too deep")]
    TypeCycle(String),

    /// A struct's base does not resolve to a struct.
    #[error("base {base} of struct {strukt} is not a struct")]
    InvalidBase { strukt: String, base: String },

    /// The ABI version tag is not one we understand.
    #[error("unsupported abi version: {0}")]
    UnsupportedAbiVersion(String),

    /// A decoded ABI did not map onto the ABI definition structure.
    #[error("malformed abi: {0}")]
    InvalidAbi(String),

    /// The contract has no action with this name.
    #[error("unknown action {action} in contract {account}")]
    UnknownAction { account: String, action: String },
}

/// Convenience alias used across the crate.
pub type SerializeResult<T> = Result<T, SerializeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SerializeError::ReadPastEnd {
            wanted: 2,
            remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "read past end of buffer: wanted 2 bytes, 1 remaining"
        );

        let err = SerializeError::MissingField {
            strukt: "transfer".into(),
            field: "memo".into(),
            ty: "string".into(),
        };
        assert_eq!(err.to_string(), "missing transfer.memo (type=string)");
    }

    #[test]
    fn test_unknown_type_display() {
        let err = SerializeError::UnknownType("foo[]".into());
        assert!(err.to_string().contains("foo[]"));
    }
}
