//! JSON number coercion.
//!
//! Integers arrive as JSON numbers or as decimal strings (the only lossless
//! carrier for 64- and 128-bit values). Everything is widened to i128/u128,
//! range-checked against the target type, then narrowed.

use std::num::IntErrorKind;

use serde_json::{Number, Value};

use crate::config::MAX_SAFE_INTEGER;
use crate::error::{SerializeError, SerializeResult};

/// Short rendering of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 64 {
        let mut cut = 61;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}

fn out_of_range(ty: &'static str, value: impl ToString) -> SerializeError {
    SerializeError::OutOfRange {
        ty,
        value: value.to_string(),
    }
}

fn number_to_i128(ty: &'static str, number: &Number) -> SerializeResult<i128> {
    if let Some(v) = number.as_i64() {
        return Ok(i128::from(v));
    }
    if let Some(v) = number.as_u64() {
        return Ok(i128::from(v));
    }
    let float = number.as_f64().unwrap_or(f64::NAN);
    if !float.is_finite() || float.fract() != 0.0 {
        return Err(out_of_range(ty, number));
    }
    if float.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(SerializeError::InvalidNumber {
            ty,
            value: format!("{number} cannot be represented exactly; pass it as a string"),
        });
    }
    Ok(float as i128)
}

fn string_to_i128(ty: &'static str, text: &str) -> SerializeResult<i128> {
    let text = text.trim();
    match text.parse::<i128>() {
        Ok(v) => Ok(v),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(out_of_range(ty, text))
        }
        Err(_) => match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Err(out_of_range(ty, text)),
            _ => Err(SerializeError::ExpectedNumber {
                ty,
                got: format!("{text:?}"),
            }),
        },
    }
}

/// Coerces `value` to an integer in `[min, max]`.
///
/// Non-numeric input fails with `ExpectedNumber`; a fractional or
/// out-of-bounds value fails with `OutOfRange`.
pub(crate) fn to_integer(
    ty: &'static str,
    value: &Value,
    min: i128,
    max: i128,
) -> SerializeResult<i128> {
    let parsed = match value {
        Value::Number(n) => number_to_i128(ty, n)?,
        Value::String(s) => string_to_i128(ty, s)?,
        other => {
            return Err(SerializeError::ExpectedNumber {
                ty,
                got: describe(other),
            })
        }
    };
    if parsed < min || parsed > max {
        return Err(out_of_range(ty, parsed));
    }
    Ok(parsed)
}

/// Coerces `value` to a u128. Decimal strings cover the full range.
pub(crate) fn to_u128(ty: &'static str, value: &Value) -> SerializeResult<u128> {
    match value {
        Value::String(s) => {
            let text = s.trim();
            match text.parse::<u128>() {
                Ok(v) => Ok(v),
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(out_of_range(ty, text)),
                Err(_) if text.parse::<i128>().is_ok() => Err(out_of_range(ty, text)),
                Err(_) => Err(SerializeError::InvalidNumber {
                    ty,
                    value: format!("{text:?}"),
                }),
            }
        }
        Value::Number(n) => {
            let v = number_to_i128(ty, n)?;
            u128::try_from(v).map_err(|_| out_of_range(ty, v))
        }
        other => Err(SerializeError::ExpectedNumber {
            ty,
            got: describe(other),
        }),
    }
}

/// Coerces `value` to an i128. Decimal strings cover the full range.
pub(crate) fn to_i128(ty: &'static str, value: &Value) -> SerializeResult<i128> {
    match value {
        Value::String(s) => {
            let text = s.trim();
            match text.parse::<i128>() {
                Ok(v) => Ok(v),
                Err(e)
                    if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) =>
                {
                    Err(out_of_range(ty, text))
                }
                Err(_) => Err(SerializeError::InvalidNumber {
                    ty,
                    value: format!("{text:?}"),
                }),
            }
        }
        Value::Number(n) => number_to_i128(ty, n),
        other => Err(SerializeError::ExpectedNumber {
            ty,
            got: describe(other),
        }),
    }
}

/// Coerces `value` to a float. The strings "NaN", "Infinity" and
/// "-Infinity" stand in for the values JSON cannot carry.
pub(crate) fn to_float(ty: &'static str, value: &Value) -> SerializeResult<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| out_of_range(ty, n)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| SerializeError::ExpectedNumber {
            ty,
            got: format!("{s:?}"),
        }),
        other => Err(SerializeError::ExpectedNumber {
            ty,
            got: describe(other),
        }),
    }
}

/// Narrows to `f32`. Finite inputs beyond the `f32` range are rejected;
/// NaN and the infinities carry over as themselves.
pub(crate) fn to_f32(ty: &'static str, value: &Value) -> SerializeResult<f32> {
    let wide = to_float(ty, value)?;
    let narrow = wide as f32;
    if wide.is_finite() && narrow.is_infinite() {
        return Err(SerializeError::OutOfRange {
            ty,
            value: wide.to_string(),
        });
    }
    Ok(narrow)
}

/// 64-bit signed output: a JSON number inside the safe range, otherwise a
/// decimal string.
pub(crate) fn from_i64(value: i64) -> Value {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
        Value::from(value)
    } else {
        Value::String(value.to_string())
    }
}

/// 64-bit unsigned output, same rule as [`from_i64`].
pub(crate) fn from_u64(value: u64) -> Value {
    if value <= MAX_SAFE_INTEGER as u64 {
        Value::from(value)
    } else {
        Value::String(value.to_string())
    }
}

pub(crate) fn from_float(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(n) => Value::Number(n),
        None if value.is_nan() => Value::String("NaN".into()),
        None if value > 0.0 => Value::String("Infinity".into()),
        None => Value::String("-Infinity".into()),
    }
}

/// Accepts true/false, 0/1, or the strings "true"/"false".
pub(crate) fn to_bool(value: &Value) -> SerializeResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(SerializeError::ExpectedBool(describe(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_integer_accepts_numbers_and_strings() {
        assert_eq!(to_integer("int8", &json!(-128), -128, 127).unwrap(), -128);
        assert_eq!(to_integer("int8", &json!("127"), -128, 127).unwrap(), 127);
        assert_eq!(to_integer("uint8", &json!(2.0), 0, 255).unwrap(), 2);
    }

    #[test]
    fn test_to_f32_rejects_finite_overflow() {
        assert_eq!(to_f32("float32", &json!(0.5)).unwrap(), 0.5);
        assert!(to_f32("float32", &json!("Infinity")).unwrap().is_infinite());
        assert!(to_f32("float32", &json!("NaN")).unwrap().is_nan());
        assert!(matches!(
            to_f32("float32", &json!(1e300)),
            Err(SerializeError::OutOfRange { ty: "float32", .. })
        ));
        assert!(matches!(
            to_f32("float32", &json!(-1e39)),
            Err(SerializeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_to_integer_rejections() {
        assert!(matches!(
            to_integer("int8", &json!(128), -128, 127),
            Err(SerializeError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_integer("uint8", &json!(1.5), 0, 255),
            Err(SerializeError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_integer("uint8", &json!("1.5"), 0, 255),
            Err(SerializeError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_integer("uint8", &json!("abc"), 0, 255),
            Err(SerializeError::ExpectedNumber { .. })
        ));
        assert!(matches!(
            to_integer("uint8", &json!(true), 0, 255),
            Err(SerializeError::ExpectedNumber { .. })
        ));
    }

    #[test]
    fn test_128_bit_strings() {
        assert_eq!(
            to_u128("uint128", &json!("340282366920938463463374607431768211455")).unwrap(),
            u128::MAX
        );
        assert!(matches!(
            to_u128("uint128", &json!("340282366920938463463374607431768211456")),
            Err(SerializeError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_u128("uint128", &json!("-1")),
            Err(SerializeError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_i128("int128", &json!("12x")),
            Err(SerializeError::InvalidNumber { .. })
        ));
        assert_eq!(
            to_i128("int128", &json!("-170141183460469231731687303715884105728")).unwrap(),
            i128::MIN
        );
    }

    #[test]
    fn test_safe_integer_output() {
        assert_eq!(from_i64(9_007_199_254_740_991), json!(9_007_199_254_740_991i64));
        assert_eq!(from_i64(9_007_199_254_740_992), json!("9007199254740992"));
        assert_eq!(from_i64(i64::MIN), json!("-9223372036854775808"));
        assert_eq!(from_u64(u64::MAX), json!("18446744073709551615"));
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(from_float(f64::NAN), json!("NaN"));
        assert_eq!(from_float(f64::INFINITY), json!("Infinity"));
        assert_eq!(from_float(f64::NEG_INFINITY), json!("-Infinity"));
        assert!(to_float("float64", &json!("NaN")).unwrap().is_nan());
        assert_eq!(to_float("float64", &json!("-Infinity")).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_bool_coercion() {
        assert!(to_bool(&json!(true)).unwrap());
        assert!(!to_bool(&json!(0)).unwrap());
        assert!(to_bool(&json!("true")).unwrap());
        assert!(matches!(to_bool(&json!(2)), Err(SerializeError::ExpectedBool(_))));
        assert!(matches!(to_bool(&json!("yes")), Err(SerializeError::ExpectedBool(_))));
    }
}
