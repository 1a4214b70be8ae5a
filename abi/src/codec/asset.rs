//! Symbols and token quantities.
//!
//! - `symbol_code`: up to 7 uppercase letters, ASCII bytes zero-padded to 8.
//! - `symbol`: precision byte, then the code bytes, padded to 8.
//! - `asset`: i64 amount in the smallest unit, then the symbol.
//! - `extended_asset`: an asset plus the issuing contract's name.

use std::fmt;
use std::str::FromStr;

use crate::buffer::SerialBuffer;
use crate::codec::name::Name;
use crate::config::MAX_SYMBOL_CODE_LENGTH;
use crate::error::{SerializeError, SerializeResult};

// ---------------------------------------------------------------------------
// SymbolCode
// ---------------------------------------------------------------------------

/// Token ticker such as `SYS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolCode(String);

impl SymbolCode {
    pub fn parse(text: &str) -> SerializeResult<Self> {
        if text.is_empty()
            || text.len() > MAX_SYMBOL_CODE_LENGTH
            || !text.bytes().all(|c| c.is_ascii_uppercase())
        {
            return Err(SerializeError::InvalidSymbol(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn write(&self, buf: &mut SerialBuffer) {
        let mut raw = [0u8; 8];
        raw[..self.0.len()].copy_from_slice(self.0.as_bytes());
        buf.push_array(&raw);
    }

    pub fn read(buf: &mut SerialBuffer) -> SerializeResult<Self> {
        let raw = buf.get_array::<8>()?;
        Self::from_padded(&raw)
    }

    /// Code bytes up to the first NUL. A code filling all 8 bytes does not
    /// fit in a symbol and is rejected.
    fn from_padded(raw: &[u8]) -> SerializeResult<Self> {
        let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
        let text = std::str::from_utf8(&raw[..len]).map_err(|_| SerializeError::InvalidUtf8)?;
        if len > MAX_SYMBOL_CODE_LENGTH {
            return Err(SerializeError::InvalidSymbol(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// Precision plus code, written `"4,SYS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub precision: u8,
    pub code: SymbolCode,
}

impl Symbol {
    pub fn parse(text: &str) -> SerializeResult<Self> {
        let invalid = || SerializeError::InvalidSymbol(text.to_string());
        let (precision, code) = text.trim().split_once(',').ok_or_else(invalid)?;
        let precision = precision.trim().parse::<u8>().map_err(|_| invalid())?;
        Ok(Self {
            precision,
            code: SymbolCode::parse(code.trim())?,
        })
    }

    pub fn write(&self, buf: &mut SerialBuffer) {
        let mut raw = [0u8; 8];
        raw[0] = self.precision;
        raw[1..=self.code.0.len()].copy_from_slice(self.code.0.as_bytes());
        buf.push_array(&raw);
    }

    pub fn read(buf: &mut SerialBuffer) -> SerializeResult<Self> {
        let raw = buf.get_array::<8>()?;
        Ok(Self {
            precision: raw[0],
            code: SymbolCode::from_padded(&raw[1..])?,
        })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// A signed quantity of a token, e.g. `"-1.2345 SYS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    /// Amount in the smallest unit: `1.2345 SYS` is `12345`.
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    /// Parses `[-]digits[.digits] CODE`. The number of fractional digits
    /// sets the precision.
    pub fn parse(text: &str) -> SerializeResult<Self> {
        let invalid = |reason: &str| SerializeError::InvalidAsset {
            value: text.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = text.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let amount_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (amount_text, code_text) = rest.split_at(amount_len);

        let (int_part, frac_part) = match amount_text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (amount_text, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("expected a number"));
        }
        if frac_part.contains('.') {
            return Err(invalid("more than one decimal point"));
        }
        let precision =
            u8::try_from(frac_part.len()).map_err(|_| invalid("precision is too large"))?;

        let digits = format!("{int_part}{frac_part}");
        let magnitude = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<i128>()
                .map_err(|_| invalid("amount is too large"))?
        };
        let signed = if negative { -magnitude } else { magnitude };
        let amount = i64::try_from(signed).map_err(|_| SerializeError::OutOfRange {
            ty: "asset",
            value: text.to_string(),
        })?;

        let code = SymbolCode::parse(code_text.trim())?;
        Ok(Self {
            amount,
            symbol: Symbol { precision, code },
        })
    }

    pub fn write(&self, buf: &mut SerialBuffer) {
        buf.push_array(&self.amount.to_le_bytes());
        self.symbol.write(buf);
    }

    pub fn read(buf: &mut SerialBuffer) -> SerializeResult<Self> {
        let amount = i64::from_le_bytes(buf.get_array::<8>()?);
        let symbol = Symbol::read(buf)?;
        Ok(Self { amount, symbol })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision);
        let mut digits = self.amount.unsigned_abs().to_string();
        if digits.len() < precision + 1 {
            digits = format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits);
        }
        if self.amount < 0 {
            f.write_str("-")?;
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - precision);
        if precision == 0 {
            write!(f, "{int_part} {}", self.symbol.code)
        } else {
            write!(f, "{int_part}.{frac_part} {}", self.symbol.code)
        }
    }
}

impl FromStr for Asset {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// ExtendedAsset
// ---------------------------------------------------------------------------

/// An asset qualified by its token contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtendedAsset {
    pub quantity: Asset,
    pub contract: Name,
}

impl ExtendedAsset {
    pub fn write(&self, buf: &mut SerialBuffer) {
        self.quantity.write(buf);
        self.contract.write(buf);
    }

    pub fn read(buf: &mut SerialBuffer) -> SerializeResult<Self> {
        let quantity = Asset::read(buf)?;
        let contract = Name::read(buf)?;
        Ok(Self { quantity, contract })
    }
}
