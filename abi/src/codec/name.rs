//! Account, action and permission names.
//!
//! A name is up to 13 characters from `.12345abcdefghijklmnopqrstuvwxyz`
//! packed into a u64, most significant bits first. The first twelve
//! characters take 5 bits each; the thirteenth only has 4 bits left and
//! keeps the low four bits of its alphabet index.

use std::fmt;
use std::str::FromStr;

use crate::buffer::SerialBuffer;
use crate::config::{MAX_NAME_LENGTH, NAME_ALPHABET};
use crate::error::{SerializeError, SerializeResult};

/// A packed 64-bit name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(pub u64);

fn char_to_symbol(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl Name {
    /// Packs a textual name.
    pub fn parse(text: &str) -> SerializeResult<Self> {
        let bytes = text.as_bytes();
        if bytes.len() > MAX_NAME_LENGTH {
            return Err(SerializeError::InvalidName(text.to_string()));
        }
        let mut value: u64 = 0;
        for (i, &c) in bytes.iter().enumerate() {
            let symbol =
                char_to_symbol(c).ok_or_else(|| SerializeError::InvalidName(text.to_string()))?;
            if i < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
            } else {
                value |= symbol & 0x0f;
            }
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn write(self, buf: &mut SerialBuffer) {
        buf.push_array(&self.0.to_le_bytes());
    }

    pub fn read(buf: &mut SerialBuffer) -> SerializeResult<Self> {
        Ok(Self(u64::from_le_bytes(buf.get_array::<8>()?)))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = [b'.'; MAX_NAME_LENGTH];
        for (i, slot) in text.iter_mut().enumerate() {
            let index = if i < 12 {
                (self.0 >> (64 - 5 * (i + 1))) & 0x1f
            } else {
                self.0 & 0x0f
            };
            *slot = NAME_ALPHABET[index as usize];
        }
        let len = text.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // Every byte comes from the ASCII alphabet.
        f.write_str(std::str::from_utf8(&text[..len]).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Name {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(text: &str) -> [u8; 8] {
        let mut buf = SerialBuffer::new();
        Name::parse(text).unwrap().write(&mut buf);
        buf.as_bytes().try_into().unwrap()
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(packed(""), [0; 8]);
        assert_eq!(packed("abcd"), [0x00, 0x00, 0x00, 0x00, 0x00, 0x90, 0xD0, 0x31]);
        assert_eq!(Name::parse("eosio").unwrap().value(), 0x5530_EA00_0000_0000);
    }

    #[test]
    fn test_display_strips_trailing_dots() {
        for text in ["", "a", "eosio.token", "a.b", "zzzzzzzzzzzz", "12345abcdefgh"] {
            assert_eq!(Name::parse(text).unwrap().to_string(), text);
        }
        assert_eq!(Name::parse("abc...").unwrap().to_string(), "abc");
    }

    #[test]
    fn test_thirteenth_character_keeps_four_bits() {
        let z = Name::parse("zzzzzzzzzzzzz").unwrap();
        let j = Name::parse("zzzzzzzzzzzzj").unwrap();
        assert_eq!(z, j);
        assert_eq!(z.to_string(), "zzzzzzzzzzzzj");
    }

    #[test]
    fn test_rejects_bad_names() {
        for text in ["ABC", "a6", "with space", "aaaaaaaaaaaaaa", "a-b"] {
            assert!(
                matches!(Name::parse(text), Err(SerializeError::InvalidName(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_read_back() {
        let mut buf = SerialBuffer::from_bytes(packed("alice").to_vec());
        assert_eq!(Name::read(&mut buf).unwrap().to_string(), "alice");
    }
}
