//! # Wire Format Constants
//!
//! Every fixed number the binary format depends on lives here: epochs,
//! alphabets, blob sizes, and the ABI version tag. These values are set by
//! the chain, not by us. Changing any of them breaks byte compatibility
//! with every node on the network.

// ---------------------------------------------------------------------------
// ABI Versioning
// ---------------------------------------------------------------------------

/// Every binary ABI starts with a length-prefixed version string. Only the
/// 1.x family is understood; 1.0 through 1.3 share the same layout with
/// optional trailing extension sections.
pub const ABI_VERSION_PREFIX: &str = "eosio::abi/1.";

/// Version string written into ABIs produced by this crate.
pub const ABI_VERSION: &str = "eosio::abi/1.2";

// ---------------------------------------------------------------------------
// Names and Symbols
// ---------------------------------------------------------------------------

/// The 32-character alphabet of account/action names. A character's index
/// is its 5-bit code.
pub const NAME_ALPHABET: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Names pack into 64 bits: twelve 5-bit characters plus a 4-bit tail.
pub const MAX_NAME_LENGTH: usize = 13;

/// Symbol codes are at most seven uppercase ASCII letters so they fit
/// beside the precision byte in a single u64.
pub const MAX_SYMBOL_CODE_LENGTH: usize = 7;

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Block timestamps count half-second slots from 2000-01-01T00:00:00.000Z.
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;

/// Width of one block timestamp slot.
pub const BLOCK_INTERVAL_MS: i64 = 500;

// ---------------------------------------------------------------------------
// Fixed-size blobs
// ---------------------------------------------------------------------------

/// RIPEMD-160 sized checksum.
pub const CHECKSUM160_SIZE: usize = 20;

/// SHA-256 sized checksum.
pub const CHECKSUM256_SIZE: usize = 32;

/// SHA-512 sized checksum.
pub const CHECKSUM512_SIZE: usize = 64;

/// float128 is carried as raw bytes; nobody on the client side does
/// quad-precision arithmetic.
pub const FLOAT128_SIZE: usize = 16;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// A u32 never needs more than five LEB128 groups.
pub const MAX_VARUINT32_BYTES: usize = 5;

/// Largest integer a JSON consumer can hold in an IEEE-754 double without
/// losing precision. 64-bit values beyond it are emitted as decimal strings.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Upper bound on alias chains and base-struct chains. Real ABIs nest two
/// or three levels; anything deeper is a cycle.
pub const MAX_TYPE_CHAIN_DEPTH: usize = 32;

/// Upper bound on value nesting within one (de)serialize pass. Every
/// struct, array, optional, variant and extension level counts once.
/// Recursive ABIs would otherwise let a short payload exhaust the stack.
pub const MAX_VALUE_DEPTH: usize = 128;

/// Returns `true` if `version` names an ABI layout this crate can decode.
pub fn supported_abi_version(version: &str) -> bool {
    version.starts_with(ABI_VERSION_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_versions() {
        assert!(supported_abi_version("eosio::abi/1.0"));
        assert!(supported_abi_version("eosio::abi/1.2"));
        assert!(supported_abi_version(ABI_VERSION));
        assert!(!supported_abi_version("eosio::abi/2.0"));
        assert!(!supported_abi_version(""));
    }

    #[test]
    fn test_name_alphabet_layout() {
        assert_eq!(NAME_ALPHABET[0], b'.');
        assert_eq!(NAME_ALPHABET[5], b'5');
        assert_eq!(NAME_ALPHABET[6], b'a');
        assert_eq!(NAME_ALPHABET[31], b'z');
    }

    #[test]
    fn test_block_epoch_is_y2k() {
        let epoch = chrono::DateTime::from_timestamp_millis(BLOCK_TIMESTAMP_EPOCH_MS)
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string());
        assert_eq!(epoch.as_deref(), Some("2000-01-01T00:00:00"));
    }
}
