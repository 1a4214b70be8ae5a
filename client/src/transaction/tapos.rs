//! TAPOS header derivation.
//!
//! A transaction names a recent block (low 16 bits of its number plus 32
//! bits of its id) and expires a fixed number of seconds after that
//! block's time. Nodes reject transactions whose reference block is not on
//! their chain, which is what makes replay across forks impossible.

use antelope_abi::codec::primitive::hex_to_bytes;
use antelope_abi::codec::time::time_point_sec_from_date;
use antelope_abi::codec::format_date;
use antelope_abi::SerializeError;

use crate::config::{REF_BLOCK_NUM_MASK, REF_BLOCK_PREFIX_HEX_RANGE};
use crate::error::{ApiError, ApiResult};
use crate::rpc::BlockHeaderState;

/// The three replay-protection fields of a transaction header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    pub expiration: String,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
}

/// Block number of the TAPOS reference block.
pub fn tapos_block_num(head_block_num: u32, blocks_behind: u32, search_blocks_ahead: u32) -> u32 {
    head_block_num
        .saturating_sub(blocks_behind)
        .saturating_add(search_blocks_ahead)
}

/// Bytes 8..12 of the block id, little-endian.
pub fn ref_block_prefix_from_id(block_id: &str) -> ApiResult<u32> {
    let window = block_id
        .get(REF_BLOCK_PREFIX_HEX_RANGE)
        .ok_or_else(|| ApiError::config(format!("block id {block_id:?} is too short")))?;
    let bytes: [u8; 4] = hex_to_bytes(window)?
        .try_into()
        .map_err(|_| SerializeError::InvalidHex(window.to_string()))?;
    Ok(u32::from_le_bytes(bytes))
}

/// Derives the header from a reference block. Expiration is the block time
/// rounded to the second plus `expire_seconds`.
pub fn transaction_header(
    ref_block: &BlockHeaderState,
    expire_seconds: u32,
) -> ApiResult<TransactionHeader> {
    let block_time = ref_block.block_time().ok_or_else(|| {
        ApiError::config(format!(
            "reference block {} has no timestamp",
            ref_block.block_num
        ))
    })?;
    let expiration_secs = time_point_sec_from_date(block_time)?
        .checked_add(expire_seconds)
        .ok_or_else(|| SerializeError::OutOfRange {
            ty: "time_point_sec",
            value: format!("{block_time} + {expire_seconds}s"),
        })?;

    let ref_block_prefix = match ref_block.ref_block_prefix {
        Some(prefix) => prefix,
        None => ref_block_prefix_from_id(&ref_block.id)?,
    };

    Ok(TransactionHeader {
        expiration: format_date(i64::from(expiration_secs) * 1000)?,
        ref_block_num: (ref_block.block_num & REF_BLOCK_NUM_MASK) as u16,
        ref_block_prefix,
    })
}
