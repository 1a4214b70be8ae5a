//! Timestamps.
//!
//! All three chain time types travel as `YYYY-MM-DDTHH:MM:SS[.fff]` strings
//! in UTC (a trailing `Z` is tolerated) and are emitted with exactly three
//! fractional digits and no zone suffix.
//!
//! | type                   | wire            | unit                           |
//! |------------------------|-----------------|--------------------------------|
//! | `time_point`           | u64 LE          | microseconds since 1970        |
//! | `time_point_sec`       | u32 LE          | seconds since 1970, rounded    |
//! | `block_timestamp_type` | u32 LE          | 500 ms slots since 2000, rounded |
//!
//! Dates are limited to the years chrono can represent (about ±262 000).
//! Every `time_point_sec` and `block_timestamp_type` fits, but a `time_point`
//! beyond that span is a valid u64 with no date form. Decoding one fails
//! with `OutOfRange` carrying the raw microsecond count.

use chrono::{DateTime, NaiveDateTime};

use crate::buffer::SerialBuffer;
use crate::config::{BLOCK_INTERVAL_MS, BLOCK_TIMESTAMP_EPOCH_MS};
use crate::error::{SerializeError, SerializeResult};

/// Parses a chain date string into milliseconds since the Unix epoch.
pub fn parse_date(text: &str) -> SerializeResult<i64> {
    let trimmed = text.trim();
    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let naive = bare
        .parse::<NaiveDateTime>()
        .map_err(|_| SerializeError::InvalidDate(text.to_string()))?;
    Ok(naive.and_utc().timestamp_millis())
}

/// Formats milliseconds since the Unix epoch as a chain date string.
pub fn format_date(millis: i64) -> SerializeResult<String> {
    let date = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| SerializeError::InvalidDate(format!("{millis} ms")))?;
    Ok(date.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
}

fn to_u32(ty: &'static str, text: &str, value: i64) -> SerializeResult<u32> {
    u32::try_from(value).map_err(|_| SerializeError::OutOfRange {
        ty,
        value: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// time_point_sec
// ---------------------------------------------------------------------------

/// Seconds since 1970 for a date string, rounded to the nearest second.
pub fn time_point_sec_from_date(text: &str) -> SerializeResult<u32> {
    let millis = parse_date(text)?;
    to_u32("time_point_sec", text, (millis + 500).div_euclid(1000))
}

pub fn push_time_point_sec(buf: &mut SerialBuffer, text: &str) -> SerializeResult<()> {
    buf.push_array(&time_point_sec_from_date(text)?.to_le_bytes());
    Ok(())
}

pub fn get_time_point_sec(buf: &mut SerialBuffer) -> SerializeResult<String> {
    let secs = u32::from_le_bytes(buf.get_array::<4>()?);
    format_date(i64::from(secs) * 1000)
}

// ---------------------------------------------------------------------------
// time_point
// ---------------------------------------------------------------------------

pub fn push_time_point(buf: &mut SerialBuffer, text: &str) -> SerializeResult<()> {
    let millis = parse_date(text)?;
    let micros = u64::try_from(millis)
        .ok()
        .and_then(|ms| ms.checked_mul(1000))
        .ok_or_else(|| SerializeError::OutOfRange {
            ty: "time_point",
            value: text.to_string(),
        })?;
    buf.push_array(&micros.to_le_bytes());
    Ok(())
}

pub fn get_time_point(buf: &mut SerialBuffer) -> SerializeResult<String> {
    let micros = u64::from_le_bytes(buf.get_array::<8>()?);
    let out_of_range = || SerializeError::OutOfRange {
        ty: "time_point",
        value: format!("{micros} us"),
    };
    let millis = i64::try_from(micros / 1000).map_err(|_| out_of_range())?;
    format_date(millis).map_err(|_| out_of_range())
}

// ---------------------------------------------------------------------------
// block_timestamp_type
// ---------------------------------------------------------------------------

pub fn push_block_timestamp(buf: &mut SerialBuffer, text: &str) -> SerializeResult<()> {
    let millis = parse_date(text)?;
    let slot = (millis - BLOCK_TIMESTAMP_EPOCH_MS + BLOCK_INTERVAL_MS / 2).div_euclid(BLOCK_INTERVAL_MS);
    buf.push_array(&to_u32("block_timestamp_type", text, slot)?.to_le_bytes());
    Ok(())
}

pub fn get_block_timestamp(buf: &mut SerialBuffer) -> SerializeResult<String> {
    let slot = u32::from_le_bytes(buf.get_array::<4>()?);
    format_date(i64::from(slot) * BLOCK_INTERVAL_MS + BLOCK_TIMESTAMP_EPOCH_MS)
}
