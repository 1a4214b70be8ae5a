//! Node version gate.
//!
//! Parses the node's `server_version_string` (`vMAJOR.MINOR.PATCH[-rcN]`)
//! and answers the two feature questions the controller cares about.
//! A version string that does not parse never supports anything.

use crate::config::{LEAP3_MIN_VERSION, LEAP4_MIN_VERSION};

/// A parsed node version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSemanticVersion {
    raw: String,
    major: u64,
    minor: u64,
    patch: u64,
    release_candidate: bool,
    parse_error: bool,
}

/// Leading decimal digits of `part`, the way node version strings are read.
fn leading_number(part: &str) -> Option<u64> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl ChainSemanticVersion {
    pub fn new(version: &str) -> Self {
        let raw = version.to_string();
        let stripped = version.strip_prefix('v').unwrap_or(version);
        let (core, release_candidate) = match stripped.split_once('-') {
            Some((core, _)) => (core, true),
            None => (stripped, false),
        };

        let parts: Vec<&str> = core.split('.').collect();
        let parsed = if parts.len() < 3 {
            None
        } else {
            match (leading_number(parts[0]), leading_number(parts[1])) {
                (Some(major), Some(minor)) => {
                    Some((major, minor, leading_number(parts[2]).unwrap_or(0)))
                }
                _ => None,
            }
        };

        match parsed {
            Some((major, minor, patch)) => Self {
                raw,
                major,
                minor,
                patch,
                release_candidate,
                parse_error: false,
            },
            None => Self {
                raw,
                major: 0,
                minor: 0,
                patch: 0,
                release_candidate,
                parse_error: true,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_release_candidate(&self) -> bool {
        self.release_candidate
    }

    pub fn has_parse_error(&self) -> bool {
        self.parse_error
    }

    /// Retry-trx support. `v3.1.0-rc*` predates the 3.1 release and does not count.
    pub fn supports_leap3_features(&self) -> bool {
        let (major, minor) = LEAP3_MIN_VERSION;
        self.major > major
            || (self.major == major
                && ((self.minor == minor && !self.release_candidate) || self.minor > minor))
    }

    /// Read-only transaction support. Only the `v4.0.0` release candidates
    /// are excluded; later 4.x candidates qualify.
    pub fn supports_leap4_features(&self) -> bool {
        let (major, minor) = LEAP4_MIN_VERSION;
        self.major > major
            || (self.major == major
                && !(self.minor == minor && self.patch == 0 && self.release_candidate))
    }
}
