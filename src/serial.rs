//! Checksummed binary encoding of saved rule lists.
//!
//! [`encode`] and [`decode`] are pure byte transforms. Where the bytes go is
//! up to the [`SaveHandler`](crate::SaveHandler) that calls them.
//!
//! ## Layout
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"QLFY"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Flags (u16, reserved, zero)
//! 8       4     Rule count (u32, little-endian)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 digest of the payload, first 16 bytes
//! 32..    var   Bincode payload: the rules as a sequence
//! ```
//!
//! A blob whose format version differs from [`FORMAT_VERSION`] is refused.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Rule, RuleId};

const MAGIC: [u8; 4] = *b"QLFY";
const HEADER_LEN: usize = 32;
const DIGEST_LEN: usize = 16;

/// Version written into every header; decoding requires an exact match.
pub const FORMAT_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode rules: {0}")]
    Payload(#[from] bincode::error::EncodeError),

    #[error("snapshot too large: {what} is {len}, limit is {}", u32::MAX)]
    TooLarge { what: &'static str, len: usize },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("snapshot truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("not a qualify snapshot")]
    BadMagic,

    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("snapshot checksum mismatch")]
    ChecksumMismatch,

    #[error("failed to decode rules: {0}")]
    Payload(#[from] bincode::error::DecodeError),

    #[error("header lists {header} rules but payload holds {payload}")]
    CountMismatch { header: u32, payload: usize },

    #[error("rule id {0} appears more than once")]
    DuplicateId(RuleId),

    #[error("rule {id} is out of priority order")]
    Unsorted { id: RuleId },
}

// -- Header -----------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
struct Header {
    version: u16,
    rule_count: u32,
    payload_len: u32,
    digest: [u8; DIGEST_LEN],
}

fn digest(payload: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&blake3::hash(payload).as_bytes()[..DIGEST_LEN]);
    out
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl Header {
    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&MAGIC);
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        // 6..8 flags stay zero
        out[8..12].copy_from_slice(&self.rule_count.to_le_bytes());
        out[12..16].copy_from_slice(&self.payload_len.to_le_bytes());
        out[16..32].copy_from_slice(&self.digest);
        out
    }

    fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::Truncated {
                needed: HEADER_LEN,
                got: bytes.len(),
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(DecodeError::BadMagic);
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes[16..32]);
        Ok(Self {
            version: le_u16(bytes, 4),
            rule_count: le_u32(bytes, 8),
            payload_len: le_u32(bytes, 12),
            digest,
        })
    }
}

// -- Validation -------------------------------------------------------------

fn check_rules(header: &Header, rules: &[Rule]) -> Result<(), DecodeError> {
    if header.rule_count as usize != rules.len() {
        return Err(DecodeError::CountMismatch {
            header: header.rule_count,
            payload: rules.len(),
        });
    }
    let mut ids = HashSet::with_capacity(rules.len());
    for rule in rules {
        if !ids.insert(rule.id()) {
            return Err(DecodeError::DuplicateId(rule.id()));
        }
    }
    if let Some(pair) = rules.windows(2).find(|w| w[0].priority() > w[1].priority()) {
        return Err(DecodeError::Unsorted { id: pair[1].id() });
    }
    Ok(())
}

// -- Encode / decode --------------------------------------------------------

fn to_u32(what: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge { what, len })
}

/// Encode a rule list into a checksummed snapshot.
///
/// # Errors
///
/// Returns [`EncodeError`] if the payload cannot be encoded or does not fit
/// the header's 32-bit fields.
pub fn encode(rules: &[Rule]) -> Result<Vec<u8>, EncodeError> {
    let payload = bincode::serde::encode_to_vec(rules, bincode::config::standard())?;
    let header = Header {
        version: FORMAT_VERSION,
        rule_count: to_u32("rule count", rules.len())?,
        payload_len: to_u32("payload length", payload.len())?,
        digest: digest(&payload),
    };

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a rule list produced by [`encode`].
///
/// The rules come back exactly as saved. Pass them to
/// [`RuleEditor::from_snapshot`](crate::RuleEditor::from_snapshot) to
/// resume editing against a catalog.
///
/// # Errors
///
/// Returns [`DecodeError`] if the header, checksum or payload is invalid, or
/// if the rules are not a well-formed saved list.
pub fn decode(bytes: &[u8]) -> Result<Vec<Rule>, DecodeError> {
    let header = Header::parse(bytes)?;
    if header.version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }

    let end = HEADER_LEN + header.payload_len as usize;
    let payload = bytes.get(HEADER_LEN..end).ok_or(DecodeError::Truncated {
        needed: end,
        got: bytes.len(),
    })?;
    if digest(payload) != header.digest {
        return Err(DecodeError::ChecksumMismatch);
    }

    let (rules, _): (Vec<Rule>, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    check_rules(&header, &rules)?;
    Ok(rules)
}
