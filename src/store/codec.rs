//! Binary record encoding for the fjall-backed store.
//!
//! Every stored value carries a format version byte and a trailing CRC32
//! checksum over the payload, so silent storage corruption is detected on
//! read instead of turning into a wrong grade.

use thiserror::Error;

/// Current record format version.
pub(crate) const FORMAT_VERSION: u8 = 1;

/// Errors produced when decoding a stored record.
#[derive(Error, Debug)]
pub(crate) enum CodecError {
    #[error("record truncated: expected {expected} bytes, got {found}")]
    Truncated { expected: usize, found: usize },

    #[error("unsupported record format version {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch")]
    Checksum,
}

/// Encode a single f64 score value.
pub(crate) fn encode_score(score: f64) -> Vec<u8> {
    encode(&score.to_le_bytes())
}

/// Decode a single f64 score value.
pub(crate) fn decode_score(bytes: &[u8]) -> Result<f64, CodecError> {
    let payload = decode(bytes, 8)?;
    Ok(f64::from_le_bytes(take8(payload, 0)?))
}

/// Encode a final score value: total plus creation/update timestamps.
pub(crate) fn encode_final(total: f64, created_at: u64, updated_at: u64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(24);
    payload.extend_from_slice(&total.to_le_bytes());
    payload.extend_from_slice(&created_at.to_le_bytes());
    payload.extend_from_slice(&updated_at.to_le_bytes());
    encode(&payload)
}

/// Decode a final score value into (total, created_at, updated_at).
pub(crate) fn decode_final(bytes: &[u8]) -> Result<(f64, u64, u64), CodecError> {
    let payload = decode(bytes, 24)?;
    let total = f64::from_le_bytes(take8(payload, 0)?);
    let created_at = u64::from_le_bytes(take8(payload, 8)?);
    let updated_at = u64::from_le_bytes(take8(payload, 16)?);
    Ok((total, created_at, updated_at))
}

/// Wrap a payload as `[version][payload][crc32(payload)]`.
fn encode(payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 5);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    bytes
}

/// Unwrap a record, verifying version, length and checksum.
fn decode(bytes: &[u8], payload_len: usize) -> Result<&[u8], CodecError> {
    let expected = payload_len + 5;
    if bytes.len() != expected {
        return Err(CodecError::Truncated {
            expected,
            found: bytes.len(),
        });
    }

    let (header, rest) = bytes.split_at(1);
    let version = header.first().copied().unwrap_or_default();
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let (payload, checksum) = rest.split_at(payload_len);
    let stored = u32::from_le_bytes(take4(checksum)?);
    if crc32fast::hash(payload) != stored {
        return Err(CodecError::Checksum);
    }

    Ok(payload)
}

fn take8(payload: &[u8], offset: usize) -> Result<[u8; 8], CodecError> {
    payload
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or(CodecError::Truncated {
            expected: offset + 8,
            found: payload.len(),
        })
}

fn take4(bytes: &[u8]) -> Result<[u8; 4], CodecError> {
    bytes.get(..4).and_then(|s| s.try_into().ok()).ok_or(
        CodecError::Truncated {
            expected: 4,
            found: bytes.len(),
        },
    )
}
