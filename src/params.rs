use crate::{config::Limits, error::ValidationError};

/// Decoded and bounds-checked request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameters {
    /// Per-byte comparison delay, in milliseconds.
    pub delay: u64,
    pub user: Vec<u8>,
    pub tag: Vec<u8>,
}

impl RequestParameters {
    /// Validate the raw path segments of an `/auth/{delay}/{user}/{tag}`
    /// request. Nothing cryptographic happens here.
    pub fn parse(
        delay: &str,
        user: &str,
        tag: &str,
        limits: &Limits,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            delay: parse_delay(delay, limits.max_delay())?,
            user: parse_user(user, limits.max_user())?,
            tag: parse_tag(tag, limits.tag_len())?,
        })
    }
}

pub fn parse_delay(delay: &str, max_delay: u64) -> Result<u64, ValidationError> {
    let d: i64 = delay.parse().map_err(|source| ValidationError::Delay {
        input: delay.to_string(),
        source,
    })?;
    match u64::try_from(d) {
        Ok(d) if d > 0 && d <= max_delay => Ok(d),
        _ => Err(ValidationError::DelayOutOfRange {
            max: max_delay,
            got: d,
        }),
    }
}

pub fn parse_user(user: &str, max_user: usize) -> Result<Vec<u8>, ValidationError> {
    let n = user.len();
    if n == 0 || n > max_user {
        return Err(ValidationError::UserLength {
            max: max_user,
            got: n,
        });
    }
    Ok(user.as_bytes().to_vec())
}

/// Decode a hex tag of exactly `tag_len` bytes. A bad digit is reported by
/// the index of the tag byte it belongs to.
///
/// Length is checked before the digits are, so a tag of the wrong size is
/// reported as such even if it also contains non-hex characters.
pub fn parse_tag(tag: &str, tag_len: usize) -> Result<Vec<u8>, ValidationError> {
    if tag.len() % 2 != 0 {
        return Err(ValidationError::OddTagLength(tag.len()));
    }
    let decoded_len = tag.len() / 2;
    if decoded_len != tag_len {
        return Err(ValidationError::TagLength {
            expected: tag_len,
            got: decoded_len,
        });
    }
    hex::decode(tag).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            ValidationError::TagNotHex { position: index / 2 }
        }
        _ => ValidationError::OddTagLength(tag.len()),
    })
}
