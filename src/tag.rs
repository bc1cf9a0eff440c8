use hmac::{Hmac, Mac};
use sha2::Sha256;

pub type HmacSha256 = Hmac<Sha256>;

/// Output size of HMAC-SHA256 and so the longest tag we can hand out.
pub const TAG_MAX_LEN: usize = 32;

/// Build the per-request key: the secret followed by the delay as a
/// big-endian u64. Folding the delay in makes tags delay-specific.
pub fn derive_key(secret: &[u8], delay: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(secret.len() + 8);
    key.extend_from_slice(secret);
    key.extend_from_slice(&delay.to_be_bytes());
    key
}

/// The first `tag_len` bytes of HMAC-SHA256(key, user).
///
/// `tag_len` must not exceed [`TAG_MAX_LEN`]; this is checked when the
/// configuration is built, never against request input.
pub fn compute_tag(key: &[u8], user: &[u8], tag_len: usize) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(user);
    let digest = mac.finalize().into_bytes();
    digest[..tag_len].to_vec()
}
