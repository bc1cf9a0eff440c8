use crate::error::AuthError;

use subtle::ConstantTimeEq;

use std::time::Duration;

/// Compare tags one byte at a time, sleeping `delay` after every byte that
/// matches and bailing out on the first one that doesn't.
///
/// This leaks, on purpose: latency grows by one `delay` step per matching
/// leading byte. Tags of different lengths are rejected without sleeping.
pub async fn insecure_compare(
    expected: &[u8],
    supplied: &[u8],
    delay: Duration,
) -> Result<(), AuthError> {
    if expected.len() != supplied.len() {
        return Err(AuthError::TagMismatch);
    }
    for (&e, &s) in expected.iter().zip(supplied) {
        if e != s {
            return Err(AuthError::TagMismatch);
        }
        tokio::time::sleep(delay).await;
    }
    Ok(())
}

/// Non-leaking counterpart of [`insecure_compare`]. Examines every byte and
/// never sleeps.
pub fn constant_time_compare(expected: &[u8], supplied: &[u8]) -> Result<(), AuthError> {
    if bool::from(expected.ct_eq(supplied)) {
        Ok(())
    } else {
        Err(AuthError::TagMismatch)
    }
}
