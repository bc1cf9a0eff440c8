use crate::{
    compare::insecure_compare,
    config::Limits,
    error::AuthError,
    params::RequestParameters,
    tag::{compute_tag, derive_key},
};

use std::time::Duration;

/// Checks tags against a shared secret. Built once at startup and shared,
/// read-only, between request handlers.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: Vec<u8>,
    limits: Limits,
}

impl Authenticator {
    pub fn new(secret: &[u8], limits: Limits) -> Self {
        Self {
            secret: secret.to_vec(),
            limits,
        }
    }

    pub fn validate(
        &self,
        delay: &str,
        user: &str,
        tag: &str,
    ) -> Result<RequestParameters, AuthError> {
        Ok(RequestParameters::parse(delay, user, tag, &self.limits)?)
    }

    pub fn canonical_tag(&self, delay: u64, user: &[u8]) -> Vec<u8> {
        compute_tag(&derive_key(&self.secret, delay), user, self.limits.tag_len())
    }

    /// Run the leaky comparison of the supplied tag against the canonical
    /// one. Takes `params.delay` milliseconds per matching leading byte.
    pub async fn authenticate(&self, params: &RequestParameters) -> Result<(), AuthError> {
        let expected = self.canonical_tag(params.delay, &params.user);
        insecure_compare(
            &expected,
            &params.tag,
            Duration::from_millis(params.delay),
        )
        .await
    }

    pub async fn check(
        &self,
        delay: &str,
        user: &str,
        tag: &str,
    ) -> Result<RequestParameters, AuthError> {
        let params = self.validate(delay, user, tag)?;
        self.authenticate(&params).await?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ValidationError;

    use rstest::rstest;
    use tokio::time::Instant;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"secret", Limits::default())
    }

    #[rstest]
    #[case("1", "alice", "1eda43dd", true)]
    #[case("2", "alice", "1eda43dd", false)]
    #[case("1", "alice", "0eda43dd", false)]
    #[case("1", "alice", "1eda43de", false)]
    #[case("1", "alice", "1edb43dd", false)]
    #[tokio::test]
    async fn authenticate_grants_only_canonical_tag(
        #[case] delay: &str,
        #[case] user: &str,
        #[case] tag: &str,
        #[case] ok: bool,
    ) {
        let auth = authenticator();
        let params = auth.validate(delay, user, tag).expect("bad test data");

        let result = auth.authenticate(&params).await;

        if ok {
            assert_eq!(result, Ok(()));
        } else {
            assert_eq!(result, Err(AuthError::TagMismatch));
        }
    }

    #[rstest]
    #[case(None, 4)]
    #[case(Some(0), 0)]
    #[case(Some(1), 1)]
    #[case(Some(2), 2)]
    #[case(Some(3), 3)]
    #[tokio::test(start_paused = true)]
    async fn latency_counts_matching_leading_bytes(
        #[case] flipped: Option<usize>,
        #[case] steps: u32,
    ) {
        let auth = authenticator();
        let delay = Duration::from_millis(100);
        let mut tag = auth.canonical_tag(100, b"alice");
        if let Some(i) = flipped {
            tag[i] ^= 0x01;
        }
        let start = Instant::now();

        let result = auth.check("100", "alice", &hex::encode(&tag)).await;

        let elapsed = start.elapsed();
        assert_eq!(result.is_ok(), flipped.is_none());
        assert!(elapsed >= delay * steps, "{:?}", elapsed);
        assert!(elapsed < delay * steps + delay / 2, "{:?}", elapsed);
    }

    #[test]
    fn canonical_tag_is_delay_specific() {
        let auth = authenticator();

        assert_eq!(hex::encode(auth.canonical_tag(1, b"alice")), "1eda43dd");
        assert_ne!(auth.canonical_tag(2, b"alice"), auth.canonical_tag(1, b"alice"));
    }

    #[test]
    fn canonical_tag_uses_configured_length() {
        let auth = Authenticator::new(b"secret", Limits::new(1000, 8, 32).unwrap());

        let tag = auth.canonical_tag(1, b"alice");

        assert_eq!(tag.len(), 32);
        assert_eq!(hex::encode(&tag[..4]), "1eda43dd");
    }

    #[tokio::test]
    async fn check_rejects_malformed_input_before_comparing() {
        let auth = authenticator();

        let result = auth.check("1001", "alice", "1eda43dd").await;

        assert_eq!(
            result,
            Err(AuthError::Malformed(ValidationError::DelayOutOfRange {
                max: 1000,
                got: 1001
            }))
        );
    }

    #[tokio::test]
    async fn check_returns_parameters_when_granted() {
        let auth = authenticator();

        let params = auth.check("+1", "alice", "1EDA43DD").await.unwrap();

        assert_eq!(params.delay, 1);
        assert_eq!(params.user, b"alice");
    }

    #[tokio::test]
    async fn check_at_max_delay_is_accepted() {
        let auth = Authenticator::new(b"secret", Limits::new(3, 8, 1).unwrap());
        let tag = hex::encode(auth.canonical_tag(3, b"bob"));

        assert!(auth.check("3", "bob", &tag).await.is_ok());
        assert!(matches!(
            auth.check("4", "bob", &tag).await,
            Err(AuthError::Malformed(ValidationError::DelayOutOfRange { .. }))
        ));
    }
}
