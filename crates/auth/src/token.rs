//! Bearer token issue/verify.
//!
//! Tokens are HS256-signed JWTs carrying a username claim and an absolute
//! expiry. Verification is stateless and deterministic given a fixed secret:
//! there is no revocation list, expiry is the only invalidation mechanism.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use orla_core::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username of the authenticated user.
    pub sub: String,

    /// Absolute expiry as a unix timestamp (seconds).
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Signs and validates access tokens against a shared secret.
///
/// Construct once at startup from the configured secret and default TTL,
/// then pass by reference (or clone; the keys are cheap) to whoever needs
/// to mint or check tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    /// Issue a token for `subject` expiring after the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` with an explicit TTL override.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// Fails with `InvalidToken` on a bad signature, malformed payload,
    /// missing subject claim, or expiry. No leeway: a token is invalid the
    /// moment its expiry passes.
    pub fn verify(&self, token: &str) -> Result<String, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| DomainError::InvalidToken)?;
        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("TokenService")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(60))
    }

    #[test]
    fn issue_then_verify_yields_subject() {
        let svc = service();
        let token = svc.issue("maria").unwrap();
        assert_eq!(svc.verify(&token).unwrap(), "maria");
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let token = svc.issue_with_ttl("maria", Duration::seconds(-5)).unwrap();
        assert_eq!(svc.verify(&token), Err(DomainError::InvalidToken));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc.issue("maria").unwrap();

        // Flip one byte of the signature segment.
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(svc.verify(&tampered), Err(DomainError::InvalidToken));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue("maria").unwrap();
        let other = TokenService::new("another-secret", Duration::minutes(60));
        assert_eq!(other.verify(&token), Err(DomainError::InvalidToken));
    }

    #[test]
    fn missing_subject_claim_is_rejected() {
        let svc = service();
        let exp = (Utc::now() + Duration::minutes(10)).timestamp();
        let no_sub = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "exp": exp }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(svc.verify(&no_sub), Err(DomainError::InvalidToken));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service();
        assert_eq!(svc.verify(""), Err(DomainError::InvalidToken));
        assert_eq!(svc.verify("not.a.jwt"), Err(DomainError::InvalidToken));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: verify(issue(subject)) returns the original subject
            /// for any plausible username.
            #[test]
            fn subject_roundtrips(subject in "[A-Za-z0-9_.-]{1,40}") {
                let svc = service();
                let token = svc.issue(&subject).unwrap();
                prop_assert_eq!(svc.verify(&token).unwrap(), subject);
            }
        }
    }
}
