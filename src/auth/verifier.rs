// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential verification.
//!
//! `verify` checks signature, issuer, audience and expiry against the
//! provider's published key material and returns the verified claims, or a
//! uniform rejection. Callers never learn which check failed; the cause is
//! logged here for operational diagnosis.
//!
//! Bearer extraction is a separate step so malformed headers fail fast
//! without invoking any cryptographic work.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::claims::VerifiedClaims;
use super::error::{AuthError, TokenRejection};
use super::jwks::JwksManager;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Source of token decoding keys.
///
/// Production uses the provider's JWKS endpoint. The static variant carries
/// a fixed key for tests and local development, keeping verification fully
/// offline in both modes.
pub enum KeySource {
    /// Cached provider JWKS
    Jwks(JwksManager),
    /// Fixed key, e.g. an HS256 secret in tests
    Static {
        key: DecodingKey,
        algorithm: Algorithm,
    },
}

/// Verifies inbound bearer tokens against the provider's key material.
pub struct CredentialVerifier {
    keys: KeySource,
    issuer: String,
    audience: String,
}

impl CredentialVerifier {
    /// Create a verifier for the configured provider identity.
    ///
    /// Both issuer and audience are compared for equality against the
    /// token on every verification.
    pub fn new(keys: KeySource, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Verify a bearer token and return its claims.
    ///
    /// All failure modes collapse into `AuthError::InvalidCredential`; the
    /// specific cause is logged at warn level.
    pub async fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        match self.check(token).await {
            Ok(claims) => Ok(claims),
            Err(cause) => {
                tracing::warn!(cause = %cause, "bearer credential rejected");
                Err(AuthError::InvalidCredential)
            }
        }
    }

    async fn check(&self, token: &str) -> Result<VerifiedClaims, TokenRejection> {
        let header = decode_header(token).map_err(|_| TokenRejection::Malformed)?;

        let (decoding_key, algorithm) = match &self.keys {
            KeySource::Static { key, algorithm } => (key.clone(), *algorithm),
            KeySource::Jwks(jwks) => match &header.kid {
                Some(kid) => jwks.decoding_key(kid).await?,
                None => jwks.any_decoding_key().await?,
            },
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data =
            decode::<VerifiedClaims>(token, &decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenRejection::BadSignature
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        TokenRejection::WrongAudience
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        TokenRejection::NotYetValid
                    }
                    _ => TokenRejection::Malformed,
                }
            })?;

        Ok(token_data.claims)
    }
}

/// Extract the bearer token from the Authorization header.
///
/// Missing or malformed headers are `NoCredential`; the verifier is never
/// invoked for them.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::NoCredential)?
        .to_str()
        .map_err(|_| AuthError::NoCredential)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::NoCredential)
}

#[cfg(test)]
pub(crate) mod test_tokens {
    //! Helpers for issuing signed test tokens through the static key source.

    use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};

    use super::{CredentialVerifier, KeySource};

    pub const TEST_SECRET: &[u8] = b"test-signing-secret";
    pub const TEST_ISSUER: &str = "https://clerk.test.accounts.dev";

    /// Verifier wired to the shared test secret.
    pub fn test_verifier() -> CredentialVerifier {
        CredentialVerifier::new(
            KeySource::Static {
                key: DecodingKey::from_secret(TEST_SECRET),
                algorithm: Algorithm::HS256,
            },
            TEST_ISSUER,
            TEST_ISSUER,
        )
    }

    /// Sign an arbitrary claims payload with the shared test secret.
    pub fn sign(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap()
    }

    /// A well-formed token for `sub` with a role hint, expiring in an hour.
    pub fn issue(sub: &str, role: &str) -> String {
        sign(&serde_json::json!({
            "sub": sub,
            "iat": now() - 10,
            "exp": now() + 3600,
            "iss": TEST_ISSUER,
            "aud": TEST_ISSUER,
            "email": format!("{sub}@example.com"),
            "name": "Test User",
            "publicMetadata": { "role": role }
        }))
    }

    pub fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use super::test_tokens::{issue, now, sign, test_verifier, TEST_ISSUER};
    use super::*;

    fn valid_claims() -> serde_json::Value {
        serde_json::json!({
            "sub": "user_2abc",
            "iat": now() - 10,
            "exp": now() + 3600,
            "iss": TEST_ISSUER,
            "aud": TEST_ISSUER,
            "publicMetadata": { "role": "patient" }
        })
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let verifier = test_verifier();
        let claims = verifier.verify(&sign(&valid_claims())).await.unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.iss, TEST_ISSUER);
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let verifier = test_verifier();
        let mut claims = valid_claims();
        claims["iss"] = "https://evil.example.com".into();
        let result = verifier.verify(&sign(&claims)).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let verifier = test_verifier();
        let mut claims = valid_claims();
        claims["aud"] = "https://other.example.com".into();
        let result = verifier.verify(&sign(&claims)).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let verifier = test_verifier();
        let mut claims = valid_claims();
        // Beyond the 60s clock skew leeway.
        claims["exp"] = (now() - 120).into();
        let result = verifier.verify(&sign(&claims)).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn token_signed_with_other_key_is_rejected() {
        let verifier = test_verifier();
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &valid_claims(),
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();
        let result = verifier.verify(&forged).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn tampered_signature_byte_is_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let verifier = test_verifier();
        let token = sign(&valid_claims());

        // Flip one bit in the signature segment and reassemble the token.
        let (prefix, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{prefix}.{}", URL_SAFE_NO_PAD.encode(bytes));

        let result = verifier.verify(&tampered).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let verifier = test_verifier();
        let result = verifier.verify("not-a-jwt").await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredential);
    }

    #[tokio::test]
    async fn issued_helper_token_round_trips() {
        let verifier = test_verifier();
        let claims = verifier.verify(&issue("user_2xyz", "provider")).await.unwrap();
        assert_eq!(claims.sub, "user_2xyz");
        assert_eq!(claims.role_hint(), Some(crate::auth::Role::Provider));
    }

    #[test]
    fn bearer_token_requires_header() {
        let headers = HeaderMap::new();
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            AuthError::NoCredential
        );
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            AuthError::NoCredential
        );
    }

    #[test]
    fn bearer_token_rejects_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            AuthError::NoCredential
        );
    }

    #[test]
    fn bearer_token_extracts_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
