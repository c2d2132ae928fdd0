// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified claims extracted from a bearer credential.

use serde::Deserialize;

use super::roles::Role;

/// Claims payload of a verified provider token.
///
/// Request-scoped and never persisted; reconstructed on every request by
/// the credential verifier. The subject is the external identity, the
/// durable join key between the provider and the local user directory.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedClaims {
    /// Subject - the canonical provider user identifier (external identity)
    pub sub: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer (the provider instance URL)
    #[serde(default)]
    pub iss: String,

    /// Audience (validated by the verifier, not read directly)
    #[serde(default)]
    pub aud: Option<serde_json::Value>,

    /// Primary email address, when the provider asserts it
    #[serde(default)]
    pub email: Option<String>,

    /// Display name, when the provider asserts it
    #[serde(default)]
    pub name: Option<String>,

    /// Provider public metadata (may carry a previously-synced role)
    #[serde(default, rename = "publicMetadata")]
    pub public_metadata: Option<PublicMetadata>,
}

/// Provider public metadata attached to tokens.
///
/// Anything here is a hint only. The local user record stays authoritative;
/// role divergence is resolved through the explicit role-change operation,
/// never by silently trusting a token claim.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PublicMetadata {
    /// Role previously written back to the provider
    #[serde(default)]
    pub role: Option<String>,

    /// Provider specialty, when the role hint is PROVIDER
    #[serde(default)]
    pub specialty: Option<String>,
}

impl VerifiedClaims {
    /// Role hint carried in provider metadata, if any.
    pub fn role_hint(&self) -> Option<Role> {
        self.public_metadata
            .as_ref()
            .and_then(|m| m.role.as_deref())
            .and_then(Role::from_str)
    }

    /// Specialty hint carried in provider metadata, if any.
    pub fn specialty_hint(&self) -> Option<String> {
        self.public_metadata
            .as_ref()
            .and_then(|m| m.specialty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_json() -> serde_json::Value {
        serde_json::json!({
            "sub": "user_2abc",
            "iat": 1700000000,
            "exp": 1700003600,
            "iss": "https://clerk.example.com",
            "aud": "https://clerk.example.com",
            "email": "pat@example.com",
            "name": "Pat Doe",
            "publicMetadata": { "role": "provider", "specialty": "Cardiology" }
        })
    }

    #[test]
    fn deserializes_provider_token_payload() {
        let claims: VerifiedClaims = serde_json::from_value(claims_json()).unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.email.as_deref(), Some("pat@example.com"));
        assert_eq!(claims.name.as_deref(), Some("Pat Doe"));
    }

    #[test]
    fn role_hint_comes_from_public_metadata() {
        let claims: VerifiedClaims = serde_json::from_value(claims_json()).unwrap();
        assert_eq!(claims.role_hint(), Some(Role::Provider));
        assert_eq!(claims.specialty_hint().as_deref(), Some("Cardiology"));
    }

    #[test]
    fn missing_metadata_yields_no_hints() {
        let claims: VerifiedClaims = serde_json::from_value(serde_json::json!({
            "sub": "user_2abc",
            "exp": 1700003600
        }))
        .unwrap();
        assert_eq!(claims.role_hint(), None);
        assert_eq!(claims.specialty_hint(), None);
    }

    #[test]
    fn unknown_role_hint_is_ignored() {
        let claims: VerifiedClaims = serde_json::from_value(serde_json::json!({
            "sub": "user_2abc",
            "exp": 1700003600,
            "publicMetadata": { "role": "superuser" }
        }))
        .unwrap();
        assert_eq!(claims.role_hint(), None);
    }
}
