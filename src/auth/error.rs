// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! `AuthError` is the request-visible denial. Its HTTP body is deliberately
//! generic ("authentication error" / "authorization error") so a caller
//! probing with forged credentials cannot learn which check failed. The
//! precise cause is logged where the failure is detected.
//!
//! `TokenRejection` is the internal diagnosis of why a token was rejected.
//! It never leaves the process except through logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Request denial from the authorization guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No usable bearer credential on the request
    #[error("authentication error")]
    NoCredential,
    /// Bearer credential rejected by the verifier
    #[error("authentication error")]
    InvalidCredential,
    /// Identity could not be resolved against the local directory
    #[error("authentication error")]
    ResolutionFailed,
    /// The resolved user record is deactivated
    #[error("authorization error")]
    Inactive,
    /// The resolved role is not in the route's required set
    #[error("authorization error")]
    InsufficientRole,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// HTTP status for this denial.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoCredential
            | AuthError::InvalidCredential
            | AuthError::ResolutionFailed => StatusCode::UNAUTHORIZED,
            AuthError::Inactive | AuthError::InsufficientRole => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (self.status_code(), body).into_response()
    }
}

/// Internal cause of a token rejection, used for operational diagnosis.
#[derive(Debug, Error)]
pub enum TokenRejection {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token issuer mismatch")]
    WrongIssuer,
    #[error("token audience mismatch")]
    WrongAudience,
    #[error("token is not yet valid")]
    NotYetValid,
    #[error("no matching key in JWKS")]
    NoMatchingKey,
    #[error("unsupported key type in JWKS")]
    UnsupportedKey,
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn credential_failures_return_401_with_generic_body() {
        for err in [
            AuthError::NoCredential,
            AuthError::InvalidCredential,
            AuthError::ResolutionFailed,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], "authentication error");
        }
    }

    #[tokio::test]
    async fn authorization_failures_return_403_with_generic_body() {
        for err in [AuthError::Inactive, AuthError::InsufficientRole] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], "authorization error");
        }
    }

    #[test]
    fn denial_body_does_not_leak_the_failed_check() {
        // All 401 variants must be indistinguishable on the wire.
        assert_eq!(
            AuthError::InvalidCredential.to_string(),
            AuthError::NoCredential.to_string()
        );
        assert_eq!(
            AuthError::ResolutionFailed.to_string(),
            AuthError::NoCredential.to_string()
        );
    }
}
