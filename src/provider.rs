// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider metadata client.
//!
//! After a role is assigned locally, it is written back to the provider's
//! user metadata so subsequent tokens can carry it as an assertion. The
//! provider copy is a convenience cache; the local record stays the source
//! of truth, so every call here is best-effort from the caller's view.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Role;

/// Timeout for a single metadata request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Metadata write failure.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
}

/// Write access to the provider's user metadata, keyed by external identity.
#[async_trait]
pub trait MetadataWriter: Send + Sync {
    async fn write_role(
        &self,
        auth_id: &str,
        role: Role,
        specialty: Option<&str>,
    ) -> Result<(), MetadataError>;
}

/// HTTP client for the provider's user metadata API
/// (`PATCH {api_url}/v1/users/{id}/metadata`, bearer secret key).
pub struct ClerkMetadataClient {
    api_url: String,
    secret_key: String,
    http: reqwest::Client,
}

impl ClerkMetadataClient {
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            secret_key: secret_key.into(),
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl MetadataWriter for ClerkMetadataClient {
    async fn write_role(
        &self,
        auth_id: &str,
        role: Role,
        specialty: Option<&str>,
    ) -> Result<(), MetadataError> {
        let url = format!(
            "{}/v1/users/{auth_id}/metadata",
            self.api_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "public_metadata": {
                "role": role,
                "specialty": specialty,
            }
        });

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MetadataError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// No-op writer for deployments without provider API credentials.
pub struct NoopMetadataWriter;

#[async_trait]
impl MetadataWriter for NoopMetadataWriter {
    async fn write_role(
        &self,
        auth_id: &str,
        role: Role,
        _specialty: Option<&str>,
    ) -> Result<(), MetadataError> {
        tracing::debug!(%auth_id, %role, "metadata write-back skipped (no provider credentials)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_writer_always_succeeds() {
        let writer = NoopMetadataWriter;
        assert!(writer
            .write_role("user_1", Role::Patient, None)
            .await
            .is_ok());
    }

    #[test]
    fn metadata_body_serializes_role_uppercase() {
        let body = serde_json::json!({
            "public_metadata": { "role": Role::Provider, "specialty": "Oncology" }
        });
        assert_eq!(body["public_metadata"]["role"], "PROVIDER");
    }
}
