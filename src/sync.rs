// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity synchronization between the provider and the local directory.
//!
//! `ensure_synced` guarantees exactly one local user record per external
//! identity. Existing records are returned unchanged (mirroring is
//! create-time only); unseen identities are created lazily from the
//! verified claims plus a role hint. The create path is the only contended
//! operation: losing the first-sight race surfaces as `DuplicateIdentity`
//! from the directory and is resolved by a re-fetch, never by retrying the
//! create and never as a caller-visible error.
//!
//! After any local role assignment the role is written back to the
//! provider's metadata store so future tokens can assert it. The write-back
//! is fire-and-forget: a spawned task with bounded retries whose failure is
//! logged and never propagated, because the local record is already the
//! source of truth.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::auth::{Role, VerifiedClaims};
use crate::directory::{DirectoryError, UserDirectory};
use crate::models::{NewUser, ProfileHints, UserRecord};
use crate::provider::MetadataWriter;

/// Bounded retries for the provider metadata write-back.
const WRITE_BACK_ATTEMPTS: u32 = 3;

/// Base delay between write-back attempts (multiplied by the attempt number).
const WRITE_BACK_BACKOFF: Duration = Duration::from_millis(500);

/// Synchronization failure surfaced to callers.
///
/// `DuplicateIdentity` never appears here; it is absorbed by the re-fetch
/// fallback inside the service.
#[derive(Debug, Error, PartialEq)]
pub enum SyncError {
    /// Requested role outside {PATIENT, PROVIDER} at first sight
    #[error("role must be PATIENT or PROVIDER")]
    InvalidRole,
    /// No record for this identity (role change / deactivation only)
    #[error("no user record for this identity")]
    NotFound,
    /// Store unavailable or unexpected constraint violation. Callers must
    /// deny rather than fail open.
    #[error("identity sync failed: {0}")]
    Failed(String),
}

impl From<DirectoryError> for SyncError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::InvalidRole => SyncError::InvalidRole,
            DirectoryError::NotFound => SyncError::NotFound,
            other => SyncError::Failed(other.to_string()),
        }
    }
}

/// Reconciles provider-issued identities with the local user directory.
pub struct IdentitySyncService {
    directory: Arc<dyn UserDirectory>,
    metadata: Arc<dyn MetadataWriter>,
}

impl IdentitySyncService {
    pub fn new(directory: Arc<dyn UserDirectory>, metadata: Arc<dyn MetadataWriter>) -> Self {
        Self {
            directory,
            metadata,
        }
    }

    /// Ensure exactly one local record exists for the claims' subject.
    ///
    /// Sequential calls are idempotent: the second call finds the record
    /// and performs no create. `requested_role` is only consulted at first
    /// sight and must be PATIENT or PROVIDER.
    pub async fn ensure_synced(
        &self,
        claims: &VerifiedClaims,
        requested_role: Option<Role>,
        hints: ProfileHints,
    ) -> Result<UserRecord, SyncError> {
        if let Some(existing) = self.directory.find_by_auth_id(&claims.sub).await? {
            return Ok(existing);
        }

        // First sight of this identity.
        let role = requested_role.ok_or(SyncError::InvalidRole)?;
        self.provision(NewUser {
            auth_id: claims.sub.clone(),
            email: hints.email.unwrap_or_default(),
            name: hints.name.unwrap_or_default(),
            role,
            specialty: hints.specialty,
        })
        .await
    }

    /// Create a user record, falling back to the existing record when the
    /// identity is already provisioned. Used both by the first-sight path
    /// and by the explicit `POST /users` provisioning route, so retries of
    /// either are idempotent.
    pub async fn provision(&self, new_user: NewUser) -> Result<UserRecord, SyncError> {
        if !new_user.role.is_self_service() {
            return Err(SyncError::InvalidRole);
        }

        let auth_id = new_user.auth_id.clone();
        match self.directory.create(new_user).await {
            Ok(record) => {
                tracing::info!(auth_id = %record.auth_id, role = %record.role, "user record created");
                self.spawn_role_write_back(
                    record.auth_id.clone(),
                    record.role,
                    record.specialty.clone(),
                );
                Ok(record)
            }
            Err(DirectoryError::DuplicateIdentity) => {
                // Lost the first-sight race; the winner's record is it.
                self.directory
                    .find_by_auth_id(&auth_id)
                    .await?
                    .ok_or_else(|| {
                        SyncError::Failed("record missing after duplicate-create".into())
                    })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Explicit administrative role change. Roles are never inferred from
    /// token claims; this is the only way a role changes after creation.
    pub async fn change_role(
        &self,
        auth_id: &str,
        role: Role,
        specialty: Option<String>,
    ) -> Result<UserRecord, SyncError> {
        let record = self.directory.update_role(auth_id, role, specialty).await?;
        tracing::info!(%auth_id, role = %record.role, "user role changed");
        self.spawn_role_write_back(
            record.auth_id.clone(),
            record.role,
            record.specialty.clone(),
        );
        Ok(record)
    }

    /// Deactivate a record. Records are never deleted by this service.
    pub async fn deactivate(&self, auth_id: &str) -> Result<UserRecord, SyncError> {
        let record = self.directory.set_active(auth_id, false).await?;
        tracing::info!(%auth_id, "user record deactivated");
        Ok(record)
    }

    /// Write the assigned role back to the provider metadata store.
    ///
    /// Decoupled from the caller's response path: runs on a spawned task
    /// with bounded retries, and its failure never blocks or fails the
    /// decision already made from local state.
    fn spawn_role_write_back(&self, auth_id: String, role: Role, specialty: Option<String>) {
        let metadata = Arc::clone(&self.metadata);
        tokio::spawn(async move {
            for attempt in 1..=WRITE_BACK_ATTEMPTS {
                match metadata
                    .write_role(&auth_id, role, specialty.as_deref())
                    .await
                {
                    Ok(()) => {
                        tracing::debug!(%auth_id, %role, "role written back to provider metadata");
                        return;
                    }
                    Err(err) if attempt < WRITE_BACK_ATTEMPTS => {
                        tracing::warn!(
                            %auth_id,
                            attempt,
                            error = %err,
                            "role write-back failed, will retry"
                        );
                        tokio::time::sleep(WRITE_BACK_BACKOFF * attempt).await;
                    }
                    Err(err) => {
                        tracing::error!(
                            %auth_id,
                            error = %err,
                            "role write-back abandoned; local record remains authoritative"
                        );
                    }
                }
            }
        });
    }
}
