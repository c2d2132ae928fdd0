// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory: create/read/update of local user records.
//!
//! The directory owns the storage invariants:
//!
//! - exactly one record per external identity, enforced atomically at
//!   creation so concurrent first-sight requests resolve to one winner
//! - `specialty` is present iff the role is PROVIDER; a specialty supplied
//!   for any other role is dropped silently (storage guarantee, not a
//!   caller obligation)
//! - ADMIN is never accepted at creation
//!
//! Reads are by external identity only; there is no listing operation.
//! The trait is the seam for the relational store; the in-memory
//! implementation backs tests and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Role;
use crate::models::{NewUser, UserRecord};

/// Directory operation failure.
#[derive(Debug, Error, PartialEq)]
pub enum DirectoryError {
    /// A record already exists for this external identity. Callers must
    /// treat this as "someone else created it" and re-fetch, never as fatal.
    #[error("a user record already exists for this identity")]
    DuplicateIdentity,
    /// Role outside {PATIENT, PROVIDER} at creation time
    #[error("role must be PATIENT or PROVIDER at creation")]
    InvalidRole,
    /// No record for this external identity
    #[error("no user record for this identity")]
    NotFound,
    /// Store failure unrelated to the above
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Create/read/update operations against the local user record store,
/// keyed by external identity.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<UserRecord>, DirectoryError>;

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, DirectoryError>;

    async fn update_role(
        &self,
        auth_id: &str,
        role: Role,
        specialty: Option<String>,
    ) -> Result<UserRecord, DirectoryError>;

    async fn set_active(&self, auth_id: &str, active: bool) -> Result<UserRecord, DirectoryError>;
}

/// In-memory directory keyed by external identity.
#[derive(Default)]
pub struct InMemoryDirectory {
    records: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Keep the specialty invariant: non-PROVIDER roles never carry one.
fn specialty_for(role: Role, specialty: Option<String>) -> Option<String> {
    match role {
        Role::Provider => specialty,
        _ => None,
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let records = self.records.read().await;
        Ok(records.get(auth_id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, DirectoryError> {
        if !new_user.role.is_self_service() {
            return Err(DirectoryError::InvalidRole);
        }

        // Check-and-insert under one write lock; this is the uniqueness
        // constraint concurrent first-sight requests race against.
        let mut records = self.records.write().await;
        if records.contains_key(&new_user.auth_id) {
            return Err(DirectoryError::DuplicateIdentity);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            auth_id: new_user.auth_id.clone(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            specialty: specialty_for(new_user.role, new_user.specialty),
            active: true,
            verified_at: Utc::now(),
        };
        records.insert(new_user.auth_id, record.clone());
        Ok(record)
    }

    async fn update_role(
        &self,
        auth_id: &str,
        role: Role,
        specialty: Option<String>,
    ) -> Result<UserRecord, DirectoryError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(auth_id).ok_or(DirectoryError::NotFound)?;
        record.role = role;
        record.specialty = specialty_for(role, specialty);
        Ok(record.clone())
    }

    async fn set_active(&self, auth_id: &str, active: bool) -> Result<UserRecord, DirectoryError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(auth_id).ok_or(DirectoryError::NotFound)?;
        record.active = active;
        Ok(record.clone())
    }
}
