// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Models
//!
//! The locally owned user record and the inputs used to create it. API
//! request/response shapes live next to their handlers in `api`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Role, VerifiedClaims};

/// The locally owned, authoritative representation of a user.
///
/// Exactly one record exists per external identity (`auth_id`); the
/// directory enforces the uniqueness. `specialty` is present if and only
/// if the role is PROVIDER, enforced on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    /// Internal identifier, system-assigned, immutable
    pub id: Uuid,
    /// External identity issued by the provider, immutable after first write
    pub auth_id: String,
    /// Email address mirrored from the provider at creation
    pub email: String,
    /// Display name mirrored from the provider at creation
    pub name: String,
    /// Access role; changes only through the explicit role-change operation
    pub role: Role,
    /// Medical specialty, present only for PROVIDER records
    pub specialty: Option<String>,
    /// Deactivated records are denied regardless of role
    pub active: bool,
    /// Set once at creation. The provider already verified the email
    /// channel; this is never re-derived locally.
    pub verified_at: DateTime<Utc>,
}

/// Fields for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub auth_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub specialty: Option<String>,
}

/// Profile attributes mirrored into a record at first sight.
///
/// Hints only; absent fields fall back to empty values rather than failing
/// the sync.
#[derive(Debug, Clone, Default)]
pub struct ProfileHints {
    pub email: Option<String>,
    pub name: Option<String>,
    pub specialty: Option<String>,
}

impl ProfileHints {
    /// Mirror whatever profile attributes the verified claims assert.
    pub fn from_claims(claims: &VerifiedClaims) -> Self {
        Self {
            email: claims.email.clone(),
            name: claims.name.clone(),
            specialty: claims.specialty_hint(),
        }
    }
}
