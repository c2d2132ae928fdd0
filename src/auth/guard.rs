// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-time authorization guard.
//!
//! `authorize` is the single decision path for protected routes: extract
//! the bearer credential, verify it, resolve the local user record (lazily
//! creating it at first sight), then check the active flag and the route's
//! required role set. Every unrecovered failure is a denial; the guard
//! never fails open.
//!
//! Handlers use the extractors (`Auth`, `CareTeamOnly`, `AdminOnly`) rather
//! than calling `authorize` directly:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is the resolved UserRecord
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use super::error::AuthError;
use super::roles::Role;
use super::verifier::bearer_token;
use crate::models::{ProfileHints, UserRecord};
use crate::state::AppState;

/// Authorize a request against a required role set.
///
/// Returns the resolved user record on allow. The only side effect is the
/// lazy first-sight creation inside the sync service; no state accumulates
/// across calls beyond what the directory persists.
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    required_roles: &[Role],
) -> Result<UserRecord, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.verifier.verify(token).await?;

    let record = state
        .sync
        .ensure_synced(&claims, claims.role_hint(), ProfileHints::from_claims(&claims))
        .await
        .map_err(|err| {
            tracing::warn!(subject = %claims.sub, error = %err, "identity resolution failed");
            AuthError::ResolutionFailed
        })?;

    if !record.active {
        tracing::warn!(subject = %record.auth_id, "request denied for deactivated user");
        return Err(AuthError::Inactive);
    }

    if !required_roles.contains(&record.role) {
        tracing::warn!(
            subject = %record.auth_id,
            role = %record.role,
            "request denied for insufficient role"
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(record)
}

/// Extractor for any authenticated, active user.
pub struct Auth(pub UserRecord);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let record = authorize(
            state,
            &parts.headers,
            &[Role::Patient, Role::Provider, Role::Admin],
        )
        .await?;
        Ok(Auth(record))
    }
}

/// Extractor for care-team members (PATIENT or PROVIDER).
///
/// Administrative accounts are operational, not clinical; routes carrying
/// care data exclude them.
#[derive(Debug)]
pub struct CareTeamOnly(pub UserRecord);

impl FromRequestParts<AppState> for CareTeamOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let record = authorize(state, &parts.headers, &[Role::Patient, Role::Provider]).await?;
        Ok(CareTeamOnly(record))
    }
}

/// Extractor that requires the ADMIN role.
pub struct AdminOnly(pub UserRecord);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let record = authorize(state, &parts.headers, &[Role::Admin]).await?;
        Ok(AdminOnly(record))
    }
}
