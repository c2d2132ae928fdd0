// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only user management endpoints.
//!
//! Role changes happen here and nowhere else: a diverging role claim in a
//! provider token never changes the local record.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::users::UserResponse;
use crate::auth::{AdminOnly, Role};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /v1/users/{auth_id}/role.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    /// New role (PATIENT, PROVIDER or ADMIN)
    pub role: String,
    /// Specialty; only honored when the new role is PROVIDER
    #[serde(default)]
    pub specialty: Option<String>,
}

/// Change a user's role.
///
/// The new role is written back to the provider metadata store so future
/// tokens carry it.
#[utoipa::path(
    put,
    path = "/v1/users/{auth_id}/role",
    tag = "Admin",
    security(("bearer" = [])),
    params(("auth_id" = String, Path, description = "External identity")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Updated user record", body = UserResponse),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "No record for this identity"),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Authorization error"),
    )
)]
pub async fn change_user_role(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(auth_id): Path<String>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = Role::from_str(&request.role)
        .ok_or_else(|| ApiError::bad_request("unknown role"))?;

    tracing::info!(admin = %admin.auth_id, target = %auth_id, %role, "admin role change");
    let record = state
        .sync
        .change_role(&auth_id, role, request.specialty)
        .await?;
    Ok(Json(record.into()))
}

/// Deactivate a user record.
///
/// Records are never deleted; deactivated users are denied on every
/// protected route regardless of role.
#[utoipa::path(
    delete,
    path = "/v1/users/{auth_id}",
    tag = "Admin",
    security(("bearer" = [])),
    params(("auth_id" = String, Path, description = "External identity")),
    responses(
        (status = 200, description = "Deactivated user record", body = UserResponse),
        (status = 404, description = "No record for this identity"),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Authorization error"),
    )
)]
pub async fn deactivate_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(auth_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    tracing::info!(admin = %admin.auth_id, target = %auth_id, "admin deactivation");
    let record = state.sync.deactivate(&auth_id).await?;
    Ok(Json(record.into()))
}
