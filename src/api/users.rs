// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User provisioning and self-lookup endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Auth, Role};
use crate::error::ApiError;
use crate::models::{NewUser, UserRecord};
use crate::state::AppState;

/// Request body for POST /v1/users.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Email address (already verified by the identity provider)
    pub email: String,
    /// Requested role; must be PATIENT or PROVIDER
    pub role: String,
    /// External identity issued by the provider
    #[serde(default)]
    pub auth_id: Option<String>,
    /// Display name
    pub name: String,
    /// Specialty; only honored when role is PROVIDER
    #[serde(default)]
    pub specialty: Option<String>,
}

/// User record as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Internal identifier
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Access role
    pub role: Role,
    /// Display name
    pub name: String,
    /// External identity
    pub auth_id: String,
    /// Specialty (null unless role is PROVIDER)
    pub specialty: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            role: record.role,
            name: record.name,
            auth_id: record.auth_id,
            specialty: record.specialty,
        }
    }
}

/// Provision a user record for an identity-provider account.
///
/// Called at signup, after the provider has created the account and
/// verified the email channel. Retries are idempotent: provisioning an
/// already-known external identity returns the existing record.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User record created", body = UserResponse),
        (status = 400, description = "Missing authId or invalid role"),
        (status = 500, description = "Unexpected failure"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let auth_id = request
        .auth_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("authId is required"))?;

    let role = Role::from_str(&request.role)
        .filter(Role::is_self_service)
        .ok_or_else(|| ApiError::bad_request("role must be PATIENT or PROVIDER"))?;

    let record = state
        .sync
        .provision(NewUser {
            auth_id,
            email: request.email,
            name: request.name,
            role,
            specialty: request.specialty,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Get the resolved user record for the authenticated caller.
///
/// Triggers lazy first-sight synchronization for identities the directory
/// has not seen yet.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Resolved user record", body = UserResponse),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Authorization error"),
    )
)]
pub async fn get_current_user(Auth(record): Auth) -> Json<UserResponse> {
    Json(record.into())
}
