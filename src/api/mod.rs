// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::Role;
use crate::state::AppState;

pub mod admin;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route("/users/{auth_id}/role", put(admin::change_user_role))
        .route("/users/{auth_id}", delete(admin::deactivate_user));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::get_current_user,
        admin::change_user_role,
        admin::deactivate_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Role,
            users::CreateUserRequest,
            users::UserResponse,
            admin::ChangeRoleRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Users", description = "User provisioning and self-lookup"),
        (name = "Admin", description = "Administrative user management"),
        (name = "Health", description = "Health and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::for_tests());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
