// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use care_identity_server::{
    api::router,
    auth::{CredentialVerifier, JwksManager, KeySource},
    config::{
        CLERK_API_URL_ENV, CLERK_AUDIENCE_ENV, CLERK_ISSUER_ENV, CLERK_JWKS_URL_ENV,
        CLERK_SECRET_KEY_ENV, DEFAULT_CLERK_API_URL, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV,
    },
    directory::InMemoryDirectory,
    provider::{ClerkMetadataClient, MetadataWriter, NoopMetadataWriter},
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Provider identity for token verification. Audience falls back to the
    // issuer: the provider identifier serves as both.
    let jwks_url = env::var(CLERK_JWKS_URL_ENV)
        .unwrap_or_else(|_| panic!("{CLERK_JWKS_URL_ENV} must be set"));
    let issuer =
        env::var(CLERK_ISSUER_ENV).unwrap_or_else(|_| panic!("{CLERK_ISSUER_ENV} must be set"));
    let audience = env::var(CLERK_AUDIENCE_ENV).unwrap_or_else(|_| issuer.clone());

    let jwks = JwksManager::new(jwks_url);
    let verifier = CredentialVerifier::new(KeySource::Jwks(jwks.clone()), issuer, audience);

    // Metadata write-back is best-effort; without credentials it is a no-op.
    let metadata: Arc<dyn MetadataWriter> = match env::var(CLERK_SECRET_KEY_ENV) {
        Ok(secret_key) => {
            let api_url =
                env::var(CLERK_API_URL_ENV).unwrap_or_else(|_| DEFAULT_CLERK_API_URL.to_string());
            Arc::new(ClerkMetadataClient::new(api_url, secret_key))
        }
        Err(_) => {
            tracing::warn!(
                "{CLERK_SECRET_KEY_ENV} not set; provider metadata write-back disabled"
            );
            Arc::new(NoopMetadataWriter)
        }
    };

    let state = AppState::new(
        Arc::new(InMemoryDirectory::new()),
        metadata,
        verifier,
        Some(jwks),
    );
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("care identity server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
