// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-wide application state.
//!
//! Constructed once at startup and shared by reference into every request;
//! request handlers never construct their own store or provider clients.

use std::sync::Arc;

use crate::auth::{CredentialVerifier, JwksManager};
use crate::directory::UserDirectory;
use crate::provider::MetadataWriter;
use crate::sync::IdentitySyncService;

#[derive(Clone)]
pub struct AppState {
    /// Bearer credential verification
    pub verifier: Arc<CredentialVerifier>,
    /// Identity synchronization against the user directory
    pub sync: Arc<IdentitySyncService>,
    /// JWKS handle for the readiness check (absent with a static key source)
    pub jwks: Option<JwksManager>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        metadata: Arc<dyn MetadataWriter>,
        verifier: CredentialVerifier,
        jwks: Option<JwksManager>,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            sync: Arc::new(IdentitySyncService::new(directory, metadata)),
            jwks,
        }
    }

    /// State backed by the in-memory directory, a no-op metadata writer and
    /// the shared test signing secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::auth::verifier::test_tokens::test_verifier;
        use crate::directory::InMemoryDirectory;
        use crate::provider::NoopMetadataWriter;

        Self::new(
            Arc::new(InMemoryDirectory::new()),
            Arc::new(NoopMetadataWriter),
            test_verifier(),
            None,
        )
    }
}
