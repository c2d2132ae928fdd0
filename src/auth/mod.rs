// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication & Authorization
//!
//! Verification of provider-issued bearer credentials and role gating for
//! protected routes.
//!
//! ## Flow
//!
//! 1. Frontend authenticates the user with the identity provider (Clerk)
//! 2. Requests carry `Authorization: Bearer <JWT>`
//! 3. The guard:
//!    - extracts the bearer token (fail fast on malformed headers)
//!    - verifies signature, issuer, audience and expiry against cached JWKS
//!    - resolves the local user record via the identity sync service,
//!      creating it lazily at first sight
//!    - compares the record's role against the route's required set
//!
//! ## Security
//!
//! - Rejections are uniform on the wire; causes are only logged
//! - The local record is authoritative; token role claims are hints
//! - JWKS is cached with TTL so verification never blocks on the network
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod guard;
pub mod jwks;
pub mod roles;
pub mod verifier;

pub use claims::VerifiedClaims;
pub use error::AuthError;
pub use guard::{authorize, AdminOnly, Auth, CareTeamOnly};
pub use jwks::JwksManager;
pub use roles::Role;
pub use verifier::{bearer_token, CredentialVerifier, KeySource};
