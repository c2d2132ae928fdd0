// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names used throughout the
//! application. Configuration is loaded from the environment at startup;
//! there is no re-reading in request handlers.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CLERK_JWKS_URL` | Provider JWKS endpoint for JWT verification | Required |
//! | `CLERK_ISSUER` | Expected JWT issuer claim | Required |
//! | `CLERK_AUDIENCE` | Expected JWT audience claim | Falls back to `CLERK_ISSUER` |
//! | `CLERK_API_URL` | Provider management API base URL | `https://api.clerk.com` |
//! | `CLERK_SECRET_KEY` | Provider API key for metadata write-back | Optional (write-back disabled) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Provider JWKS endpoint for JWT signature verification.
pub const CLERK_JWKS_URL_ENV: &str = "CLERK_JWKS_URL";

/// Expected issuer claim (the provider instance URL).
pub const CLERK_ISSUER_ENV: &str = "CLERK_ISSUER";

/// Expected audience claim. Falls back to the issuer when unset, since the
/// provider identifier serves as both.
pub const CLERK_AUDIENCE_ENV: &str = "CLERK_AUDIENCE";

/// Provider management API base URL for the metadata write-back.
pub const CLERK_API_URL_ENV: &str = "CLERK_API_URL";

/// Default provider management API base URL.
pub const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com";

/// Provider API secret key. When unset, metadata write-back is disabled.
pub const CLERK_SECRET_KEY_ENV: &str = "CLERK_SECRET_KEY";

/// Server bind address.
pub const HOST_ENV: &str = "HOST";

/// Server bind port.
pub const PORT_ENV: &str = "PORT";

/// Logging format selector (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
