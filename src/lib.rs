// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Care Identity Server - Identity Sync & Authorization Service
//!
//! Reconciles accounts created by the external identity provider with the
//! locally owned user directory, verifies bearer credentials presented on
//! requests, and gates access to protected resources by role.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credential verification and the authorization guard
//! - `directory` - Local user record store (create/read/update by identity)
//! - `sync` - Identity synchronization and provider metadata write-back
//! - `provider` - Identity provider metadata client

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod provider;
pub mod state;
pub mod sync;
