// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization decisions.
///
/// ## Roles
///
/// - `Patient` - Normal platform user, self-provisioned at signup
/// - `Provider` - Care provider, self-provisioned at signup, carries a specialty
/// - `Admin` - Administrative access; never self-provisioned, only assigned
///   through the explicit role-change operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Normal platform user
    Patient,
    /// Care provider (has a specialty)
    Provider,
    /// Full administrative access
    Admin,
}

impl Role {
    /// Parse role from string (case-insensitive).
    /// Used for request bodies and role hints in provider token metadata.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_uppercase().as_str() {
            "PATIENT" => Some(Role::Patient),
            "PROVIDER" => Some(Role::Provider),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether this role may be assigned at account creation.
    /// Admin accounts are never self-provisioned.
    pub fn is_self_service(&self) -> bool {
        matches!(self, Role::Patient | Role::Provider)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Patient => write!(f, "PATIENT"),
            Role::Provider => write!(f, "PROVIDER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_case_insensitively() {
        assert_eq!(Role::from_str("PATIENT"), Some(Role::Patient));
        assert_eq!(Role::from_str("patient"), Some(Role::Patient));
        assert_eq!(Role::from_str("Provider"), Some(Role::Provider));
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("SUPERUSER"), None);
        assert_eq!(Role::from_str(""), None);
    }

    #[test]
    fn only_patient_and_provider_are_self_service() {
        assert!(Role::Patient.is_self_service());
        assert!(Role::Provider.is_self_service());
        assert!(!Role::Admin.is_self_service());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"PATIENT\"");
        assert_eq!(serde_json::to_string(&Role::Provider).unwrap(), "\"PROVIDER\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(Role::Patient.to_string(), "PATIENT");
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }
}
