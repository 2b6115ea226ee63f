//! Identity and session records.
//!
//! # Invariants
//! - `username` is the unique, case-sensitive key of an identity.
//! - Identities are append-only: never updated or deleted.
//!
//! # Security
//! `password` is stored and compared in cleartext. This is only tolerable
//! because every record stays in local storage on one device; it must not be
//! reused for anything networked or shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    /// Cleartext secret, see module docs.
    pub password: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Exact, case-sensitive match on both username and password.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// Public projection stored as the session marker.
    pub fn session(&self) -> Session {
        Session {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Public projection of the signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub display_name: String,
}
