//! User lookup capability
//!
//! Membership operations need user identity data (username, email) for
//! conflict checks and member listings. The user directory is owned by the
//! identity subsystem; this module defines the narrow lookup trait the
//! platform crates consume.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Profile data returned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub id: Uuid,

    /// Login name, unique platform-wide
    pub username: String,

    /// Email address
    pub email: String,

    /// Display name shown in member listings
    pub display_name: String,

    /// Account status as reported by the directory, e.g. `"active"`
    pub status: String,
}

impl UserProfile {
    /// Creates an active profile with the display name defaulting to the
    /// username.
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use atrium_core::UserProfile;
    ///
    /// let profile = UserProfile::new(Uuid::now_v7(), "ada", "ada@example.com");
    /// assert_eq!(profile.display_name, "ada");
    /// assert_eq!(profile.status, "active");
    /// ```
    pub fn new(id: Uuid, username: impl Into<String>, email: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            display_name: username.clone(),
            username,
            email: email.into(),
            status: "active".to_string(),
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the account status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Errors surfaced by user lookup implementations.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// No user matches the requested id.
    #[error("user not found")]
    NotFound,

    /// The lookup backend failed.
    #[error("user lookup error: {0}")]
    Backend(String),
}

/// Read-only access to user profiles.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Resolves a user profile by id.
    async fn get_user(&self, user_id: Uuid) -> Result<UserProfile, LookupError>;
}
