//! Trait definitions for dependency injection

use crate::core::{FirekitError, FirekitResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for configuration access
///
/// Read-only view over a key/value source. Implementations only supply
/// [`get`](ConfigProvider::get); the rest derive from it.
pub trait ConfigProvider: Send + Sync {
    /// Get a value, or `None` if the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Check whether a key is present
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get a value, falling back to `default` when absent
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a value or fail with [`FirekitError::MissingConfig`]
    fn get_or_throw(&self, key: &str, message: Option<&str>) -> FirekitResult<String> {
        self.get(key).ok_or_else(|| FirekitError::MissingConfig {
            key: key.to_string(),
            message: message.map(str::to_string),
        })
    }
}

/// Input for [`AuthDriver::create_user`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreateUser {
    /// Request with a caller-chosen uid and no email
    pub fn with_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            email: None,
        }
    }

    /// Set the email address
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A user as stored by an auth driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    /// Empty when the user was created without one
    pub email: String,
}

/// Claims returned by a successful token verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedToken {
    pub uid: String,
}

/// Trait for authentication operations
///
/// Covers the two calls consuming code makes against the auth service:
/// creating users and verifying ID tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthDriver: Send + Sync {
    /// Create a user
    async fn create_user(&self, request: CreateUser) -> FirekitResult<UserRecord>;

    /// Verify an ID token and return the uid it was issued for
    async fn verify_id_token(&self, token: &str) -> FirekitResult<VerifiedToken>;
}

/// Trait for document storage operations
///
/// Documents are JSON values addressed by a slash-separated path.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Read the document at `path`, or `None` if nothing is stored there
    async fn get_document(&self, path: &str) -> FirekitResult<Option<serde_json::Value>>;

    /// Write (replace) the document at `path`
    async fn set_document(&self, path: &str, value: serde_json::Value) -> FirekitResult<()>;

    /// Delete the document at `path`; deleting a missing document is not an error
    async fn delete_document(&self, path: &str) -> FirekitResult<()>;
}
