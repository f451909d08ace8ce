//! In-memory auth driver for tests

use crate::core::{FirekitError, FirekitResult};
use crate::di::traits::{AuthDriver, CreateUser, UserRecord, VerifiedToken};
use crate::guard::{ensure_env_not_prod, EnvGuard};
use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Auth driver backed by a map of users
///
/// Token verification only checks the token's shape: three dot-separated
/// parts whose middle part is base64 JSON with a `sub` claim naming a known
/// user. Signatures are never checked, which is why construction goes
/// through the production guard.
#[derive(Debug)]
pub struct MemoryAuthDriver {
    users: Mutex<HashMap<String, UserRecord>>,
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
}

impl MemoryAuthDriver {
    /// Create an empty driver after checking the process environment
    ///
    /// # Errors
    ///
    /// [`FirekitError::UnsafeEnvironment`] if the environment looks like production.
    pub fn new() -> FirekitResult<Self> {
        ensure_env_not_prod()?;
        Ok(Self::empty())
    }

    /// Create an empty driver, checking `guard` instead of the process-wide one
    pub fn with_guard(guard: &EnvGuard) -> FirekitResult<Self> {
        guard.ensure_safe()?;
        Ok(Self::empty())
    }

    fn empty() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    fn users(&self) -> MutexGuard<'_, HashMap<String, UserRecord>> {
        self.users
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a user
    pub fn insert_user(&self, request: CreateUser) -> FirekitResult<UserRecord> {
        let uid = request.uid.ok_or(FirekitError::UidRequired)?;

        let mut users = self.users();
        if users.contains_key(&uid) {
            return Err(FirekitError::UserAlreadyExists(uid));
        }

        let record = UserRecord {
            uid: uid.clone(),
            email: request.email.unwrap_or_default(),
        };
        users.insert(uid, record.clone());
        debug!(uid = %record.uid, "created in-memory user");
        Ok(record)
    }

    /// Check a token's shape and that its subject is a known user
    pub fn verify_token(&self, token: &str) -> FirekitResult<VerifiedToken> {
        let uid = token_subject(token)?;
        if !self.users().contains_key(&uid) {
            return Err(FirekitError::UserNotFound(uid));
        }
        Ok(VerifiedToken { uid })
    }

    /// Look up a user by uid
    pub fn user(&self, uid: &str) -> Option<UserRecord> {
        self.users().get(uid).cloned()
    }

    /// Number of stored users
    pub fn user_count(&self) -> usize {
        self.users().len()
    }

    /// Remove every user
    pub fn reset_users(&self) {
        self.users().clear();
        debug!("cleared in-memory users");
    }
}

#[async_trait]
impl AuthDriver for MemoryAuthDriver {
    async fn create_user(&self, request: CreateUser) -> FirekitResult<UserRecord> {
        self.insert_user(request)
    }

    async fn verify_id_token(&self, token: &str) -> FirekitResult<VerifiedToken> {
        self.verify_token(token)
    }
}

/// Extract the `sub` claim from a three-part token without verifying it
pub fn token_subject(token: &str) -> FirekitResult<String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(FirekitError::InvalidTokenStructure(parts.len()));
    }

    let payload = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| FirekitError::InvalidTokenPayload(format!("not base64: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| FirekitError::InvalidTokenPayload(e.to_string()))?;

    Ok(claims.sub)
}

/// Build an unsigned token that [`MemoryAuthDriver`] accepts for `uid`
pub fn fake_id_token(uid: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "sub": uid }).to_string());
    format!("{}.{}.unsigned", header, payload)
}
