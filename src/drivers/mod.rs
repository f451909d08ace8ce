//! Auth and database drivers
//!
//! The Firebase drivers forward to the REST APIs. The memory drivers keep
//! everything in process and refuse to start when the environment looks like
//! production.

pub mod firebase_auth;
pub mod memory_auth;
pub mod memory_database;
pub mod realtime_database;

pub use firebase_auth::FirebaseAuthDriver;
pub use memory_auth::{fake_id_token, MemoryAuthDriver};
pub use memory_database::MemoryDatabaseDriver;
pub use realtime_database::RealtimeDatabaseDriver;

use crate::core::{FirekitError, FirekitResult};
use reqwest::Response;
use std::fmt;

/// Turn a non-success response into [`FirekitError::Remote`]
///
/// Both Identity Toolkit (`{"error": {"message": ..}}`) and Realtime Database
/// (`{"error": ".."}`) error bodies are understood; anything else is reported
/// verbatim.
pub(crate) async fn ensure_success(response: Response) -> FirekitResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(FirekitError::Remote {
        status: status.as_u16(),
        message: describe_body(response.text().await),
    })
}

/// Error message from a body read; a failed read is reported, not dropped
fn describe_body<E: fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => remote_message(&body),
        Err(e) => format!("failed to read error body: {e}"),
    }
}

fn remote_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    match error {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => body.to_string(),
    }
}
