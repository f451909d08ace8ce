use thiserror::Error;

pub type FirekitResult<T> = Result<T, FirekitError>;

#[derive(Error, Debug)]
pub enum FirekitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A required configuration key was absent.
    #[error("Missing required configuration '{key}'{}", message_suffix(.message))]
    MissingConfig {
        key: String,
        message: Option<String>,
    },

    /// `make` was called for an identifier with no registered factory.
    #[error("No binding registered for '{0}'")]
    Unbound(String),

    /// A factory produced a service of a different kind than the caller asked for.
    #[error("Binding for '{id}' did not produce a {expected}")]
    BindingMismatch { id: String, expected: &'static str },

    #[error("uid required")]
    UidRequired,

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid token structure: expected 3 dot-separated parts, got {0}")]
    InvalidTokenStructure(usize),

    #[error("Invalid token payload: {0}")]
    InvalidTokenPayload(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The auth backend matched no account to an ID token.
    #[error("ID token not recognized")]
    UnrecognizedToken,

    /// An environment variable looks like it points at production.
    #[error("Environment looks like production: {name}={value}")]
    UnsafeEnvironment { name: String, value: String },

    /// The remote service answered with a non-success status.
    #[error("Remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_with_message() {
        let err = FirekitError::MissingConfig {
            key: "FIREBASE_PROJECT_ID".to_string(),
            message: Some("set it in config.yaml".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration 'FIREBASE_PROJECT_ID': set it in config.yaml"
        );
    }

    #[test]
    fn test_missing_config_without_message() {
        let err = FirekitError::MissingConfig {
            key: "FIREBASE_PROJECT_ID".to_string(),
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration 'FIREBASE_PROJECT_ID'"
        );
    }

    #[test]
    fn test_unbound_names_identifier() {
        let err = FirekitError::Unbound("auth".to_string());
        assert!(err.to_string().contains("'auth'"));
    }
}
