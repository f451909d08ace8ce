use crate::core::path::config_file;
use crate::core::{FirekitError, FirekitResult};
use crate::di::ConfigProvider;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Google Cloud project id
pub const PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
/// Web API key, used for `accounts:lookup`
pub const API_KEY: &str = "FIREBASE_API_KEY";
/// OAuth2 access token for admin calls
pub const ACCESS_TOKEN: &str = "FIREBASE_ACCESS_TOKEN";
/// Realtime Database root, e.g. `https://demo-default-rtdb.firebaseio.com`
pub const DATABASE_URL: &str = "FIREBASE_DATABASE_URL";
/// Identity Toolkit base URL override
pub const AUTH_URL: &str = "FIREBASE_AUTH_URL";

/// Identity Toolkit base URL used when [`AUTH_URL`] is unset
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";

/// Flat key/value configuration
///
/// Values come from an optional YAML file of scalar entries, overlaid by the
/// process environment. Environment variables win over file entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Load config from the platform config file and the environment
    ///
    /// Config locations:
    /// - `$FIREKIT_CONFIG` when set
    /// - Windows: %APPDATA%\firekit\config.yaml
    /// - Linux: ~/.config/firekit/config.yaml
    /// - macOS: ~/Library/Application Support/firekit/config.yaml
    ///
    /// A missing file is treated as empty.
    pub fn load() -> FirekitResult<Self> {
        let mut config = Self::from_file(&config_file()?)?;
        config.overlay(process_env());
        Ok(config)
    }

    /// Build config from the environment alone
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.overlay(process_env());
        config
    }

    /// Build config from explicit pairs
    pub fn from_map<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        config.overlay(values);
        config
    }

    /// Read a YAML file of scalar entries; a missing file yields an empty config
    pub fn from_file(path: &Path) -> FirekitResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse YAML content into a flat config
    ///
    /// Strings, numbers and booleans are kept as their string form; null
    /// entries are skipped. Nested mappings and sequences are rejected.
    pub fn parse_yaml(content: &str) -> FirekitResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(content)?;
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            let value = match value {
                serde_yaml::Value::Null => continue,
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                _ => {
                    return Err(FirekitError::Config(format!(
                        "Config key '{}' must be a scalar value",
                        key
                    )))
                }
            };
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    /// Set or replace entries
    pub fn overlay<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no entries are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Process environment, skipping entries that are not valid UTF-8
fn process_env() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}

impl ConfigProvider for Config {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
