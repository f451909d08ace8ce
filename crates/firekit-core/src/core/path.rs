use crate::core::error::{FirekitError, FirekitResult};
use std::path::PathBuf;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "FIREKIT_CONFIG";

/// Get the Firekit home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\firekit
/// - Linux: ~/.config/firekit
/// - macOS: ~/Library/Application Support/firekit
pub fn firekit_home() -> FirekitResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| FirekitError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("firekit"))
}

/// Get the config file path
///
/// `FIREKIT_CONFIG` wins when set; otherwise `config.yaml` under
/// [`firekit_home`].
pub fn config_file() -> FirekitResult<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(firekit_home()?.join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firekit_home_ends_with_name() {
        if let Ok(home) = firekit_home() {
            assert!(home.ends_with("firekit"));
        }
    }
}
