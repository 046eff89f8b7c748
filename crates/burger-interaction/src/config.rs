//! Secret file management for Burger Rush.
//!
//! Supports reading API keys from `~/.config/burger-rush/secret.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Loads the secret configuration file from ~/.config/burger-rush/secret.json
pub fn load_secret_config() -> Result<SecretConfig, String> {
    load_secret_config_from(&get_secret_path()?)
}

pub fn load_secret_config_from(path: &Path) -> Result<SecretConfig, String> {
    if !path.exists() {
        return Err(format!("Secret file not found at: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read secret file at {}: {}", path.display(), e))?;

    // The error message never echoes file content.
    serde_json::from_str(&content).map_err(|e| {
        format!(
            "Failed to parse secret file at {}: line {}, column {}",
            path.display(),
            e.line(),
            e.column()
        )
    })
}

/// Returns the path to the secret file: ~/.config/burger-rush/secret.json
fn get_secret_path() -> Result<PathBuf, String> {
    burger_core::config::config_dir()
        .map(|dir| dir.join("secret.json"))
        .map_err(|e| e.to_string())
}
