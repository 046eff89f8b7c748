//! Game configuration loaded from `~/.config/burger-rush/config.toml`.
//!
//! Every field has a default, so a missing file or an empty file yields the
//! standard three-minute game with the built-in menu.
//!
//! ```toml
//! session_seconds = 180
//! unlock_threshold = 4
//!
//! [oracle]
//! timeout_secs = 30
//! model = "gpt-4o-mini"
//!
//! [[recipe]]
//! name = "veggie burger"
//! components = ["bun", "lettuce", "tomato", "bun"]
//!
//! [components]
//! tomato = "two thick slices of red tomato"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BurgerError, Result};
use crate::oracle::MAX_SCORE;
use crate::recipe::{Recipe, RecipeCatalog};

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "burger-rush";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Time budget of one session
    pub session_seconds: u64,
    /// Minimum judged score that unlocks a component
    pub unlock_threshold: u8,
    pub oracle: OracleConfig,
    /// Replaces the built-in menu when non-empty
    #[serde(rename = "recipe", skip_serializing_if = "Vec::is_empty")]
    pub recipes: Vec<RecipeConfig>,
    /// Component descriptions sent to the judge, merged over the built-in ones
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub components: HashMap<String, String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session_seconds: 180,
            unlock_threshold: 4,
            oracle: OracleConfig::default(),
            recipes: Vec::new(),
            components: HashMap::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OracleConfig {
    pub timeout_secs: u64,
    pub model: String,
    pub max_tokens: u32,
    /// Inclusive range of the random score used when the judge fails
    pub fallback_min: u8,
    pub fallback_max: u8,
    /// minijinja template; `{{ component }}` is the component description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            fallback_min: 3,
            fallback_max: 8,
            prompt_template: None,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeConfig {
    pub name: String,
    pub components: Vec<String>,
}

impl GameConfig {
    /// Loads the config from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        let path = default_config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BurgerError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "Loaded game configuration");
        Ok(config)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(self.session_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_seconds == 0 {
            return Err(BurgerError::config("session_seconds must be positive"));
        }
        if self.unlock_threshold > MAX_SCORE {
            return Err(BurgerError::config(format!(
                "unlock_threshold must be at most {MAX_SCORE}"
            )));
        }
        let oracle = &self.oracle;
        if oracle.fallback_min > oracle.fallback_max || oracle.fallback_max > MAX_SCORE {
            return Err(BurgerError::config(format!(
                "fallback range {}..={} must lie within 0..={MAX_SCORE}",
                oracle.fallback_min, oracle.fallback_max
            )));
        }
        if oracle.timeout_secs == 0 {
            return Err(BurgerError::config("oracle.timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Builds the recipe catalog: the configured recipes if any, else the built-in menu.
    pub fn catalog(&self) -> Result<RecipeCatalog> {
        let builtin = RecipeCatalog::builtin();
        let recipes = if self.recipes.is_empty() {
            builtin.recipes().to_vec()
        } else {
            self.recipes
                .iter()
                .map(|r| Recipe::new(r.name.clone(), r.components.clone()))
                .collect()
        };

        let mut descriptions: HashMap<String, String> = recipes
            .iter()
            .flat_map(|r| r.components.iter())
            .map(|c| (c.clone(), builtin.describe(c).to_string()))
            .collect();
        descriptions.extend(self.components.clone());

        RecipeCatalog::new(recipes, descriptions)
    }
}

/// Returns `~/.config/burger-rush` (platform equivalent elsewhere).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| BurgerError::config("Could not determine config directory"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = write_config("");
        let config = GameConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.session_duration(), Duration::from_secs(180));
        assert_eq!(config.oracle.fallback_min, 3);
        assert_eq!(config.oracle.fallback_max, 8);
    }

    #[test]
    fn test_custom_recipes_replace_menu() {
        let file = write_config(
            r#"
session_seconds = 60

[[recipe]]
name = "veggie burger"
components = ["bun", "lettuce", "tomato", "bun"]

[components]
tomato = "two slices of tomato"
"#,
        );
        let config = GameConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.session_seconds, 60);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.recipes().len(), 1);
        assert_eq!(catalog.describe("tomato"), "two slices of tomato");
        assert_eq!(catalog.describe("lettuce"), "a fresh green lettuce leaf");
    }

    #[test]
    fn test_invalid_recipe_is_config_error() {
        let config = GameConfig {
            recipes: vec![RecipeConfig {
                name: "open".to_string(),
                components: vec!["bun".to_string(), "patty".to_string()],
            }],
            ..GameConfig::default()
        };
        assert!(config.catalog().unwrap_err().is_config());
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let file = write_config("[oracle]\nfallback_min = 9\nfallback_max = 4\n");
        assert!(GameConfig::load_from_path(file.path()).unwrap_err().is_config());

        let file = write_config("unlock_threshold = 11\n");
        assert!(GameConfig::load_from_path(file.path()).unwrap_err().is_config());

        let file = write_config("session_seconds = 0\n");
        assert!(GameConfig::load_from_path(file.path()).unwrap_err().is_config());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, BurgerError::Io { .. }));
    }
}
