//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::WELCOME_SETTING_ID;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
}

/// The app user the welcome messages are sent from
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WelcomeConfig {
    pub setting_id: String,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            setting_id: WELCOME_SETTING_ID.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "Welcome Bot".to_string(),
                username: "welcome.bot".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                path: PathBuf::from("welcome-bot.db"),
            },
            welcome: WelcomeConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.username.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.username".to_string()));
        }
        if self.welcome.setting_id.is_empty() {
            return Err(ConfigError::MissingField("welcome.setting-id".to_string()));
        }
        if self.bot.username.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "bot.username must not contain whitespace: {:?}",
                self.bot.username
            )));
        }
        Ok(())
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(username) = std::env::var("WELCOME_BOT_USERNAME") {
            config.bot.username = username;
        }

        if let Ok(path) = std::env::var("WELCOME_BOT_DB") {
            config.storage.path = PathBuf::from(path);
        }

        if let Ok(id) = std::env::var("WELCOME_BOT_SETTING_ID") {
            config.welcome.setting_id = id;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bot:
  name: Greeter
  username: greeter.bot
storage:
  backend: memory
  path: unused.db
welcome:
  setting-id: staging_welcome
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.username, "greeter.bot");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.welcome.setting_id, "staging_welcome");
    }

    #[test]
    fn test_welcome_section_is_optional() {
        let yaml = "bot:\n  name: G\n  username: g\nstorage:\n  backend: sqlite\n  path: g.db\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.welcome.setting_id, WELCOME_SETTING_ID);
    }

    #[test]
    fn test_rejects_blank_username() {
        let yaml = "bot:\n  name: G\n  username: ''\nstorage:\n  backend: sqlite\n  path: g.db\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::MissingField(_))));

        let yaml = "bot:\n  name: G\n  username: 'a b'\nstorage:\n  backend: sqlite\n  path: g.db\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let yaml = "bot:\n  name: G\n  username: g\nstorage:\n  backend: redis\n  path: g.db\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_default_roundtrips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.bot.username, "welcome.bot");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }
}
