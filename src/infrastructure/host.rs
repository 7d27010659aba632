//! Host wiring - builds the collaborators for the configured backend

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::{Collaborators, WelcomeService};
use crate::domain::entities::{User, DEFAULT_WELCOME_CONFIGURATION};
use crate::domain::traits::{ChannelDirectory, MessageSender, SettingDefinition, SettingsReader, SettingsStore, UserDirectory};
use crate::infrastructure::config::{Config, StorageBackend};
use crate::infrastructure::database::SqliteHost;
use crate::infrastructure::storage::MemoryHost;

/// Definition of the welcome configuration setting
pub fn welcome_setting(id: impl Into<String>) -> SettingDefinition {
    SettingDefinition::string(id, DEFAULT_WELCOME_CONFIGURATION)
        .required()
        .multiline()
}

/// Collaborators backed by one storage backend
pub struct Host {
    settings: Arc<dyn SettingsStore>,
    reader: Arc<dyn SettingsReader>,
    users: Arc<dyn UserDirectory>,
    channels: Arc<dyn ChannelDirectory>,
    setting_id: String,
}

impl Host {
    /// Open the configured backend and register the app user
    pub fn open(config: &Config) -> Result<Self, BotError> {
        let app_user = User::bot(format!("app-{}", config.bot.username), &config.bot.username)
            .with_name(&config.bot.name);

        let host = match config.storage.backend {
            StorageBackend::Sqlite => {
                let db = Arc::new(SqliteHost::open(&config.storage.path)?);
                db.register_app_user(&app_user)?;
                tracing::info!("Using SQLite host at {}", config.storage.path.display());
                Self::from_backend(db, &config.welcome.setting_id)
            }
            StorageBackend::Memory => {
                tracing::info!("Using in-memory host");
                Self::from_backend(Arc::new(MemoryHost::new().with_app_user(app_user)), &config.welcome.setting_id)
            }
        };
        Ok(host)
    }

    fn from_backend<B>(backend: Arc<B>, setting_id: &str) -> Self
    where
        B: SettingsStore + UserDirectory + ChannelDirectory + 'static,
    {
        Self {
            settings: backend.clone(),
            reader: backend.clone(),
            users: backend.clone(),
            channels: backend,
            setting_id: setting_id.to_string(),
        }
    }

    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.settings
    }

    pub fn setting_id(&self) -> &str {
        &self.setting_id
    }

    /// Provide the app's settings to the store
    pub async fn register(&self) -> Result<(), BotError> {
        self.settings.provide_setting(&welcome_setting(&self.setting_id)).await?;
        tracing::debug!("Provided setting {}", self.setting_id);
        Ok(())
    }

    pub fn welcome_service(&self, sender: Arc<dyn MessageSender>) -> WelcomeService {
        WelcomeService::new(Collaborators {
            settings: self.reader.clone(),
            users: self.users.clone(),
            channels: self.channels.clone(),
            sender,
        })
        .with_setting_id(&self.setting_id)
    }
}
