use async_trait::async_trait;
use crate::application::errors::HostError;

/// Read access to app settings
#[async_trait]
pub trait SettingsReader: Send + Sync {
    /// Current value of a setting, falling back to its package value.
    /// `None` when the setting was never provided.
    async fn get_value(&self, id: &str) -> Result<Option<String>, HostError>;
}

/// Host-side settings store: registration and administration
#[async_trait]
pub trait SettingsStore: SettingsReader {
    /// Register a setting. Re-providing keeps any value set by an administrator.
    async fn provide_setting(&self, setting: &SettingDefinition) -> Result<(), HostError>;

    /// Override the package value
    async fn set_value(&self, id: &str, value: &str) -> Result<(), HostError>;

    /// Drop the override so the package value applies again
    async fn reset_value(&self, id: &str) -> Result<(), HostError>;
}

/// Value type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    String,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "string",
        }
    }
}

/// A setting the app registers with the host
#[derive(Debug, Clone)]
pub struct SettingDefinition {
    pub id: String,
    pub setting_type: SettingType,
    pub package_value: String,
    pub required: bool,
    pub public: bool,
    pub multiline: bool,
    pub i18n_label: String,
    pub i18n_description: String,
}

impl SettingDefinition {
    pub fn string(id: impl Into<String>, package_value: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            i18n_label: id.clone(),
            i18n_description: format!("{}_desc", id),
            id,
            setting_type: SettingType::String,
            package_value: package_value.into(),
            required: false,
            public: false,
            multiline: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}
