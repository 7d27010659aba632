//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Welcome error: {0}")]
    Welcome(#[from] WelcomeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Faults raised by host collaborators (settings store, directories, sender)
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Errors that end the handling of a single join event
#[derive(Error, Debug)]
pub enum WelcomeError {
    #[error("Configuration parse error: {0}")]
    ConfigurationParse(#[from] serde_json::Error),

    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("Failed to read settings: {0}")]
    SettingsRead(#[source] HostError),

    #[error("Missing identity: {0}")]
    MissingIdentity(String),

    #[error("Direct room lookup failed: {0}")]
    ChannelLookup(#[source] HostError),

    #[error("Direct room creation failed: {0}")]
    ChannelCreation(String),

    #[error("Message delivery failed: {0}")]
    Delivery(#[source] HostError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
