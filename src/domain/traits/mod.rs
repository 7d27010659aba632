//! Domain traits - Abstractions for host implementations

pub mod directory;
pub mod sender;
pub mod settings;

pub use directory::{ChannelDirectory, UserDirectory};
pub use sender::MessageSender;
pub use settings::{SettingDefinition, SettingsReader, SettingsStore};
