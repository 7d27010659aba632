//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Room, UserJoinedEvent, WelcomeConfiguration)
//! - Traits: Abstractions for the host (SettingsReader, UserDirectory, ChannelDirectory, MessageSender)

pub mod entities;
pub mod traits;
