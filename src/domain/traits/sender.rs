use async_trait::async_trait;
use crate::domain::entities::{Room, User};
use crate::application::errors::HostError;

/// Message delivery - abstraction over the host's message creator
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send text into a room as the app user. Returns the message id.
    async fn send_message(&self, room: &Room, sender: &User, text: &str) -> Result<String, HostError>;
}
