use std::sync::Arc;

use crate::application::errors::WelcomeError;
use crate::application::messaging::RenderContext;
use crate::domain::entities::{DirectParticipants, UserJoinedEvent, WelcomeConfiguration, WELCOME_SETTING_ID};
use crate::domain::traits::{ChannelDirectory, MessageSender, SettingsReader, UserDirectory};
use super::DirectChannelResolver;

/// How a join event ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeOutcome {
    /// Welcome delivered into the direct room
    Sent { room_id: String, message_id: String },
    /// The room has no display name
    NoRoomName,
    /// No rule lists the room
    NoRuleMatched,
    /// The app user itself joined
    SelfJoin,
}

/// Host collaborators used by the welcome service
#[derive(Clone)]
pub struct Collaborators {
    pub settings: Arc<dyn SettingsReader>,
    pub users: Arc<dyn UserDirectory>,
    pub channels: Arc<dyn ChannelDirectory>,
    pub sender: Arc<dyn MessageSender>,
}

/// Sends the configured welcome message to users joining a room
pub struct WelcomeService {
    settings: Arc<dyn SettingsReader>,
    users: Arc<dyn UserDirectory>,
    sender: Arc<dyn MessageSender>,
    resolver: DirectChannelResolver,
    setting_id: String,
}

impl WelcomeService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            resolver: DirectChannelResolver::new(collaborators.channels, collaborators.users.clone()),
            settings: collaborators.settings,
            users: collaborators.users,
            sender: collaborators.sender,
            setting_id: WELCOME_SETTING_ID.to_string(),
        }
    }

    /// Read the configuration from a different setting
    pub fn with_setting_id(mut self, id: impl Into<String>) -> Self {
        self.setting_id = id.into();
        self
    }

    #[cfg(test)]
    pub fn setting_id(&self) -> &str {
        &self.setting_id
    }

    /// Current configuration; re-read on every call
    pub async fn load_configuration(&self) -> Result<WelcomeConfiguration, WelcomeError> {
        let raw = self
            .settings
            .get_value(&self.setting_id)
            .await
            .map_err(WelcomeError::SettingsRead)?
            .ok_or_else(|| WelcomeError::SettingNotFound(self.setting_id.clone()))?;

        Ok(WelcomeConfiguration::parse(&raw)?)
    }

    /// Handle one join event. Sends at most one message.
    pub async fn on_user_joined(&self, event: &UserJoinedEvent) -> Result<WelcomeOutcome, WelcomeError> {
        let config = self.load_configuration().await?;

        let Some(room_name) = event.room.name() else {
            tracing::debug!("Room {} has no display name, skipping", event.room.id);
            return Ok(WelcomeOutcome::NoRoomName);
        };

        let Some(rule) = config.find_rule(room_name) else {
            tracing::debug!("No welcome rule for #{}", room_name);
            return Ok(WelcomeOutcome::NoRuleMatched);
        };

        let username = &event.joining_user.username;
        let text = RenderContext::new(room_name, username).render(&rule.template());

        let app_user = self
            .users
            .app_user()
            .await
            .map_err(|e| WelcomeError::MissingIdentity(e.to_string()))?
            .ok_or_else(|| WelcomeError::MissingIdentity("app user is not registered".to_string()))?;

        let Some(participants) = DirectParticipants::new(username.as_str(), app_user.username.as_str()) else {
            tracing::debug!("{} joined #{} itself, skipping", app_user, room_name);
            return Ok(WelcomeOutcome::SelfJoin);
        };

        let room = self.resolver.resolve_or_create(&participants, Some(&app_user)).await?;

        let message_id = self
            .sender
            .send_message(&room, &app_user, &text)
            .await
            .map_err(WelcomeError::Delivery)?;

        tracing::info!("Welcomed {} to #{} in direct room {}", event.joining_user, room_name, room.id);

        Ok(WelcomeOutcome::Sent { room_id: room.id, message_id })
    }
}
