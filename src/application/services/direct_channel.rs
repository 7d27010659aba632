use std::sync::Arc;

use crate::application::errors::WelcomeError;
use crate::domain::entities::{DirectParticipants, NewRoom, Room, User};
use crate::domain::traits::{ChannelDirectory, UserDirectory};

/// Finds the direct room between two users, creating it when missing
pub struct DirectChannelResolver {
    channels: Arc<dyn ChannelDirectory>,
    users: Arc<dyn UserDirectory>,
}

impl DirectChannelResolver {
    pub fn new(channels: Arc<dyn ChannelDirectory>, users: Arc<dyn UserDirectory>) -> Self {
        Self { channels, users }
    }

    /// Existing room for the pair, or a new one created by `creator`
    /// (the app user when `None`).
    ///
    /// A failed lookup aborts without creating anything. Concurrent calls for
    /// the same pair are not serialized here.
    pub async fn resolve_or_create(
        &self,
        participants: &DirectParticipants,
        creator: Option<&User>,
    ) -> Result<Room, WelcomeError> {
        let existing = self
            .channels
            .find_direct(participants)
            .await
            .map_err(WelcomeError::ChannelLookup)?;

        if let Some(room) = existing {
            tracing::debug!("Found direct room {} for {:?}", room.id, participants.usernames());
            return Ok(room);
        }

        let creator = match creator {
            Some(user) => user.clone(),
            None => self
                .users
                .app_user()
                .await
                .map_err(|e| WelcomeError::MissingIdentity(e.to_string()))?
                .ok_or_else(|| WelcomeError::MissingIdentity("app user is not registered".to_string()))?,
        };

        let request = NewRoom::direct(creator, participants);
        let room_id = self
            .channels
            .create_room(&request)
            .await
            .map_err(|e| WelcomeError::ChannelCreation(e.to_string()))?;

        if room_id.is_empty() {
            return Err(WelcomeError::ChannelCreation("host returned an empty room id".to_string()));
        }

        tracing::info!("Created direct room {} for {:?}", room_id, participants.usernames());

        self.channels
            .get_by_id(&room_id)
            .await
            .map_err(|e| WelcomeError::ChannelCreation(e.to_string()))?
            .ok_or_else(|| WelcomeError::ChannelCreation(format!("room {} not found after creation", room_id)))
    }
}
