//! In-memory host implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::HostError;
use crate::domain::entities::{DirectParticipants, NewRoom, Room, RoomType, User};
use crate::domain::traits::{ChannelDirectory, SettingDefinition, SettingsReader, SettingsStore, UserDirectory};

#[derive(Debug, Clone)]
struct StoredSetting {
    package_value: String,
    value: Option<String>,
}

/// Host state kept in memory: settings, the app user, and rooms
#[derive(Default)]
pub struct MemoryHost {
    settings: Arc<RwLock<HashMap<String, StoredSetting>>>,
    app_user: Option<User>,
    rooms: Arc<RwLock<HashMap<String, Room>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_user(mut self, user: User) -> Self {
        self.app_user = Some(user);
        self
    }

    #[cfg(test)]
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Seed a direct room without going through `create_room`
    #[cfg(test)]
    pub async fn insert_direct_room(&self, participants: &DirectParticipants) -> Room {
        let room = Room::new(uuid::Uuid::new_v4().to_string(), RoomType::DirectMessage)
            .with_usernames(participants.to_vec());
        self.rooms.write().await.insert(room.id.clone(), room.clone());
        room
    }
}

#[async_trait]
impl SettingsReader for MemoryHost {
    async fn get_value(&self, id: &str) -> Result<Option<String>, HostError> {
        let settings = self.settings.read().await;
        Ok(settings
            .get(id)
            .map(|s| s.value.clone().unwrap_or_else(|| s.package_value.clone())))
    }
}

#[async_trait]
impl SettingsStore for MemoryHost {
    async fn provide_setting(&self, setting: &SettingDefinition) -> Result<(), HostError> {
        let mut settings = self.settings.write().await;
        settings
            .entry(setting.id.clone())
            .and_modify(|s| s.package_value = setting.package_value.clone())
            .or_insert_with(|| StoredSetting {
                package_value: setting.package_value.clone(),
                value: None,
            });
        Ok(())
    }

    async fn set_value(&self, id: &str, value: &str) -> Result<(), HostError> {
        let mut settings = self.settings.write().await;
        match settings.get_mut(id) {
            Some(s) => {
                s.value = Some(value.to_string());
                Ok(())
            }
            None => Err(HostError::NotFound(format!("setting {}", id))),
        }
    }

    async fn reset_value(&self, id: &str) -> Result<(), HostError> {
        let mut settings = self.settings.write().await;
        if let Some(s) = settings.get_mut(id) {
            s.value = None;
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryHost {
    async fn app_user(&self) -> Result<Option<User>, HostError> {
        Ok(self.app_user.clone())
    }
}

#[async_trait]
impl ChannelDirectory for MemoryHost {
    async fn find_direct(&self, participants: &DirectParticipants) -> Result<Option<Room>, HostError> {
        let rooms = self.rooms.read().await;
        Ok(rooms
            .values()
            .find(|room| {
                room.is_direct()
                    && room.usernames.len() == 2
                    && room.usernames.iter().all(|u| participants.contains(u))
                    && room.usernames[0] != room.usernames[1]
            })
            .cloned())
    }

    async fn create_room(&self, request: &NewRoom) -> Result<String, HostError> {
        let mut room = Room::new(uuid::Uuid::new_v4().to_string(), request.room_type)
            .with_creator(request.creator.id.clone())
            .with_usernames(request.member_usernames.clone());
        room.display_name = request.display_name.clone();

        let id = room.id.clone();
        self.rooms.write().await.insert(id.clone(), room);
        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Room>, HostError> {
        Ok(self.rooms.read().await.get(id).cloned())
    }
}
