use async_trait::async_trait;
use crate::domain::entities::{DirectParticipants, NewRoom, Room, User};
use crate::application::errors::HostError;

/// User lookups the app needs from the host
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The app's own service account, if the host registered one
    async fn app_user(&self) -> Result<Option<User>, HostError>;
}

/// Room lookups and creation
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Existing direct room between exactly these two users
    async fn find_direct(&self, participants: &DirectParticipants) -> Result<Option<Room>, HostError>;

    /// Create a room and return its id
    async fn create_room(&self, request: &NewRoom) -> Result<String, HostError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Room>, HostError>;
}
