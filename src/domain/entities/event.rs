use super::{Room, User};

/// A user joined a room
#[derive(Debug, Clone)]
pub struct UserJoinedEvent {
    pub room: Room,
    pub joining_user: User,
}

impl UserJoinedEvent {
    pub fn new(room: Room, joining_user: User) -> Self {
        Self { room, joining_user }
    }
}

/// Events delivered by the host
#[derive(Debug, Clone)]
pub enum HostEvent {
    UserJoined(UserJoinedEvent),
    Shutdown,
}
