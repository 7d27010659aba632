use chrono::{DateTime, Utc};

use super::User;

/// Kind of room, using the host's short codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    Channel,
    PrivateGroup,
    DirectMessage,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Channel => "c",
            RoomType::PrivateGroup => "p",
            RoomType::DirectMessage => "d",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "c" => Some(RoomType::Channel),
            "p" => Some(RoomType::PrivateGroup),
            "d" => Some(RoomType::DirectMessage),
            _ => None,
        }
    }
}

/// A room as handed out by the channel directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub room_type: RoomType,
    pub display_name: Option<String>,
    pub creator_id: Option<String>,
    pub usernames: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            id: id.into(),
            room_type,
            display_name: None,
            creator_id: None,
            usernames: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn channel(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, RoomType::Channel).with_display_name(display_name)
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_creator(mut self, creator_id: impl Into<String>) -> Self {
        self.creator_id = Some(creator_id.into());
        self
    }

    pub fn with_usernames(mut self, usernames: Vec<String>) -> Self {
        self.usernames = usernames;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.room_type == RoomType::DirectMessage
    }

    /// Display name, treating an empty one as absent
    pub fn name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// The two distinct usernames of a direct room, order-independent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectParticipants {
    first: String,
    second: String,
}

impl DirectParticipants {
    /// Returns `None` when both usernames are the same
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn usernames(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }

    pub fn to_vec(&self) -> Vec<String> {
        vec![self.first.clone(), self.second.clone()]
    }

    /// Stable key identifying the pair regardless of argument order
    pub fn key(&self) -> String {
        format!("{}\u{1f}{}", self.first, self.second)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.first == username || self.second == username
    }
}

/// Request to create a room
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub room_type: RoomType,
    pub creator: User,
    pub display_name: Option<String>,
    pub member_usernames: Vec<String>,
}

impl NewRoom {
    pub fn direct(creator: User, participants: &DirectParticipants) -> Self {
        Self {
            room_type: RoomType::DirectMessage,
            creator,
            display_name: None,
            member_usernames: participants.to_vec(),
        }
    }

    /// Participant pair when this is a well-formed direct room request
    pub fn participants(&self) -> Option<DirectParticipants> {
        if self.room_type != RoomType::DirectMessage {
            return None;
        }
        match self.member_usernames.as_slice() {
            [a, b] => DirectParticipants::new(a.as_str(), b.as_str()),
            _ => None,
        }
    }
}
