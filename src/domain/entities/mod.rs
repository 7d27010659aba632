//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod room;
pub mod event;
pub mod welcome;

pub use user::User;
pub use room::{DirectParticipants, NewRoom, Room, RoomType};
pub use event::{HostEvent, UserJoinedEvent};
pub use welcome::{WelcomeConfiguration, DEFAULT_WELCOME_CONFIGURATION, WELCOME_SETTING_ID};
