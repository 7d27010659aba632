//! Console adapter for development/testing
//!
//! Reads join events from stdin and prints delivered messages.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::application::errors::{BotError, HostError};
use crate::domain::entities::{HostEvent, Room, RoomType, User, UserJoinedEvent};
use crate::domain::traits::MessageSender;

/// Console host adapter for local development
pub struct ConsoleAdapter {
    echo: Option<mpsc::UnboundedSender<String>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self { echo: None }
    }

    /// Also forward every delivered text to `echo`
    #[cfg(test)]
    pub fn with_echo(mut self, echo: mpsc::UnboundedSender<String>) -> Self {
        self.echo = Some(echo);
        self
    }

    /// Feed events parsed from `input` into `events` until EOF or `quit`
    pub async fn read_events<R>(input: R, events: mpsc::Sender<HostEvent>) -> Result<(), BotError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }
            match parse_join_line(line) {
                Ok(event) => {
                    if events.send(HostEvent::UserJoined(event)).await.is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        let _ = events.send(HostEvent::Shutdown).await;
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `join <room> <username>`; a room of `-` has no display name
pub fn parse_join_line(line: &str) -> Result<UserJoinedEvent, BotError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [cmd, room, username] = parts.as_slice() else {
        return Err(BotError::InvalidInput(format!("Usage: join <room> <username>, got {:?}", line)));
    };
    if *cmd != "join" {
        return Err(BotError::InvalidInput(format!("Unknown command: {}", cmd)));
    }
    Ok(joined_event(room, username))
}

/// Build a join event for a public room
pub fn joined_event(room: &str, username: &str) -> UserJoinedEvent {
    let mut target = Room::new(format!("console-{}", room), RoomType::Channel);
    if room != "-" {
        target = target.with_display_name(room);
    }
    UserJoinedEvent::new(target, User::new(format!("console-{}", username), username))
}

#[async_trait]
impl MessageSender for ConsoleAdapter {
    async fn send_message(&self, room: &Room, sender: &User, text: &str) -> Result<String, HostError> {
        println!("[{} -> {}] {}", sender, room.usernames.join(","), text);
        if let Some(echo) = &self.echo {
            echo.send(text.to_string())
                .map_err(|e| HostError::Unavailable(e.to_string()))?;
        }
        Ok(uuid::Uuid::new_v4().to_string())
    }
}
