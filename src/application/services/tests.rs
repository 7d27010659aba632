//! End-to-end tests for the welcome flow

use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::errors::{HostError, WelcomeError};
use crate::application::services::{Collaborators, WelcomeOutcome, WelcomeService};
use crate::domain::entities::{
    DirectParticipants, Room, RoomType, User, UserJoinedEvent, DEFAULT_WELCOME_CONFIGURATION, WELCOME_SETTING_ID,
};
use crate::domain::traits::{MessageSender, SettingDefinition, SettingsStore};
use crate::infrastructure::storage::MemoryHost;

const BOT: &str = "welcome.bot";

#[derive(Debug, Clone)]
struct Sent {
    room: Room,
    sender: String,
    text: String,
}

/// Sender that keeps every delivered message
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingSender {
    fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, room: &Room, sender: &User, text: &str) -> Result<String, HostError> {
        if self.fail {
            return Err(HostError::Unavailable("message service down".to_string()));
        }
        let mut sent = self.sent.lock().await;
        sent.push(Sent {
            room: room.clone(),
            sender: sender.username.clone(),
            text: text.to_string(),
        });
        Ok(format!("msg-{}", sent.len()))
    }
}

struct Fixture {
    host: Arc<MemoryHost>,
    sender: Arc<RecordingSender>,
    service: WelcomeService,
}

async fn fixture_with(host: MemoryHost, sender: RecordingSender) -> Fixture {
    let host = Arc::new(host);
    host.provide_setting(&SettingDefinition::string(WELCOME_SETTING_ID, DEFAULT_WELCOME_CONFIGURATION))
        .await
        .unwrap();
    let sender = Arc::new(sender);
    let service = WelcomeService::new(Collaborators {
        settings: host.clone(),
        users: host.clone(),
        channels: host.clone(),
        sender: sender.clone(),
    });
    Fixture { host, sender, service }
}

async fn fixture() -> Fixture {
    fixture_with(MemoryHost::new().with_app_user(User::bot("bot-id", BOT)), RecordingSender::default()).await
}

fn join(room: &str, username: &str) -> UserJoinedEvent {
    UserJoinedEvent::new(Room::channel(format!("room-{}", room), room), User::new(format!("id-{}", username), username))
}

#[tokio::test]
async fn test_welcomes_user_in_direct_room() {
    let f = fixture().await;

    let outcome = f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap();
    let WelcomeOutcome::Sent { room_id, message_id } = outcome else {
        panic!("expected a welcome, got {:?}", outcome);
    };
    assert_eq!(message_id, "msg-1");

    let sent = f.sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].text,
        "### Welcome alice to the Channel #channel-0!\n Other channel of interest: #channel-1"
    );
    assert_eq!(sent[0].sender, BOT);
    assert_eq!(sent[0].room.id, room_id);
    assert_eq!(sent[0].room.room_type, RoomType::DirectMessage);
    assert_eq!(sent[0].room.usernames, vec!["alice", BOT]);
}

#[tokio::test]
async fn test_no_rule_sends_nothing() {
    let f = fixture().await;

    let outcome = f.service.on_user_joined(&join("random", "alice")).await.unwrap();
    assert_eq!(outcome, WelcomeOutcome::NoRuleMatched);
    assert!(f.sender.sent().await.is_empty());
    assert_eq!(f.host.room_count().await, 0);
}

#[tokio::test]
async fn test_trimmed_name_does_not_match() {
    let f = fixture().await;

    // Configured as " channel-A" with a leading space
    let outcome = f.service.on_user_joined(&join("channel-A", "alice")).await.unwrap();
    assert_eq!(outcome, WelcomeOutcome::NoRuleMatched);

    let outcome = f.service.on_user_joined(&join(" channel-A", "alice")).await.unwrap();
    assert!(matches!(outcome, WelcomeOutcome::Sent { .. }));
}

#[tokio::test]
async fn test_room_without_name_is_skipped() {
    let f = fixture().await;
    let event = UserJoinedEvent::new(Room::new("r1", RoomType::Channel), User::new("u1", "alice"));

    let outcome = f.service.on_user_joined(&event).await.unwrap();
    assert_eq!(outcome, WelcomeOutcome::NoRoomName);
    assert!(f.sender.sent().await.is_empty());
}

#[tokio::test]
async fn test_reuses_direct_room_on_second_join() {
    let f = fixture().await;

    f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap();
    f.service.on_user_joined(&join(" channel-A", "alice")).await.unwrap();

    let sent = f.sender.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].room.id, sent[1].room.id);
    assert_eq!(f.host.room_count().await, 1);
}

#[tokio::test]
async fn test_uses_existing_direct_room() {
    let f = fixture().await;
    let pair = DirectParticipants::new("alice", BOT).unwrap();
    let existing = f.host.insert_direct_room(&pair).await;

    let outcome = f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap();
    assert!(matches!(outcome, WelcomeOutcome::Sent { room_id, .. } if room_id == existing.id));
    assert_eq!(f.host.room_count().await, 1);
}

#[tokio::test]
async fn test_configuration_is_reread_per_event() {
    let f = fixture().await;
    f.host
        .set_value(WELCOME_SETTING_ID, r#"{"WelcomeMessages":[{"ChannelName":"random","Message":["Hi {{USERNAME}}"]}]}"#)
        .await
        .unwrap();

    assert_eq!(
        f.service.on_user_joined(&join("channel-0", "bob")).await.unwrap(),
        WelcomeOutcome::NoRuleMatched
    );
    f.service.on_user_joined(&join("random", "bob")).await.unwrap();
    assert_eq!(f.sender.sent().await[0].text, "Hi bob");
}

#[tokio::test]
async fn test_malformed_configuration_aborts() {
    let f = fixture().await;
    f.host.set_value(WELCOME_SETTING_ID, "{\"WelcomeMessages\": [").await.unwrap();

    let err = f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap_err();
    assert!(matches!(err, WelcomeError::ConfigurationParse(_)));
    assert!(f.sender.sent().await.is_empty());
    assert_eq!(f.host.room_count().await, 0);
}

#[tokio::test]
async fn test_missing_setting() {
    let host = Arc::new(MemoryHost::new().with_app_user(User::bot("bot-id", BOT)));
    let service = WelcomeService::new(Collaborators {
        settings: host.clone(),
        users: host.clone(),
        channels: host.clone(),
        sender: Arc::new(RecordingSender::default()),
    });

    let err = service.on_user_joined(&join("channel-0", "alice")).await.unwrap_err();
    assert!(matches!(err, WelcomeError::SettingNotFound(id) if id == WELCOME_SETTING_ID));
}

#[tokio::test]
async fn test_custom_setting_id() {
    let f = fixture().await;
    f.host
        .provide_setting(&SettingDefinition::string("staging_welcome", r#"{"WelcomeMessages":[{"ChannelName":"dev","Message":["{{CHANNEL_NAME}}"]}]}"#))
        .await
        .unwrap();
    let service = f.service.with_setting_id("staging_welcome");
    assert_eq!(service.setting_id(), "staging_welcome");

    service.on_user_joined(&join("dev", "alice")).await.unwrap();
    assert_eq!(f.sender.sent().await[0].text, "dev");
}

#[tokio::test]
async fn test_missing_app_user_fails() {
    let f = fixture_with(MemoryHost::new(), RecordingSender::default()).await;

    let err = f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap_err();
    assert!(matches!(err, WelcomeError::MissingIdentity(_)));
    assert!(f.sender.sent().await.is_empty());
    assert_eq!(f.host.room_count().await, 0);
}

#[tokio::test]
async fn test_bot_joining_is_skipped() {
    let f = fixture().await;

    let outcome = f.service.on_user_joined(&join("channel-0", BOT)).await.unwrap();
    assert_eq!(outcome, WelcomeOutcome::SelfJoin);
    assert_eq!(f.host.room_count().await, 0);
}

#[tokio::test]
async fn test_delivery_failure_is_reported() {
    let f = fixture_with(
        MemoryHost::new().with_app_user(User::bot("bot-id", BOT)),
        RecordingSender::failing(),
    )
    .await;

    let err = f.service.on_user_joined(&join("channel-0", "alice")).await.unwrap_err();
    assert!(matches!(err, WelcomeError::Delivery(_)));
    // The room was created before delivery failed
    assert_eq!(f.host.room_count().await, 1);
}
