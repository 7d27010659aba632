//! Event dispatcher - Hands host events to the welcome service

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::errors::WelcomeError;
use crate::application::services::{WelcomeOutcome, WelcomeService};
use crate::domain::entities::{HostEvent, UserJoinedEvent};

/// Runs every join event in its own task.
/// A failing event is logged and never affects the others.
#[derive(Clone)]
pub struct EventDispatcher {
    service: Arc<WelcomeService>,
}

impl EventDispatcher {
    pub fn new(service: Arc<WelcomeService>) -> Self {
        Self { service }
    }

    /// Spawn the handling of one join event
    pub fn dispatch(&self, event: UserJoinedEvent) -> JoinHandle<Result<WelcomeOutcome, WelcomeError>> {
        let service = self.service.clone();
        tokio::spawn(async move {
            let result = service.on_user_joined(&event).await;
            match &result {
                Ok(WelcomeOutcome::Sent { room_id, .. }) => {
                    tracing::debug!("[{}] welcome sent to {}", event.room.id, room_id);
                }
                Ok(outcome) => {
                    tracing::debug!("[{}] nothing to send: {:?}", event.room.id, outcome);
                }
                Err(e) => {
                    tracing::error!(
                        "[{}] failed to welcome {}: {}",
                        event.room.id,
                        event.joining_user,
                        e
                    );
                }
            }
            result
        })
    }

    /// Consume events until the channel closes or a shutdown arrives.
    /// Waits for in-flight events before returning.
    pub async fn run(&self, mut events: mpsc::Receiver<HostEvent>) {
        let mut in_flight: Vec<JoinHandle<Result<WelcomeOutcome, WelcomeError>>> = Vec::new();

        while let Some(event) = events.recv().await {
            match event {
                HostEvent::UserJoined(joined) => {
                    in_flight.retain(|handle| !handle.is_finished());
                    in_flight.push(self.dispatch(joined));
                }
                HostEvent::Shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
            }
        }

        for handle in in_flight {
            if let Err(e) = handle.await {
                tracing::error!("Event task panicked: {}", e);
            }
        }
    }
}
