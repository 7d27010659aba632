//! Application services - Business logic orchestration

pub mod direct_channel;
pub mod welcome_service;

#[cfg(test)]
mod tests;

pub use direct_channel::DirectChannelResolver;
pub use welcome_service::{Collaborators, WelcomeOutcome, WelcomeService};
