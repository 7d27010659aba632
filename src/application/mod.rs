//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Welcome orchestration and direct room resolution
//! - Messaging: Placeholder rendering and event dispatch
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;
pub mod messaging;
