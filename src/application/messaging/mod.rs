//! Message handling - Event dispatch and welcome text rendering

pub mod dispatcher;
pub mod renderer;

pub use dispatcher::EventDispatcher;
pub use renderer::RenderContext;
