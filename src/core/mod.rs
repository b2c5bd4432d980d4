//! Core module for notification-based communication
//!
//! A lightweight actor system: one message loop per actor, typed payloads,
//! and a controller handle for posting follow-up messages from spawned work.

pub mod actor;
pub mod message;

// Re-exports for convenience
pub use actor::{Actor, ActorController, ActorSendError};
pub use message::{Message, MessageHandler};
