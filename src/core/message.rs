//! Message types and handler traits for the Actor system.

use async_trait::async_trait;

/// A generic message in the Actor system.
/// T represents the payload type, which can be any type that satisfies the required bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    /// The method name for this message
    pub method: String,
    /// The message payload
    pub payload: T,
}

impl<T> Message<T> {
    /// Create a new Message with the specified method and payload.
    pub fn new(method: impl Into<String>, payload: T) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }
}

/// Trait for handling messages in the Actor system.
///
/// Implementors own all of their state; the actor calls `on_message` for one
/// message at a time, so no locking is needed inside a handler. Follow-up
/// work (timers, spawned requests) reports back by posting messages through
/// the provided controller.
#[async_trait]
pub trait MessageHandler<T>: Send {
    /// Handle an incoming message.
    ///
    /// # Arguments
    /// * `message` - The incoming message to process
    /// * `controller` - Posts messages back into this actor's own inbox
    async fn on_message(
        &mut self,
        message: Message<T>,
        controller: &crate::core::ActorController<T>,
    );

    /// Called once when the message loop stops.
    async fn on_shutdown(&mut self) {}
}
