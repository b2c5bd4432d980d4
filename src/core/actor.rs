//! Actor implementation for notification-based communication
//!
//! An [`Actor`] runs a single message loop on the current tokio runtime and
//! feeds every message to its [`MessageHandler`] in arrival order. This gives
//! the handler one logical event thread: its state is only ever touched from
//! inside the loop.

use crate::core::message::{Message, MessageHandler};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A lightweight actor that owns a handler and its inbox.
///
/// Dropping the actor stops the loop. Use [`Actor::shutdown`] to also wait for
/// the handler's shutdown hook to finish.
pub struct Actor<T: Send + 'static> {
    /// Inbox of the message loop
    sender: mpsc::UnboundedSender<Message<T>>,
    /// Cancelled on shutdown; parent of every token handed out by the controller
    shutdown_token: CancellationToken,
    /// Handle to the message processing task
    task_handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Actor<T> {
    /// Start a message loop for `handler` on the current runtime.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    pub fn spawn<H>(handler: H) -> Self
    where
        H: MessageHandler<T> + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown_token = CancellationToken::new();
        let controller = ActorController::new(sender.clone(), shutdown_token.clone());

        let task_handle = tokio::spawn(Self::run_message_loop(
            receiver,
            controller,
            handler,
            shutdown_token.clone(),
        ));

        Self {
            sender,
            shutdown_token,
            task_handle: Some(task_handle),
        }
    }

    /// Send a message into the actor's inbox.
    pub fn send(&self, message: Message<T>) -> Result<(), ActorSendError> {
        if self.shutdown_token.is_cancelled() {
            return Err(ActorSendError::ChannelClosed);
        }
        self.sender
            .send(message)
            .map_err(|_| ActorSendError::ChannelClosed)
    }

    /// Build and send a message in one step.
    pub fn send_message(
        &self,
        method: impl Into<String>,
        payload: T,
    ) -> Result<(), ActorSendError> {
        self.send(Message::new(method, payload))
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown_token.is_cancelled()
    }

    /// Main message processing loop.
    async fn run_message_loop<H>(
        mut receiver: mpsc::UnboundedReceiver<Message<T>>,
        controller: ActorController<T>,
        mut handler: H,
        shutdown_token: CancellationToken,
    ) where
        H: MessageHandler<T>,
    {
        loop {
            tokio::select! {
                biased;

                _ = shutdown_token.cancelled() => {
                    log::debug!("Received shutdown signal, stopping message loop");
                    break;
                }
                message = receiver.recv() => {
                    match message {
                        Some(message) => {
                            log::trace!("Received message: method={}", message.method);
                            handler.on_message(message, &controller).await;
                        }
                        None => {
                            log::debug!("Receiver channel closed");
                            break;
                        }
                    }
                }
            }
        }

        handler.on_shutdown().await;
    }

    /// Stop the message loop and wait for it to finish.
    pub async fn shutdown(mut self) {
        log::info!("Shutdown requested for Actor");
        self.shutdown_token.cancel();

        if let Some(task_handle) = self.task_handle.take() {
            log::debug!("Waiting for message loop to finish");
            if let Err(e) = task_handle.await {
                log::warn!("Message loop ended abnormally: {}", e);
            }
        }

        log::info!("Actor shutdown completed");
    }
}

impl<T: Send + 'static> Drop for Actor<T> {
    fn drop(&mut self) {
        if !self.shutdown_token.is_cancelled() {
            log::debug!("Actor dropped without explicit shutdown, cancelling message loop");
            self.shutdown_token.cancel();
        }
    }
}

/// Error type for Actor message sending operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorSendError {
    #[error("Actor channel is closed")]
    ChannelClosed,
}

/// Handle given to a [`MessageHandler`] for posting follow-up messages into
/// its own inbox, typically from spawned tasks.
pub struct ActorController<T> {
    sender: mpsc::UnboundedSender<Message<T>>,
    shutdown_token: CancellationToken,
}

impl<T: Send + 'static> ActorController<T> {
    pub fn new(
        sender: mpsc::UnboundedSender<Message<T>>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            sender,
            shutdown_token,
        }
    }

    /// Post a message to the owning actor.
    pub fn send_message(
        &self,
        method: impl Into<String>,
        payload: T,
    ) -> Result<(), ActorSendError> {
        let message = Message::new(method, payload);
        self.sender
            .send(message)
            .map_err(|_| ActorSendError::ChannelClosed)
    }

    /// A token that is cancelled when the actor shuts down.
    pub fn child_token(&self) -> CancellationToken {
        self.shutdown_token.child_token()
    }
}

impl<T> Clone for ActorController<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            shutdown_token: self.shutdown_token.clone(),
        }
    }
}
