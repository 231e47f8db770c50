//! Driving port for direct-message mutations.

use async_trait::async_trait;

use crate::domain::{Error, Message, MessageBody, UserId};

/// Validated request to send a direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub sender: UserId,
    pub receiver: UserId,
    pub body: MessageBody,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingCommand: Send + Sync {
    /// Persist a message and return it with its id and timestamp.
    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, Error>;

    /// Mark everything `counterpart` sent to `reader` as read. Returns the
    /// number of messages that changed; zero on repeat calls.
    async fn mark_read(&self, reader: &UserId, counterpart: &UserId) -> Result<usize, Error>;

    /// Remove the whole conversation between the two users.
    async fn delete_conversation(
        &self,
        requester: &UserId,
        counterpart: &UserId,
    ) -> Result<usize, Error>;
}
