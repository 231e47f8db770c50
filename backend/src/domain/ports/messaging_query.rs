//! Driving port for reading conversations.

use async_trait::async_trait;

use crate::domain::{ConversationSummary, Error, Message, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingQuery: Send + Sync {
    /// One summary per counterpart, most recently active first.
    async fn list_conversations(
        &self,
        requester: &UserId,
    ) -> Result<Vec<ConversationSummary>, Error>;

    /// Messages between the two users, oldest first.
    async fn list_messages(
        &self,
        requester: &UserId,
        counterpart: &UserId,
    ) -> Result<Vec<Message>, Error>;
}
