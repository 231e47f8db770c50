//! Port abstraction for the direct-message store.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Message, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by message repository adapters.
    pub enum MessagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "message repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a newly sent message.
    async fn insert(&self, message: &Message) -> Result<(), MessagePersistenceError>;

    /// Every message `user` sent or received, in any order.
    async fn list_involving(&self, user: &UserId) -> Result<Vec<Message>, MessagePersistenceError>;

    /// Every message exchanged between `a` and `b`, oldest first.
    async fn list_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessagePersistenceError>;

    /// Flag unread messages from `sender` to `receiver` as read at `read_at`.
    ///
    /// Returns the number of messages changed; already read messages are left
    /// untouched.
    async fn mark_read(
        &self,
        receiver: &UserId,
        sender: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<usize, MessagePersistenceError>;

    /// Remove every message between `a` and `b` in both directions.
    async fn delete_between(&self, a: &UserId, b: &UserId)
    -> Result<usize, MessagePersistenceError>;
}
