//! `MessageRepository` over a process-local list.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{Message, UserId, sort_chronologically};

fn poisoned() -> MessagePersistenceError {
    MessagePersistenceError::query("message store lock poisoned")
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessagePersistenceError> {
        let mut messages = self.messages.write().map_err(|_| poisoned())?;
        messages.push(message.clone());
        Ok(())
    }

    async fn list_involving(&self, user: &UserId) -> Result<Vec<Message>, MessagePersistenceError> {
        let messages = self.messages.read().map_err(|_| poisoned())?;
        Ok(messages
            .iter()
            .filter(|message| message.counterpart_of(user).is_some())
            .cloned()
            .collect())
    }

    async fn list_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessagePersistenceError> {
        let messages = self.messages.read().map_err(|_| poisoned())?;
        let mut between: Vec<Message> = messages
            .iter()
            .filter(|message| message.is_between(a, b))
            .cloned()
            .collect();
        sort_chronologically(&mut between);
        Ok(between)
    }

    async fn mark_read(
        &self,
        receiver: &UserId,
        sender: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<usize, MessagePersistenceError> {
        let mut messages = self.messages.write().map_err(|_| poisoned())?;
        let updated = messages
            .iter_mut()
            .filter(|message| &message.receiver == receiver && &message.sender == sender)
            .map(|message| message.mark_read(read_at))
            .filter(|changed| *changed)
            .count();
        Ok(updated)
    }

    async fn delete_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<usize, MessagePersistenceError> {
        let mut messages = self.messages.write().map_err(|_| poisoned())?;
        let before = messages.len();
        messages.retain(|message| !message.is_between(a, b));
        Ok(before - messages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, MessageId};
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
    }

    fn message(sender: &UserId, receiver: &UserId, seconds: i64) -> Message {
        Message::new(
            MessageId::random(),
            sender.clone(),
            receiver.clone(),
            MessageBody::new("hi").expect("valid body"),
            at(seconds),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn mark_read_only_touches_one_direction_and_is_idempotent() {
        let (a, b) = (UserId::random(), UserId::random());
        let repo = InMemoryMessageRepository::new();
        for msg in [message(&a, &b, 1), message(&b, &a, 2), message(&b, &a, 3)] {
            repo.insert(&msg).await.expect("insert");
        }

        assert_eq!(repo.mark_read(&a, &b, at(10)).await.expect("mark"), 2);
        assert_eq!(repo.mark_read(&a, &b, at(11)).await.expect("mark"), 0);

        let stored = repo.list_between(&a, &b).await.expect("list");
        assert!(!stored[0].is_read, "a's own message stays unread for b");
        assert!(stored[1..].iter().all(|m| m.read_at == Some(at(10))));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_between_spares_other_conversations() {
        let (a, b, c) = (UserId::random(), UserId::random(), UserId::random());
        let repo = InMemoryMessageRepository::new();
        for msg in [message(&a, &b, 1), message(&b, &a, 2), message(&a, &c, 3)] {
            repo.insert(&msg).await.expect("insert");
        }

        assert_eq!(repo.delete_between(&b, &a).await.expect("delete"), 2);
        assert!(repo.list_between(&a, &b).await.expect("list").is_empty());
        assert_eq!(repo.list_involving(&a).await.expect("list").len(), 1);
    }
}
