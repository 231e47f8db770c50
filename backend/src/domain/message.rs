//! Direct messages exchanged between two users.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;

/// Maximum accepted length of a message body, in characters.
pub const MESSAGE_BODY_MAX: usize = 10_000;

/// Validation errors for message payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValidationError {
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for MessageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "message content must not be empty"),
            Self::BodyTooLong { max } => {
                write!(f, "message content must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for MessageValidationError {}

/// Stable message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// Validate a raw message body.
    ///
    /// # Examples
    /// ```
    /// use circle::domain::{MessageBody, MessageValidationError};
    ///
    /// assert_eq!(MessageBody::new("  hi ").unwrap().as_ref(), "hi");
    /// assert_eq!(MessageBody::new("   "), Err(MessageValidationError::EmptyBody));
    /// ```
    pub fn new(body: impl AsRef<str>) -> Result<Self, MessageValidationError> {
        let body = body.as_ref().trim();
        if body.is_empty() {
            return Err(MessageValidationError::EmptyBody);
        }
        if body.chars().count() > MESSAGE_BODY_MAX {
            return Err(MessageValidationError::BodyTooLong {
                max: MESSAGE_BODY_MAX,
            });
        }
        Ok(Self(body.to_owned()))
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored direct message.
///
/// ## Invariants
/// - `read_at` is set exactly when `is_read` is true.
/// - `created_at` never changes after the message is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    pub body: MessageBody,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a freshly sent, unread message.
    pub fn new(
        id: MessageId,
        sender: UserId,
        receiver: UserId,
        body: MessageBody,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            body,
            is_read: false,
            read_at: None,
            created_at,
        }
    }

    /// The participant on the other side from `user`, if `user` took part.
    ///
    /// A message a user sent to themself has that user as its counterpart.
    pub fn counterpart_of(&self, user: &UserId) -> Option<&UserId> {
        if &self.sender == user {
            Some(&self.receiver)
        } else if &self.receiver == user {
            Some(&self.sender)
        } else {
            None
        }
    }

    /// True when `user` received this message and has not read it yet.
    pub fn is_unread_by(&self, user: &UserId) -> bool {
        &self.receiver == user && !self.is_read
    }

    /// True when the message was exchanged between `a` and `b`, either way.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender == a && &self.receiver == b) || (&self.sender == b && &self.receiver == a)
    }

    /// Flag the message as read at `at`. Already read messages keep their
    /// original timestamp; returns whether anything changed.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(at);
        true
    }

    /// Chronological order with the message id breaking timestamp ties.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort messages oldest first.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by(Message::chronological_cmp);
}
