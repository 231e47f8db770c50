//! Direct messaging: sending, reading and conversation summaries.
//!
//! Conversation summaries are folded in process from the requester's
//! messages by [`summarize_conversations`] and then joined with the public
//! profiles of each counterpart.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    MessageRepository, MessagingCommand, MessagingQuery, SendMessageRequest, UserRepository,
};
use crate::domain::service_support::{map_message_error, map_user_error, require_user};
use crate::domain::{
    ConversationSummary, Error, Message, MessageId, User, UserId, attach_contacts,
    sort_chronologically, summarize_conversations,
};

/// Messaging service implementing [`MessagingCommand`] and [`MessagingQuery`].
#[derive(Clone)]
pub struct MessagingService<M, U> {
    messages: Arc<M>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, U> MessagingService<M, U> {
    pub fn new(messages: Arc<M>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<M, U> MessagingCommand for MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn send_message(&self, request: SendMessageRequest) -> Result<Message, Error> {
        let SendMessageRequest {
            sender,
            receiver,
            body,
        } = request;
        if sender == receiver {
            return Err(Error::invalid_request("you cannot send a message to yourself"));
        }
        require_user(self.users.as_ref(), &receiver).await?;

        let message = Message::new(MessageId::random(), sender, receiver, body, self.clock.utc());
        self.messages
            .insert(&message)
            .await
            .map_err(map_message_error)?;
        info!(message_id = %message.id, sender = %message.sender, "message sent");
        Ok(message)
    }

    async fn mark_read(&self, reader: &UserId, counterpart: &UserId) -> Result<usize, Error> {
        let updated = self
            .messages
            .mark_read(reader, counterpart, self.clock.utc())
            .await
            .map_err(map_message_error)?;
        info!(%reader, %counterpart, updated, "conversation marked read");
        Ok(updated)
    }

    async fn delete_conversation(
        &self,
        requester: &UserId,
        counterpart: &UserId,
    ) -> Result<usize, Error> {
        let removed = self
            .messages
            .delete_between(requester, counterpart)
            .await
            .map_err(map_message_error)?;
        info!(%requester, %counterpart, removed, "conversation deleted");
        Ok(removed)
    }
}

#[async_trait]
impl<M, U> MessagingQuery for MessagingService<M, U>
where
    M: MessageRepository,
    U: UserRepository,
{
    async fn list_conversations(
        &self,
        requester: &UserId,
    ) -> Result<Vec<ConversationSummary>, Error> {
        let messages = self
            .messages
            .list_involving(requester)
            .await
            .map_err(map_message_error)?;
        let digests = summarize_conversations(requester, messages);
        if digests.is_empty() {
            return Ok(Vec::new());
        }

        let counterparts: Vec<UserId> = digests
            .iter()
            .map(|digest| digest.counterpart.clone())
            .collect();
        let contacts = self
            .users
            .find_many(&counterparts)
            .await
            .map_err(map_user_error)?;
        Ok(attach_contacts(digests, contacts.iter().map(User::summary)))
    }

    async fn list_messages(
        &self,
        requester: &UserId,
        counterpart: &UserId,
    ) -> Result<Vec<Message>, Error> {
        let mut messages = self
            .messages
            .list_between(requester, counterpart)
            .await
            .map_err(map_message_error)?;
        sort_chronologically(&mut messages);
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MessagePersistenceError, MockMessageRepository, MockUserRepository,
    };
    use crate::domain::{EmailAddress, ErrorCode, MessageBody, Username};
    use chrono::{DateTime, TimeZone, Utc};
    use mockable::MockClock;
    use rstest::rstest;

    type Service = MessagingService<MockMessageRepository, MockUserRepository>;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
    }

    fn user(name: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
            at(0),
        )
    }

    fn message(sender: &User, receiver: &User, text: &str, seconds: i64) -> Message {
        Message::new(
            MessageId::random(),
            sender.id().clone(),
            receiver.id().clone(),
            MessageBody::new(text).expect("valid body"),
            at(seconds),
        )
    }

    fn service(messages: MockMessageRepository, users: MockUserRepository) -> Service {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(at(42));
        MessagingService::new(Arc::new(messages), Arc::new(users), Arc::new(clock))
    }

    fn send_request(sender: &UserId, receiver: &UserId) -> SendMessageRequest {
        SendMessageRequest {
            sender: sender.clone(),
            receiver: receiver.clone(),
            body: MessageBody::new("hi").expect("valid body"),
        }
    }

    #[tokio::test]
    async fn send_message_stamps_and_persists() {
        let alice = user("alice");
        let bob = user("bob");
        let mut users = MockUserRepository::new();
        let found = bob.clone();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(found)));
        let mut messages = MockMessageRepository::new();
        messages.expect_insert().times(1).return_once(|_| Ok(()));

        let sent = service(messages, users)
            .send_message(send_request(alice.id(), bob.id()))
            .await
            .expect("message sent");

        assert_eq!(sent.created_at, at(42));
        assert!(!sent.is_read);
        assert_eq!(sent.read_at, None);
        assert_eq!(&sent.receiver, bob.id());
    }

    #[tokio::test]
    async fn send_message_to_unknown_receiver_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let mut messages = MockMessageRepository::new();
        messages.expect_insert().times(0);

        let err = service(messages, users)
            .send_message(send_request(&UserId::random(), &UserId::random()))
            .await
            .expect_err("unknown receiver");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn send_message_to_self_is_rejected() {
        let me = UserId::random();
        let err = service(MockMessageRepository::new(), MockUserRepository::new())
            .send_message(send_request(&me, &me))
            .await
            .expect_err("self message");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn conversations_join_contacts_in_recency_order() {
        let alice = user("alice");
        let bob = user("bob");
        let carol = user("carol");
        let history = vec![
            message(&alice, &bob, "hi", 1),
            message(&bob, &alice, "hello", 2),
            message(&carol, &alice, "hey", 5),
        ];
        let mut messages = MockMessageRepository::new();
        messages
            .expect_list_involving()
            .return_once(move |_| Ok(history));
        let mut users = MockUserRepository::new();
        let contacts = vec![bob.clone(), carol.clone()];
        users
            .expect_find_many()
            .withf(|ids| ids.len() == 2)
            .return_once(move |_| Ok(contacts));

        let summaries = service(messages, users)
            .list_conversations(alice.id())
            .await
            .expect("conversations load");

        let names: Vec<&str> = summaries
            .iter()
            .map(|s| s.contact.username.as_ref())
            .collect();
        assert_eq!(names, vec!["carol", "bob"]);
        assert_eq!(summaries[1].last_message.body.as_ref(), "hello");
        assert_eq!(summaries[1].unread_count, 1);
    }

    #[tokio::test]
    async fn no_messages_skips_contact_lookup() {
        let mut messages = MockMessageRepository::new();
        messages
            .expect_list_involving()
            .return_once(|_| Ok(Vec::new()));
        let mut users = MockUserRepository::new();
        users.expect_find_many().times(0);

        let summaries = service(messages, users)
            .list_conversations(&UserId::random())
            .await
            .expect("conversations load");

        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn list_messages_is_oldest_first() {
        let alice = user("alice");
        let bob = user("bob");
        let unordered = vec![
            message(&bob, &alice, "third", 3),
            message(&alice, &bob, "first", 1),
            message(&bob, &alice, "second", 2),
        ];
        let mut messages = MockMessageRepository::new();
        messages
            .expect_list_between()
            .return_once(move |_, _| Ok(unordered));

        let listed = service(messages, MockUserRepository::new())
            .list_messages(alice.id(), bob.id())
            .await
            .expect("messages load");

        let bodies: Vec<&str> = listed.iter().map(|m| m.body.as_ref()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn mark_read_passes_reader_as_receiver() {
        let reader = UserId::random();
        let counterpart = UserId::random();
        let (expected_reader, expected_counterpart) = (reader.clone(), counterpart.clone());
        let mut messages = MockMessageRepository::new();
        messages
            .expect_mark_read()
            .withf(move |receiver, sender, read_at| {
                receiver == &expected_reader
                    && sender == &expected_counterpart
                    && *read_at == at(42)
            })
            .return_once(|_, _, _| Ok(2));

        let updated = service(messages, MockUserRepository::new())
            .mark_read(&reader, &counterpart)
            .await
            .expect("mark read");

        assert_eq!(updated, 2);
    }

    /// Records the level and message of every event it sees.
    #[derive(Clone, Default)]
    struct EventLog(Arc<std::sync::Mutex<Vec<(tracing::Level, String)>>>);

    struct MessageField(String);

    impl tracing::field::Visit for MessageField {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventLog {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut message = MessageField(String::new());
            event.record(&mut message);
            self.0
                .lock()
                .expect("event log lock")
                .push((*event.metadata().level(), message.0));
        }
    }

    #[tokio::test]
    async fn mark_read_is_logged_at_info() {
        use tracing_subscriber::layer::SubscriberExt;

        let log = EventLog::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::Registry::default().with(log.clone()),
        );
        let mut messages = MockMessageRepository::new();
        messages.expect_mark_read().return_once(|_, _, _| Ok(1));

        service(messages, MockUserRepository::new())
            .mark_read(&UserId::random(), &UserId::random())
            .await
            .expect("mark read");

        let events = log.0.lock().expect("event log lock").clone();
        assert_eq!(
            events,
            vec![(tracing::Level::INFO, "conversation marked read".to_owned())]
        );
    }

    #[rstest]
    #[case(MessagePersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(MessagePersistenceError::query("deadlock"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn delete_conversation_maps_failures(
        #[case] failure: MessagePersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut messages = MockMessageRepository::new();
        messages
            .expect_delete_between()
            .return_once(move |_, _| Err(failure));

        let err = service(messages, MockUserRepository::new())
            .delete_conversation(&UserId::random(), &UserId::random())
            .await
            .expect_err("failure");

        assert_eq!(err.code(), expected);
    }
}
