//! Conversation summaries derived from a user's direct messages.
//!
//! Summaries are never stored. Each request folds the requester's messages
//! into one entry per counterpart holding the latest message and the number
//! of messages the requester has not read yet.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{Message, UserId, UserSummary};

/// Per-counterpart reduction of a requester's messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationDigest {
    pub counterpart: UserId,
    pub last_message: Message,
    pub unread_count: usize,
}

/// A digest joined with the counterpart's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub contact: UserSummary,
    pub last_message: Message,
    pub unread_count: usize,
}

/// Fold `messages` into one digest per counterpart of `requester`.
///
/// Messages that do not involve `requester` are ignored. Within a
/// conversation the last message is the one with the greatest creation time;
/// equal timestamps fall back to the greater message id. The result is ordered
/// by last-message recency, newest first, then by counterpart id.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use circle::domain::{
///     summarize_conversations, Message, MessageBody, MessageId, UserId,
/// };
///
/// let me = UserId::random();
/// let friend = UserId::random();
/// let hello = Message::new(
///     MessageId::random(),
///     friend.clone(),
///     me.clone(),
///     MessageBody::new("hello").unwrap(),
///     Utc.timestamp_opt(2, 0).unwrap(),
/// );
///
/// let digests = summarize_conversations(&me, vec![hello]);
/// assert_eq!(digests.len(), 1);
/// assert_eq!(digests[0].counterpart, friend);
/// assert_eq!(digests[0].unread_count, 1);
/// ```
pub fn summarize_conversations<I>(requester: &UserId, messages: I) -> Vec<ConversationDigest>
where
    I: IntoIterator<Item = Message>,
{
    let mut groups: HashMap<UserId, ConversationDigest> = HashMap::new();

    for message in messages {
        let Some(counterpart) = message.counterpart_of(requester).cloned() else {
            continue;
        };
        let unread = usize::from(message.is_unread_by(requester));

        match groups.entry(counterpart) {
            Entry::Occupied(mut slot) => {
                let digest = slot.get_mut();
                digest.unread_count += unread;
                if message.chronological_cmp(&digest.last_message).is_gt() {
                    digest.last_message = message;
                }
            }
            Entry::Vacant(slot) => {
                let counterpart = slot.key().clone();
                slot.insert(ConversationDigest {
                    counterpart,
                    last_message: message,
                    unread_count: unread,
                });
            }
        }
    }

    let mut digests: Vec<ConversationDigest> = groups.into_values().collect();
    digests.sort_by(|a, b| {
        b.last_message
            .chronological_cmp(&a.last_message)
            .then_with(|| a.counterpart.cmp(&b.counterpart))
    });
    digests
}

/// Attach public profiles to digests, keeping their order.
///
/// Digests whose counterpart has no profile (for example a deleted account)
/// are dropped.
pub fn attach_contacts(
    digests: Vec<ConversationDigest>,
    contacts: impl IntoIterator<Item = UserSummary>,
) -> Vec<ConversationSummary> {
    let by_id: HashMap<UserId, UserSummary> = contacts
        .into_iter()
        .map(|contact| (contact.id.clone(), contact))
        .collect();

    digests
        .into_iter()
        .filter_map(|digest| {
            let contact = by_id.get(&digest.counterpart)?.clone();
            Some(ConversationSummary {
                contact,
                last_message: digest.last_message,
                unread_count: digest.unread_count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Property and scenario coverage for the conversation fold.

    use super::*;
    use crate::domain::{MessageBody, MessageId, Username};
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
    }

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    fn send(sender: &UserId, receiver: &UserId, text: &str, seconds: i64) -> Message {
        Message::new(
            MessageId::random(),
            sender.clone(),
            receiver.clone(),
            MessageBody::new(text).expect("valid body"),
            at(seconds),
        )
    }

    fn summary_for(id: &UserId, name: &str) -> UserSummary {
        UserSummary {
            id: id.clone(),
            username: Username::new(name).expect("valid username"),
            created_at: at(0),
        }
    }

    #[fixture]
    fn a() -> UserId {
        user(0xA)
    }

    #[fixture]
    fn b() -> UserId {
        user(0xB)
    }

    #[fixture]
    fn c() -> UserId {
        user(0xC)
    }

    #[rstest]
    fn no_messages_yields_no_conversations(a: UserId) {
        assert!(summarize_conversations(&a, Vec::new()).is_empty());
    }

    #[rstest]
    fn reply_becomes_last_message_and_counts_as_unread(a: UserId, b: UserId) {
        let messages = vec![send(&a, &b, "hi", 1), send(&b, &a, "hello", 2)];

        let digests = summarize_conversations(&a, messages);

        assert_eq!(digests.len(), 1);
        let digest = &digests[0];
        assert_eq!(digest.counterpart, b);
        assert_eq!(digest.last_message.body.as_ref(), "hello");
        assert_eq!(digest.unread_count, 1);
    }

    #[rstest]
    fn reading_the_reply_clears_the_unread_count(a: UserId, b: UserId) {
        let mut reply = send(&b, &a, "hello", 2);
        reply.mark_read(at(3));

        let digests = summarize_conversations(&a, vec![send(&a, &b, "hi", 1), reply]);

        assert_eq!(digests[0].unread_count, 0);
    }

    #[rstest]
    fn last_message_is_the_latest_regardless_of_input_order(a: UserId, b: UserId) {
        let messages = vec![
            send(&b, &a, "second", 20),
            send(&a, &b, "third", 30),
            send(&b, &a, "first", 10),
        ];

        let digests = summarize_conversations(&a, messages);

        assert_eq!(digests[0].last_message.body.as_ref(), "third");
    }

    #[rstest]
    fn unread_count_only_counts_messages_received_by_requester(a: UserId, b: UserId) {
        let mut read = send(&b, &a, "read", 3);
        read.mark_read(at(4));
        let messages = vec![
            send(&a, &b, "mine", 1),
            send(&a, &b, "mine too", 2),
            read,
            send(&b, &a, "new", 5),
            send(&b, &a, "newer", 6),
        ];

        let for_a = summarize_conversations(&a, messages.clone());
        let for_b = summarize_conversations(&b, messages);

        assert_eq!(for_a[0].unread_count, 2);
        assert_eq!(for_b[0].unread_count, 2);
    }

    #[rstest]
    fn conversations_are_ordered_by_recency(a: UserId, b: UserId, c: UserId) {
        let messages = vec![
            send(&a, &b, "old", 1),
            send(&c, &a, "recent", 5),
            send(&b, &a, "middle", 3),
        ];

        let order: Vec<UserId> = summarize_conversations(&a, messages)
            .into_iter()
            .map(|digest| digest.counterpart)
            .collect();

        assert_eq!(order, vec![c, b]);
    }

    #[rstest]
    fn equal_timestamps_prefer_the_greater_message_id(a: UserId, b: UserId) {
        let mut low = send(&a, &b, "low", 7);
        let mut high = send(&b, &a, "high", 7);
        low.id = MessageId::from_uuid(Uuid::from_u128(1));
        high.id = MessageId::from_uuid(Uuid::from_u128(2));

        let forward = summarize_conversations(&a, vec![low.clone(), high.clone()]);
        let backward = summarize_conversations(&a, vec![high, low]);

        assert_eq!(forward[0].last_message.body.as_ref(), "high");
        assert_eq!(backward[0].last_message.body.as_ref(), "high");
    }

    #[rstest]
    fn equally_recent_conversations_order_by_counterpart(a: UserId, b: UserId, c: UserId) {
        let mut to_c = send(&a, &c, "x", 4);
        let mut to_b = send(&a, &b, "y", 4);
        to_c.id = MessageId::from_uuid(Uuid::from_u128(5));
        to_b.id = MessageId::from_uuid(Uuid::from_u128(5));

        let order: Vec<UserId> = summarize_conversations(&a, vec![to_c, to_b])
            .into_iter()
            .map(|digest| digest.counterpart)
            .collect();

        assert_eq!(order, vec![b, c]);
    }

    #[rstest]
    fn messages_between_other_users_are_ignored(a: UserId, b: UserId, c: UserId) {
        let digests = summarize_conversations(&a, vec![send(&b, &c, "not yours", 1)]);
        assert!(digests.is_empty());
    }

    #[rstest]
    fn attach_contacts_keeps_order_and_drops_unknown_counterparts(
        a: UserId,
        b: UserId,
        c: UserId,
    ) {
        let digests = summarize_conversations(
            &a,
            vec![send(&a, &b, "to b", 1), send(&c, &a, "from c", 2)],
        );

        let joined = attach_contacts(digests.clone(), vec![summary_for(&b, "bobby")]);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].contact.username.as_ref(), "bobby");

        let both = attach_contacts(
            digests,
            vec![summary_for(&b, "bobby"), summary_for(&c, "carol")],
        );
        let names: Vec<&str> = both.iter().map(|s| s.contact.username.as_ref()).collect();
        assert_eq!(names, vec!["carol", "bobby"]);
    }
}
