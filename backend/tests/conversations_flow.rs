//! End-to-end direct-messaging flows over the in-memory adapters.

#[allow(dead_code, reason = "shared harness exposes helpers other suites use")]
mod support;

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use support::world;

fn contents(messages: &Value) -> Vec<&str> {
    messages
        .as_array()
        .expect("message array")
        .iter()
        .filter_map(|message| message["content"].as_str())
        .collect()
}

fn contact_names(summaries: &[Value]) -> Vec<&str> {
    summaries
        .iter()
        .filter_map(|summary| summary["contact"]["username"].as_str())
        .collect()
}

#[actix_web::test]
async fn reply_becomes_last_message_and_mark_read_is_idempotent() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;

    let sent = w.send_message(&alice, &bob, "hi").await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(sent.body["isRead"], false);
    w.send_message(&bob, &alice, "hello").await;

    let summaries = w.conversations(&alice).await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["contact"]["id"], bob.id.as_str());
    assert!(summaries[0]["contact"].get("email").is_none());
    assert_eq!(summaries[0]["lastMessage"]["content"], "hello");
    assert_eq!(summaries[0]["unreadCount"], 1);

    // Bob sees his own "hello" as last, with nothing unread.
    let bobs = w.conversations(&bob).await;
    assert_eq!(bobs[0]["lastMessage"]["content"], "hello");
    assert_eq!(bobs[0]["unreadCount"], 0);

    let first = w
        .patch(&alice, &format!("/api/v1/messages/read/{}", bob.id))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, json!({"updated": 1}));

    let again = w
        .patch(&alice, &format!("/api/v1/messages/read/{}", bob.id))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body, json!({"updated": 0}));

    let summaries = w.conversations(&alice).await;
    assert_eq!(summaries[0]["unreadCount"], 0);

    let thread = w.get(&alice, &format!("/api/v1/messages/{}", bob.id)).await;
    let hello = &thread.body[1];
    assert_eq!(hello["isRead"], true);
    assert!(hello["readAt"].is_string());
}

#[actix_web::test]
async fn unread_count_only_counts_incoming_messages() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;

    for text in ["one", "two", "three"] {
        w.send_message(&bob, &alice, text).await;
    }
    w.send_message(&alice, &bob, "mine").await;

    let summaries = w.conversations(&alice).await;
    assert_eq!(summaries[0]["unreadCount"], 3);
    assert_eq!(summaries[0]["lastMessage"]["content"], "mine");
}

#[actix_web::test]
async fn most_recent_counterpart_is_listed_first() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;
    let carol = w.sign_up("carol").await;

    w.send_message(&alice, &bob, "to bob").await;
    w.send_message(&alice, &carol, "to carol").await;
    assert_eq!(contact_names(&w.conversations(&alice).await), ["carol", "bob"]);

    w.send_message(&bob, &alice, "bob again").await;
    assert_eq!(contact_names(&w.conversations(&alice).await), ["bob", "carol"]);
}

#[actix_web::test]
async fn messages_are_listed_oldest_first() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;

    w.send_message(&alice, &bob, "first").await;
    w.send_message(&bob, &alice, "second").await;
    w.send_message(&alice, &bob, "third").await;

    let thread = w.get(&bob, &format!("/api/v1/messages/{}", alice.id)).await;
    assert_eq!(thread.status, StatusCode::OK);
    assert_eq!(contents(&thread.body), ["first", "second", "third"]);
}

#[actix_web::test]
async fn deleting_a_conversation_leaves_others_untouched() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;
    let carol = w.sign_up("carol").await;

    w.send_message(&alice, &bob, "hi bob").await;
    w.send_message(&bob, &alice, "hi alice").await;
    w.send_message(&alice, &carol, "hi carol").await;

    let deleted = w
        .delete(&alice, &format!("/api/v1/messages/conversation/{}", bob.id))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let with_bob = w.get(&alice, &format!("/api/v1/messages/{}", bob.id)).await;
    assert_eq!(with_bob.body, json!([]));
    assert!(w.conversations(&bob).await.is_empty());

    let with_carol = w.get(&alice, &format!("/api/v1/messages/{}", carol.id)).await;
    assert_eq!(contents(&with_carol.body), ["hi carol"]);
    assert_eq!(contact_names(&w.conversations(&alice).await), ["carol"]);

    let repeat = w
        .delete(&alice, &format!("/api/v1/messages/conversation/{}", bob.id))
        .await;
    assert_eq!(repeat.status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn newcomer_has_no_conversations() {
    let w = world().await;
    let dave = w.sign_up("dave").await;

    assert!(w.conversations(&dave).await.is_empty());
}

#[actix_web::test]
async fn invalid_sends_are_rejected() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    let bob = w.sign_up("bob").await;

    let to_self = w.send_message(&alice, &alice, "me").await;
    assert_eq!(to_self.status, StatusCode::BAD_REQUEST);

    let blank = w.send_message(&alice, &bob, "   ").await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["details"]["field"], "content");

    let unknown = w
        .post_json(
            &alice,
            "/api/v1/messages",
            json!({"receiverId": "99999999-9999-4999-8999-999999999999", "content": "hello?"}),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    assert!(w.conversations(&alice).await.is_empty());
}

#[actix_web::test]
async fn anonymous_requests_get_401_with_trace_id() {
    let w = world().await;

    let reply = w
        .send(actix_web::test::TestRequest::get().uri("/api/v1/messages/conversations"))
        .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    let header = reply.trace_id.expect("trace-id header");
    assert_eq!(reply.body["traceId"].as_str(), Some(header.as_str()));
}

#[rstest]
#[case::numeric_receiver(json!({"receiverId": 5, "content": "hi"}))]
#[case::null_content(json!({"receiverId": "99999999-9999-4999-8999-999999999999", "content": null}))]
#[actix_web::test]
async fn mistyped_bodies_are_domain_errors_with_trace_id(#[case] payload: Value) {
    let w = world().await;
    let alice = w.sign_up("alice").await;

    let reply = w.post_json(&alice, "/api/v1/messages", payload).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    assert_eq!(reply.body["details"]["field"], "body");
    let header = reply.trace_id.expect("trace-id header");
    assert_eq!(reply.body["traceId"].as_str(), Some(header.as_str()));
    assert!(w.conversations(&alice).await.is_empty());
}

#[actix_web::test]
async fn mistyped_query_is_a_domain_error() {
    let w = world().await;

    let reply = w
        .send(actix_web::test::TestRequest::get().uri("/api/v1/posts?isPromotion=maybe"))
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    assert_eq!(reply.body["details"]["field"], "query");
    assert!(reply.body["traceId"].is_string());
}
