//! Signup, login, logout and user search over the in-memory adapters.

#[allow(dead_code, reason = "shared harness exposes helpers other suites use")]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use support::{Member, PASSWORD, world};

#[rstest]
#[case::same_email("alice2", "alice@example.com")]
#[case::email_differs_in_case("alice3", "ALICE@Example.com")]
#[case::username_differs_in_case("ALICE", "other@example.com")]
#[actix_web::test]
async fn duplicate_accounts_conflict(#[case] username: &str, #[case] email: &str) {
    let w = world().await;
    w.sign_up("alice").await;

    let reply = w.try_sign_up(username, email).await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "conflict");
    assert!(reply.cookie.is_none());
}

#[actix_web::test]
async fn signup_response_omits_the_password() {
    let w = world().await;

    let reply = w.try_sign_up("alice", "Alice@Example.com").await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["email"], "alice@example.com");
    assert!(reply.body.get("password").is_none());
    assert!(reply.body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn login_me_logout_round() {
    let w = world().await;
    w.sign_up("alice").await;

    let wrong = w
        .send(
            TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "alice@example.com", "password": "nope"})),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let login = w
        .send(
            TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ALICE@example.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let member = Member {
        id: login.body["id"].as_str().expect("id").to_owned(),
        cookie: login.cookie.expect("session cookie"),
    };

    let me = w.get(&member, "/api/v1/auth/me").await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "alice");

    let logout = w.post(&member, "/api/v1/auth/logout").await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    let cleared = Member {
        id: member.id,
        cookie: logout.cookie.expect("removal cookie"),
    };

    let after = w.get(&cleared, "/api/v1/auth/me").await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.body["code"], "unauthorized");
}

#[actix_web::test]
async fn unknown_email_is_indistinguishable_from_wrong_password() {
    let w = world().await;
    w.sign_up("alice").await;

    let reply = w
        .send(
            TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "nobody@example.com", "password": PASSWORD})),
        )
        .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn search_hides_email_and_excludes_the_requester() {
    let w = world().await;
    let alice = w.sign_up("alice").await;
    w.sign_up("alina").await;
    w.sign_up("bob").await;

    let reply = w.get(&alice, "/api/v1/users/search?q=ALI").await;

    assert_eq!(reply.status, StatusCode::OK);
    let found = reply.body.as_array().expect("results");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["username"], "alina");
    assert!(found[0].get("email").is_none());

    let blank = w.get(&alice, "/api/v1/users/search?q=%20").await;
    assert_eq!(blank.body, json!([]));
}
