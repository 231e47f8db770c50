//! Shared harness for HTTP flow tests over the in-memory adapters.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use circle::Trace;
use circle::domain::{AccountService, MessagingService, PostsService, SocialService};
use circle::inbound::http::configure_api;
use circle::inbound::http::state::HttpState;
use circle::outbound::memory::{
    InMemoryFollowRepository, InMemoryMessageRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};
use circle::outbound::security::Argon2PasswordHasher;

pub const PASSWORD: &str = "secret123";

/// Clock the tests move by hand.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

fn epoch() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single() {
        Some(at) => at,
        None => panic!("fixed epoch"),
    }
}

/// Wire every service over fresh in-memory adapters and the given clock.
pub fn in_memory_state(clock: Arc<MutableClock>) -> HttpState {
    let clock: Arc<dyn Clock> = clock;
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("argon2 params"));
    let accounts = Arc::new(AccountService::new(users.clone(), hasher, clock.clone()));
    let social = Arc::new(SocialService::new(
        users.clone(),
        Arc::new(InMemoryFollowRepository::new()),
        posts.clone(),
        clock.clone(),
    ));
    let feed = Arc::new(PostsService::new(posts, users.clone(), clock.clone()));
    let messaging = Arc::new(MessagingService::new(
        Arc::new(InMemoryMessageRepository::new()),
        users,
        clock,
    ));
    HttpState {
        signup: accounts.clone(),
        login: accounts,
        users: social.clone(),
        follows: social,
        posts: feed.clone(),
        posts_query: feed,
        messaging: messaging.clone(),
        messaging_query: messaging,
    }
}

/// Full application plus the clock that drives it.
pub struct TestWorld<S> {
    pub app: S,
    pub clock: Arc<MutableClock>,
}

/// A signed-up user and their session cookie.
#[derive(Clone)]
pub struct Member {
    pub id: String,
    pub cookie: Cookie<'static>,
}

pub async fn world()
-> TestWorld<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>> {
    let clock = Arc::new(MutableClock::new(epoch()));
    let state = in_memory_state(clock.clone());
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await;
    TestWorld { app, clock }
}

/// Outcome of one request: status, JSON body (null when empty) and the
/// session cookie if the response set one.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
    pub cookie: Option<Cookie<'static>>,
}

impl<S> TestWorld<S>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    pub async fn send(&self, request: actix_test::TestRequest) -> Reply {
        let res = actix_test::call_service(&self.app, request.to_request()).await;
        let status = res.status();
        let trace_id = res
            .headers()
            .get(circle::domain::TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned);
        let bytes = actix_test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply {
            status,
            body,
            trace_id,
            cookie,
        }
    }

    pub async fn get(&self, member: &Member, uri: &str) -> Reply {
        self.send(
            actix_test::TestRequest::get()
                .uri(uri)
                .cookie(member.cookie.clone()),
        )
        .await
    }

    pub async fn post_json(&self, member: &Member, uri: &str, payload: Value) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri(uri)
                .cookie(member.cookie.clone())
                .set_json(payload),
        )
        .await
    }

    pub async fn post(&self, member: &Member, uri: &str) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri(uri)
                .cookie(member.cookie.clone()),
        )
        .await
    }

    pub async fn patch(&self, member: &Member, uri: &str) -> Reply {
        self.send(
            actix_test::TestRequest::patch()
                .uri(uri)
                .cookie(member.cookie.clone()),
        )
        .await
    }

    pub async fn delete(&self, member: &Member, uri: &str) -> Reply {
        self.send(
            actix_test::TestRequest::delete()
                .uri(uri)
                .cookie(member.cookie.clone()),
        )
        .await
    }

    pub async fn try_sign_up(&self, username: &str, email: &str) -> Reply {
        self.send(
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(json!({
                    "username": username,
                    "email": email,
                    "password": PASSWORD,
                })),
        )
        .await
    }

    /// Sign up `username` with a derived email and return their session.
    pub async fn sign_up(&self, username: &str) -> Member {
        let reply = self
            .try_sign_up(username, &format!("{username}@example.com"))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "signup {username}");
        let id = reply.body["id"].as_str().expect("account id").to_owned();
        let cookie = reply.cookie.expect("session cookie");
        self.clock.advance_seconds(1);
        Member { id, cookie }
    }

    pub async fn send_message(&self, from: &Member, to: &Member, content: &str) -> Reply {
        let reply = self
            .post_json(
                from,
                "/api/v1/messages",
                json!({"receiverId": to.id, "content": content}),
            )
            .await;
        self.clock.advance_seconds(1);
        reply
    }

    pub async fn conversations(&self, member: &Member) -> Vec<Value> {
        let reply = self.get(member, "/api/v1/messages/conversations").await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.body.as_array().cloned().expect("summary array")
    }
}
