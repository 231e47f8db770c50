//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test as actix_test};

use crate::domain::ports::{
    MockFollowCommand, MockLoginService, MockMessagingCommand, MockMessagingQuery,
    MockPostsCommand, MockPostsQuery, MockSignupService, MockUsersQuery,
};
use crate::inbound::http::session::USER_ID_KEY;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Port mocks for handler tests. Set expectations on the ports a test
/// exercises, then call [`MockPorts::into_state`]; untouched mocks panic if
/// a handler reaches them.
#[derive(Default)]
pub struct MockPorts {
    pub signup: MockSignupService,
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub follows: MockFollowCommand,
    pub posts: MockPostsCommand,
    pub posts_query: MockPostsQuery,
    pub messaging: MockMessagingCommand,
    pub messaging_query: MockMessagingQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            signup: Arc::new(self.signup),
            login: Arc::new(self.login),
            users: Arc::new(self.users),
            follows: Arc::new(self.follows),
            posts: Arc::new(self.posts),
            posts_query: Arc::new(self.posts_query),
            messaging: Arc::new(self.messaging),
            messaging_query: Arc::new(self.messaging_query),
        }
    }
}

/// Identity planted in the session by [`seed_session`].
pub const TEST_USER: &str = "11111111-1111-4111-8111-111111111111";

/// Path that [`session_cookie`] calls; mount [`seed_session`] there.
pub const SEED_SESSION_PATH: &str = "/test-login";

/// Handler that signs the request in as [`TEST_USER`].
pub async fn seed_session(session: Session) -> HttpResponse {
    match session.insert(USER_ID_KEY, TEST_USER) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// Call [`SEED_SESSION_PATH`] and return the resulting session cookie.
pub async fn session_cookie(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri(SEED_SESSION_PATH)
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}
