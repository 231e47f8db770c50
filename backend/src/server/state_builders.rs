//! Builders wiring repositories into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use circle::domain::ports::{
    FollowRepository, MessageRepository, PasswordHasher, PostRepository, UserRepository,
};
use circle::domain::{AccountService, MessagingService, PostsService, SocialService};
use circle::inbound::http::state::HttpState;
use circle::outbound::memory::{
    InMemoryFollowRepository, InMemoryMessageRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};
use circle::outbound::persistence::{
    DieselFollowRepository, DieselMessageRepository, DieselPostRepository, DieselUserRepository,
};
use circle::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Driven adapters for one backing store.
struct Repositories<U, M, P, F> {
    users: Arc<U>,
    messages: Arc<M>,
    posts: Arc<P>,
    follows: Arc<F>,
}

fn assemble<U, M, P, F, H>(
    repos: Repositories<U, M, P, F>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    M: MessageRepository + 'static,
    P: PostRepository + 'static,
    F: FollowRepository + 'static,
    H: PasswordHasher + 'static,
{
    let Repositories {
        users,
        messages,
        posts,
        follows,
    } = repos;
    let accounts = Arc::new(AccountService::new(users.clone(), hasher, clock.clone()));
    let social = Arc::new(SocialService::new(
        users.clone(),
        follows,
        posts.clone(),
        clock.clone(),
    ));
    let feed = Arc::new(PostsService::new(posts, users.clone(), clock.clone()));
    let messaging = Arc::new(MessagingService::new(messages, users, clock));

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

/// Build handler state over Diesel when a pool is configured, otherwise
/// over the in-memory adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => assemble(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                messages: Arc::new(DieselMessageRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool.clone())),
                follows: Arc::new(DieselFollowRepository::new(pool.clone())),
            },
            hasher,
            clock,
        ),
        None => assemble(
            Repositories {
                users: Arc::new(InMemoryUserRepository::new()),
                messages: Arc::new(InMemoryMessageRepository::new()),
                posts: Arc::new(InMemoryPostRepository::new()),
                follows: Arc::new(InMemoryFollowRepository::new()),
            },
            hasher,
            clock,
        ),
    };
    web::Data::new(state)
}
