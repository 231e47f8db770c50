//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FollowCommand, LoginService, MessagingCommand, MessagingQuery, PostsCommand, PostsQuery,
    SignupService, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use circle::domain::{AccountService, MessagingService, PostsService, SocialService};
/// use circle::inbound::http::state::HttpState;
/// use circle::outbound::memory::{
///     InMemoryFollowRepository, InMemoryMessageRepository, InMemoryPostRepository,
///     InMemoryUserRepository,
/// };
/// use circle::outbound::security::Argon2PasswordHasher;
/// use mockable::DefaultClock;
///
/// let clock = Arc::new(DefaultClock);
/// let users = Arc::new(InMemoryUserRepository::new());
/// let posts = Arc::new(InMemoryPostRepository::new());
/// let accounts = Arc::new(AccountService::new(
///     users.clone(),
///     Arc::new(Argon2PasswordHasher::new()),
///     clock.clone(),
/// ));
/// let social = Arc::new(SocialService::new(
///     users.clone(),
///     Arc::new(InMemoryFollowRepository::new()),
///     posts.clone(),
///     clock.clone(),
/// ));
/// let feed = Arc::new(PostsService::new(posts, users.clone(), clock.clone()));
/// let messaging = Arc::new(MessagingService::new(
///     Arc::new(InMemoryMessageRepository::new()),
///     users,
///     clock,
/// ));
///
/// let state = HttpState {
///     signup: accounts.clone(),
///     login: accounts,
///     users: social.clone(),
///     follows: social,
///     posts: feed.clone(),
///     posts_query: feed,
///     messaging: messaging.clone(),
///     messaging_query: messaging,
/// };
/// let _users = state.users.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub signup: Arc<dyn SignupService>,
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub follows: Arc<dyn FollowCommand>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    pub messaging: Arc<dyn MessagingCommand>,
    pub messaging_query: Arc<dyn MessagingQuery>,
}
