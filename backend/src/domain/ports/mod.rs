//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, `*Service`) are called by inbound
//! adapters. Driven ports (`*Repository`, [`PasswordHasher`]) are implemented
//! by outbound adapters and consumed by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod follow_command;
mod follow_repository;
mod login_service;
mod message_repository;
mod messaging_command;
mod messaging_query;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowPersistenceError, FollowRepository};
pub use login_service::{LoginService, SignupService};
#[cfg(test)]
pub use login_service::{MockLoginService, MockSignupService};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessagePersistenceError, MessageRepository};
#[cfg(test)]
pub use messaging_command::MockMessagingCommand;
pub use messaging_command::{MessagingCommand, SendMessageRequest};
#[cfg(test)]
pub use messaging_query::MockMessagingQuery;
pub use messaging_query::MessagingQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::{LikeOutcome, PostsCommand, ViewOutcome};
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::PostsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{USER_SEARCH_LIMIT, UsersQuery};
