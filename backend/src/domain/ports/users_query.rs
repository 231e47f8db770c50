//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, FollowEntry, User, UserId, UserProfile, UserSummary};

/// Maximum number of users returned by a search.
pub const USER_SEARCH_LIMIT: usize = 10;

/// Domain use-case port for reading users and their follow lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// The authenticated user's own account.
    async fn current_user(&self, user: &UserId) -> Result<User, Error>;

    /// Users whose username or email contains `query`, excluding the requester.
    async fn search(&self, requester: &UserId, query: &str) -> Result<Vec<UserSummary>, Error>;

    /// Public profile with follow and engagement statistics.
    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error>;

    /// Users following `user`, oldest edge first.
    async fn followers(&self, user: &UserId) -> Result<Vec<FollowEntry>, Error>;

    /// Users `user` follows, oldest edge first.
    async fn following(&self, user: &UserId) -> Result<Vec<FollowEntry>, Error>;
}
