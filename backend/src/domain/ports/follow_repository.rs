//! Port abstraction for the follow graph.
use async_trait::async_trait;

use crate::domain::{Follow, FollowCounts, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError>;

    /// Store an edge. Returns `false` when it already existed.
    async fn insert(&self, follow: &Follow) -> Result<bool, FollowPersistenceError>;

    /// Remove an edge. Returns `false` when there was none.
    async fn remove(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError>;

    /// Edges pointing at `user`, oldest first.
    async fn followers_of(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError>;

    /// Edges leaving `user`, oldest first.
    async fn followed_by(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError>;

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError>;
}
