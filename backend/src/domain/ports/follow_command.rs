//! Driving port for follow graph mutations.

use async_trait::async_trait;

use crate::domain::{Error, FollowOutcome, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow `target` if `follower` does not already, otherwise unfollow.
    async fn toggle_follow(&self, follower: &UserId, target: &UserId)
    -> Result<FollowOutcome, Error>;
}
