//! Follow graph and public profile types.

use chrono::{DateTime, Utc};

use super::{AuthorStats, UserId, UserSummary};

/// Directed follow edge.
///
/// ## Invariants
/// - `follower` and `followee` differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    pub follower: UserId,
    pub followee: UserId,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a follow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub is_following: bool,
    pub follower_count: u64,
}

/// One row of a followers or following list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowEntry {
    pub user: UserSummary,
    pub followed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

/// Public profile with social and engagement statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: UserSummary,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub total_likes: u64,
    pub total_views: u64,
}

impl UserProfile {
    pub fn assemble(user: UserSummary, follows: FollowCounts, stats: AuthorStats) -> Self {
        Self {
            user,
            follower_count: follows.followers,
            following_count: follows.following,
            post_count: stats.post_count,
            total_likes: stats.total_likes,
            total_views: stats.total_views,
        }
    }
}
