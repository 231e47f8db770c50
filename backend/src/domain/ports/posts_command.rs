//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{CommentId, CommentText, Error, Post, PostDraft, PostId, UserId};

/// Outcome of toggling a like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    pub liked: bool,
    pub post: Post,
}

/// Outcome of recording a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOutcome {
    pub views: usize,
    pub counted: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error>;

    /// Like the post, or remove the like when `user` already liked it.
    async fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<LikeOutcome, Error>;

    async fn add_comment(
        &self,
        post: &PostId,
        user: &UserId,
        text: CommentText,
    ) -> Result<Post, Error>;

    /// Remove a comment; only its author may do so.
    async fn delete_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
        user: &UserId,
    ) -> Result<Post, Error>;

    /// Count a view once per viewer.
    async fn record_view(&self, post: &PostId, viewer: &UserId) -> Result<ViewOutcome, Error>;

    /// Delete a post; only its author may do so.
    async fn delete_post(&self, post: &PostId, user: &UserId) -> Result<(), Error>;
}
