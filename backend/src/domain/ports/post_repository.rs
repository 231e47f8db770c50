//! Port abstraction for posts and their owned likes, comments and views.
use async_trait::async_trait;

use crate::domain::{
    AuthorStats, Comment, CommentId, Like, Post, PostFilter, PostId, PostView, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Load a post with its likes, comments and viewers.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Posts matching `filter`, newest first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError>;

    /// Record a like. Returns `false` when the user already liked the post.
    async fn add_like(&self, post: &PostId, like: &Like) -> Result<bool, PostPersistenceError>;

    /// Remove a like. Returns `false` when there was none.
    async fn remove_like(&self, post: &PostId, user: &UserId)
    -> Result<bool, PostPersistenceError>;

    async fn add_comment(
        &self,
        post: &PostId,
        comment: &Comment,
    ) -> Result<(), PostPersistenceError>;

    /// Remove a comment. Returns `false` when it did not exist.
    async fn remove_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
    ) -> Result<bool, PostPersistenceError>;

    /// Record a unique view. Returns `false` when the user had already viewed
    /// the post.
    async fn add_view(&self, post: &PostId, view: &PostView) -> Result<bool, PostPersistenceError>;

    /// Delete a post and everything it owns. Returns `false` when absent.
    async fn delete(&self, post: &PostId) -> Result<bool, PostPersistenceError>;

    /// Totals across every post written by `author`.
    async fn author_stats(&self, author: &UserId) -> Result<AuthorStats, PostPersistenceError>;
}
