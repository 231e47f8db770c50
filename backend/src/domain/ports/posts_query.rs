//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostFilter};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Posts matching `filter`, newest first.
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, Error>;
}
