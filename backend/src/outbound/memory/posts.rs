//! `PostRepository` over a process-local list of posts.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{
    AuthorStats, Comment, CommentId, Like, Post, PostFilter, PostId, PostView, UserId,
};

fn poisoned() -> PostPersistenceError {
    PostPersistenceError::query("post store lock poisoned")
}

fn missing(post: &PostId) -> PostPersistenceError {
    PostPersistenceError::query(format!("post {post} does not exist"))
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `apply` against the stored post with `id`.
    fn with_post<T>(
        &self,
        id: &PostId,
        apply: impl FnOnce(&mut Post) -> T,
    ) -> Result<T, PostPersistenceError> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;
        let post = posts
            .iter_mut()
            .find(|post| &post.id == id)
            .ok_or_else(|| missing(id))?;
        Ok(apply(post))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;
        posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        Ok(posts.iter().find(|post| &post.id == id).cloned())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Post> = posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(matching)
    }

    async fn add_like(&self, post: &PostId, like: &Like) -> Result<bool, PostPersistenceError> {
        self.with_post(post, |stored| {
            if stored.is_liked_by(&like.user_id) {
                return false;
            }
            stored.likes.push(like.clone());
            true
        })
    }

    async fn remove_like(
        &self,
        post: &PostId,
        user: &UserId,
    ) -> Result<bool, PostPersistenceError> {
        self.with_post(post, |stored| {
            let before = stored.likes.len();
            stored.likes.retain(|like| &like.user_id != user);
            stored.likes.len() != before
        })
    }

    async fn add_comment(
        &self,
        post: &PostId,
        comment: &Comment,
    ) -> Result<(), PostPersistenceError> {
        self.with_post(post, |stored| stored.comments.push(comment.clone()))
    }

    async fn remove_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
    ) -> Result<bool, PostPersistenceError> {
        self.with_post(post, |stored| {
            let before = stored.comments.len();
            stored.comments.retain(|existing| &existing.id != comment);
            stored.comments.len() != before
        })
    }

    async fn add_view(&self, post: &PostId, view: &PostView) -> Result<bool, PostPersistenceError> {
        self.with_post(post, |stored| {
            if stored.has_been_viewed_by(&view.user_id) {
                return false;
            }
            stored.viewers.push(view.clone());
            true
        })
    }

    async fn delete(&self, post: &PostId) -> Result<bool, PostPersistenceError> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;
        let before = posts.len();
        posts.retain(|stored| &stored.id != post);
        Ok(posts.len() != before)
    }

    async fn author_stats(&self, author: &UserId) -> Result<AuthorStats, PostPersistenceError> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        Ok(posts
            .iter()
            .filter(|post| &post.author_id == author)
            .fold(AuthorStats::default(), |mut stats, post| {
                stats.post_count += 1;
                stats.total_likes += post.likes.len() as u64;
                stats.total_views += post.views() as u64;
                stats
            }))
    }
}
