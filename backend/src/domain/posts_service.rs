//! Post publishing, engagement and feed queries.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    LikeOutcome, PostRepository, PostsCommand, PostsQuery, UserRepository, ViewOutcome,
};
use crate::domain::service_support::{map_post_error, require_user};
use crate::domain::{
    Comment, CommentId, CommentText, Error, Like, Post, PostDraft, PostFilter, PostId, PostView,
    UserId,
};

/// Posts service implementing [`PostsCommand`] and [`PostsQuery`].
#[derive(Clone)]
pub struct PostsService<P, U> {
    posts: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, U> PostsService<P, U> {
    pub fn new(posts: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            users,
            clock,
        }
    }
}

impl<P, U> PostsService<P, U>
where
    P: PostRepository,
{
    async fn load(&self, id: &PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }
}

#[async_trait]
impl<P, U> PostsCommand for PostsService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error> {
        let user = require_user(self.users.as_ref(), author).await?;
        let post = Post::publish(
            PostId::random(),
            author.clone(),
            user.username().clone(),
            draft,
            self.clock.utc(),
        );
        self.posts.insert(&post).await.map_err(map_post_error)?;
        info!(post_id = %post.id, author = %author, "post published");
        Ok(post)
    }

    async fn toggle_like(&self, post: &PostId, user: &UserId) -> Result<LikeOutcome, Error> {
        let mut current = self.load(post).await?;

        if current.is_liked_by(user) {
            self.posts
                .remove_like(post, user)
                .await
                .map_err(map_post_error)?;
            current.likes.retain(|like| &like.user_id != user);
            return Ok(LikeOutcome {
                liked: false,
                post: current,
            });
        }

        let liker = require_user(self.users.as_ref(), user).await?;
        let like = Like {
            user_id: user.clone(),
            username: liker.username().clone(),
            created_at: self.clock.utc(),
        };
        if self
            .posts
            .add_like(post, &like)
            .await
            .map_err(map_post_error)?
        {
            current.likes.push(like);
        }
        Ok(LikeOutcome {
            liked: true,
            post: current,
        })
    }

    async fn add_comment(
        &self,
        post: &PostId,
        user: &UserId,
        text: CommentText,
    ) -> Result<Post, Error> {
        let mut current = self.load(post).await?;
        let author = require_user(self.users.as_ref(), user).await?;
        let comment = Comment {
            id: CommentId::random(),
            user_id: user.clone(),
            username: author.username().clone(),
            text,
            created_at: self.clock.utc(),
        };
        self.posts
            .add_comment(post, &comment)
            .await
            .map_err(map_post_error)?;
        current.comments.push(comment);
        Ok(current)
    }

    async fn delete_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
        user: &UserId,
    ) -> Result<Post, Error> {
        let mut current = self.load(post).await?;
        let Some(found) = current.comment(comment) else {
            return Err(Error::not_found(format!("comment {comment} not found")));
        };
        if &found.user_id != user {
            return Err(Error::forbidden("you can only delete your own comments"));
        }

        self.posts
            .remove_comment(post, comment)
            .await
            .map_err(map_post_error)?;
        current.comments.retain(|existing| &existing.id != comment);
        Ok(current)
    }

    async fn record_view(&self, post: &PostId, viewer: &UserId) -> Result<ViewOutcome, Error> {
        let current = self.load(post).await?;
        if current.has_been_viewed_by(viewer) {
            return Ok(ViewOutcome {
                views: current.views(),
                counted: false,
            });
        }

        let view = PostView {
            user_id: viewer.clone(),
            viewed_at: self.clock.utc(),
        };
        let counted = self
            .posts
            .add_view(post, &view)
            .await
            .map_err(map_post_error)?;
        Ok(ViewOutcome {
            views: current.views() + usize::from(counted),
            counted,
        })
    }

    async fn delete_post(&self, post: &PostId, user: &UserId) -> Result<(), Error> {
        let current = self.load(post).await?;
        if &current.author_id != user {
            return Err(Error::forbidden("you can only delete your own posts"));
        }
        self.posts.delete(post).await.map_err(map_post_error)?;
        info!(post_id = %post, "post deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, U> PostsQuery for PostsService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, Error> {
        self.posts.list(filter).await.map_err(map_post_error)
    }
}
