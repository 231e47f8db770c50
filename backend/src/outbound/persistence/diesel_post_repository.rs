//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Likes, views and comments live in child tables keyed by post id. Reads
//! load the parent rows first and then each child table once for the whole
//! page, grouping children back onto their posts in creation order.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{
    AuthorStats, Comment, CommentId, CommentText, Genre, Like, Post, PostFilter, PostId, PostView,
    UserId, Username,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPostRow, PostCommentRow, PostLikeRow, PostRow, PostViewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{post_comments, post_likes, post_views, posts};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn corrupt(what: &str, id: Uuid, err: impl std::fmt::Display) -> PostPersistenceError {
    PostPersistenceError::query(format!("stored {what} {id}: {err}"))
}

fn stored_username(raw: &str, id: Uuid) -> Result<Username, PostPersistenceError> {
    Username::new(raw).map_err(|err| corrupt("username", id, err))
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[derive(Default)]
struct Children {
    likes: Vec<Like>,
    comments: Vec<Comment>,
    viewers: Vec<PostView>,
}

fn assemble(row: PostRow, children: Children) -> Result<Post, PostPersistenceError> {
    let genre: Genre = row.genre.parse().map_err(|err| corrupt("post", row.id, err))?;
    Ok(Post {
        id: PostId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        author_username: stored_username(&row.author_username, row.id)?,
        content: row.content,
        image_url: row.image_url,
        is_promotion: row.is_promotion,
        genre,
        likes: children.likes,
        comments: children.comments,
        viewers: children.viewers,
        created_at: row.created_at,
    })
}

/// Load every child row of `rows` and attach them to their posts.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostRow>,
) -> Result<Vec<Post>, PostPersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let likes: Vec<PostLikeRow> = post_likes::table
        .filter(post_likes::post_id.eq_any(&ids))
        .order((post_likes::created_at.asc(), post_likes::user_id.asc()))
        .select(PostLikeRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let comments: Vec<PostCommentRow> = post_comments::table
        .filter(post_comments::post_id.eq_any(&ids))
        .order((post_comments::created_at.asc(), post_comments::id.asc()))
        .select(PostCommentRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let views: Vec<PostViewRow> = post_views::table
        .filter(post_views::post_id.eq_any(&ids))
        .order((post_views::viewed_at.asc(), post_views::user_id.asc()))
        .select(PostViewRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut children: HashMap<Uuid, Children> = HashMap::new();
    for like in likes {
        let username = stored_username(&like.username, like.post_id)?;
        children.entry(like.post_id).or_default().likes.push(Like {
            user_id: UserId::from_uuid(like.user_id),
            username,
            created_at: like.created_at,
        });
    }
    for comment in comments {
        let username = stored_username(&comment.username, comment.post_id)?;
        let text = CommentText::new(&comment.body).map_err(|err| corrupt("comment", comment.id, err))?;
        children
            .entry(comment.post_id)
            .or_default()
            .comments
            .push(Comment {
                id: CommentId::from_uuid(comment.id),
                user_id: UserId::from_uuid(comment.user_id),
                username,
                text,
                created_at: comment.created_at,
            });
    }
    for view in views {
        children.entry(view.post_id).or_default().viewers.push(PostView {
            user_id: UserId::from_uuid(view.user_id),
            viewed_at: view.viewed_at,
        });
    }

    rows.into_iter()
        .map(|row| {
            let owned = children.remove(&row.id).unwrap_or_default();
            assemble(row, owned)
        })
        .collect()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            id: *post.id.as_uuid(),
            author_id: *post.author_id.as_uuid(),
            author_username: post.author_username.as_ref(),
            content: post.content.as_deref(),
            image_url: post.image_url.as_deref(),
            is_promotion: post.is_promotion,
            genre: post.genre.as_str(),
            created_at: post.created_at,
        };

        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = posts::table.select(PostRow::as_select()).into_boxed();
        if let Some(author) = &filter.author {
            query = query.filter(posts::author_id.eq(*author.as_uuid()));
        }
        if let Some(flag) = filter.is_promotion {
            query = query.filter(posts::is_promotion.eq(flag));
        }
        if let Some(genre) = filter.genre {
            query = query.filter(posts::genre.eq(genre.as_str()));
        }

        let rows: Vec<PostRow> = query
            .order((posts::created_at.desc(), posts::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        hydrate(&mut conn, rows).await
    }

    async fn add_like(&self, post: &PostId, like: &Like) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PostLikeRow {
            post_id: *post.as_uuid(),
            user_id: *like.user_id.as_uuid(),
            username: like.username.as_ref().to_owned(),
            created_at: like.created_at,
        };

        let inserted = diesel::insert_into(post_likes::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn remove_like(
        &self,
        post: &PostId,
        user: &UserId,
    ) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            post_likes::table
                .filter(post_likes::post_id.eq(post.as_uuid()))
                .filter(post_likes::user_id.eq(user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn add_comment(
        &self,
        post: &PostId,
        comment: &Comment,
    ) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PostCommentRow {
            id: *comment.id.as_uuid(),
            post_id: *post.as_uuid(),
            user_id: *comment.user_id.as_uuid(),
            username: comment.username.as_ref().to_owned(),
            body: comment.text.as_ref().to_owned(),
            created_at: comment.created_at,
        };

        diesel::insert_into(post_comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove_comment(
        &self,
        post: &PostId,
        comment: &CommentId,
    ) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            post_comments::table
                .filter(post_comments::id.eq(comment.as_uuid()))
                .filter(post_comments::post_id.eq(post.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn add_view(&self, post: &PostId, view: &PostView) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PostViewRow {
            post_id: *post.as_uuid(),
            user_id: *view.user_id.as_uuid(),
            viewed_at: view.viewed_at,
        };

        let inserted = diesel::insert_into(post_views::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn delete(&self, post: &PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(posts::table.filter(posts::id.eq(post.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn author_stats(&self, author: &UserId) -> Result<AuthorStats, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author = *author.as_uuid();

        let post_count: i64 = posts::table
            .filter(posts::author_id.eq(author))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_likes: i64 = post_likes::table
            .inner_join(posts::table)
            .filter(posts::author_id.eq(author))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total_views: i64 = post_views::table
            .inner_join(posts::table)
            .filter(posts::author_id.eq(author))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AuthorStats {
            post_count: count_to_u64(post_count),
            total_likes: count_to_u64(total_likes),
            total_views: count_to_u64(total_views),
        })
    }
}
