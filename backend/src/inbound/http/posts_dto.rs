//! Request and response bodies for the posts API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{LikeOutcome, ViewOutcome};
use crate::domain::{Comment, Genre, Like, Post, PostView};

/// Body of `POST /api/v1/posts`. At least one of `content` and `imageUrl`
/// must be non-blank.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_promotion: bool,
    /// Defaults to `Other`.
    #[serde(default)]
    #[schema(example = "Music")]
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub text: String,
}

/// Feed filters.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub is_promotion: Option<bool>,
    pub genre: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    pub user_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeDto {
    fn from(like: Like) -> Self {
        Self {
            user_id: like.user_id.to_string(),
            username: like.username.to_string(),
            created_at: like.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            user_id: comment.user_id.to_string(),
            username: comment.username.to_string(),
            text: comment.text.as_ref().to_owned(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDto {
    pub user_id: String,
    pub viewed_at: DateTime<Utc>,
}

impl From<PostView> for ViewerDto {
    fn from(view: PostView) -> Self {
        Self {
            user_id: view.user_id.to_string(),
            viewed_at: view.viewed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    pub author_id: String,
    pub author_username: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_promotion: bool,
    #[schema(example = "Technology")]
    pub genre: String,
    pub likes: Vec<LikeDto>,
    pub comments: Vec<CommentDto>,
    pub viewers: Vec<ViewerDto>,
    /// Number of distinct viewers.
    pub views: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let views = post.views();
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            author_username: post.author_username.to_string(),
            content: post.content,
            image_url: post.image_url,
            is_promotion: post.is_promotion,
            genre: Genre::as_str(post.genre).to_owned(),
            likes: post.likes.into_iter().map(Into::into).collect(),
            comments: post.comments.into_iter().map(Into::into).collect(),
            viewers: post.viewers.into_iter().map(Into::into).collect(),
            views,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: usize,
    pub post: PostDto,
}

impl From<LikeOutcome> for LikeResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            liked: outcome.liked,
            like_count: outcome.post.likes.len(),
            post: outcome.post.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub views: usize,
    pub counted: bool,
}

impl From<ViewOutcome> for ViewResponse {
    fn from(outcome: ViewOutcome) -> Self {
        Self {
            views: outcome.views,
            counted: outcome.counted,
        }
    }
}
