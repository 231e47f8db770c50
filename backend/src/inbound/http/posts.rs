//! Posts API handlers.
//!
//! ```text
//! POST /api/v1/posts {"content":"hello","genre":"Music"}
//! GET /api/v1/posts?isPromotion=false&genre=Music
//! GET /api/v1/posts/my-posts
//! POST /api/v1/posts/{id}/like
//! POST /api/v1/posts/{id}/comment {"text":"nice"}
//! DELETE /api/v1/posts/{id}/comment/{commentId}
//! POST /api/v1/posts/{id}/view
//! DELETE /api/v1/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{CommentText, Post, PostDraft, PostFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::posts_dto::{
    CommentBody, CreatePostBody, FeedParams, LikeResponse, PostDto, ViewResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_post_validation_error, parse_comment_id, parse_genre, parse_post_id,
};

fn to_dtos(posts: Vec<Post>) -> Vec<PostDto> {
    posts.into_iter().map(Into::into).collect()
}

/// Publish a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let CreatePostBody {
        content,
        image_url,
        is_promotion,
        genre,
    } = payload.into_inner();
    let genre = genre.as_deref().map(parse_genre).transpose()?.unwrap_or_default();
    let draft = PostDraft::new(content.as_deref(), image_url.as_deref(), is_promotion, genre)
        .map_err(map_post_validation_error)?;
    let post = state.posts.create_post(&author, draft).await?;
    Ok(HttpResponse::Created().json(PostDto::from(post)))
}

/// Every post, newest first, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(FeedParams),
    responses(
        (status = 200, description = "Posts, newest first", body = [PostDto]),
        (status = 400, description = "Unknown genre", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_feed(
    state: web::Data<HttpState>,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<Vec<PostDto>>> {
    let FeedParams {
        is_promotion,
        genre,
    } = params.into_inner();
    let filter = PostFilter {
        author: None,
        is_promotion,
        genre: genre.as_deref().map(parse_genre).transpose()?,
    };
    let posts = state.posts_query.list_posts(&filter).await?;
    Ok(web::Json(to_dtos(posts)))
}

/// The signed-in user's posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/my-posts",
    responses(
        (status = 200, description = "Own posts, newest first", body = [PostDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listMyPosts"
)]
#[get("/posts/my-posts")]
pub async fn my_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PostDto>>> {
    let author = session.require_user_id()?;
    let posts = state
        .posts_query
        .list_posts(&PostFilter::by_author(author))
        .await?;
    Ok(web::Json(to_dtos(posts)))
}

/// Like the post, or take the like back.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Like state after the toggle", body = LikeResponse),
        (status = 400, description = "Invalid post id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "toggleLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    let user = session.require_user_id()?;
    let post_id = parse_post_id(&path)?;
    let outcome = state.posts.toggle_like(&post_id, &user).await?;
    Ok(web::Json(outcome.into()))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comment",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = CommentBody,
    responses(
        (status = 201, description = "Post with the new comment", body = PostDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentBody>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let post_id = parse_post_id(&path)?;
    let text = CommentText::new(&payload.text).map_err(map_post_validation_error)?;
    let post = state.posts.add_comment(&post_id, &user, text).await?;
    Ok(HttpResponse::Created().json(PostDto::from(post)))
}

/// Remove one of your own comments.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/comment/{commentId}",
    params(
        ("id" = String, Path, description = "Post identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Post without the comment", body = PostDto),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Comment belongs to someone else", body = ErrorSchema),
        (status = 404, description = "Unknown post or comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deleteComment"
)]
#[delete("/posts/{id}/comment/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PostDto>> {
    let user = session.require_user_id()?;
    let (raw_post, raw_comment) = path.into_inner();
    let post_id = parse_post_id(&raw_post)?;
    let comment_id = parse_comment_id(&raw_comment)?;
    let post = state
        .posts
        .delete_comment(&post_id, &comment_id, &user)
        .await?;
    Ok(web::Json(post.into()))
}

/// Count a view; repeat views by the same user are not counted.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/view",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "View total", body = ViewResponse),
        (status = 400, description = "Invalid post id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "recordView"
)]
#[post("/posts/{id}/view")]
pub async fn record_view(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ViewResponse>> {
    let viewer = session.require_user_id()?;
    let post_id = parse_post_id(&path)?;
    let outcome = state.posts.record_view(&post_id, &viewer).await?;
    Ok(web::Json(outcome.into()))
}

/// Delete one of your own posts.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 400, description = "Invalid post id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Post belongs to someone else", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let post_id = parse_post_id(&path)?;
    state.posts.delete_post(&post_id, &user).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
