//! Users API handlers: search, profiles and the follow graph.
//!
//! ```text
//! GET /api/v1/users/search?q=ad
//! GET /api/v1/users/{userId}/profile
//! POST /api/v1/users/{userId}/follow
//! GET /api/v1/users/{userId}/followers
//! GET /api/v1/users/{userId}/following
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FollowEntry, FollowOutcome, UserProfile, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Public projection of a user; never carries the email address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            username: summary.username.to_string(),
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub user: UserSummaryDto,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub total_likes: u64,
    pub total_views: u64,
}

impl From<UserProfile> for UserProfileDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: profile.user.into(),
            follower_count: profile.follower_count,
            following_count: profile.following_count,
            post_count: profile.post_count,
            total_likes: profile.total_likes,
            total_views: profile.total_views,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowEntryDto {
    pub user: UserSummaryDto,
    pub followed_at: DateTime<Utc>,
}

impl From<FollowEntry> for FollowEntryDto {
    fn from(entry: FollowEntry) -> Self {
        Self {
            user: entry.user.into(),
            followed_at: entry.followed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub is_following: bool,
    pub follower_count: u64,
}

impl From<FollowOutcome> for FollowResponse {
    fn from(outcome: FollowOutcome) -> Self {
        Self {
            is_following: outcome.is_following,
            follower_count: outcome.follower_count,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Case-insensitive fragment of a username or email.
    #[serde(default)]
    pub q: String,
}

/// Find other users by username or email fragment.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users, at most ten", body = [UserSummaryDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<UserSummaryDto>>> {
    let requester = session.require_user_id()?;
    let found = state.users.search(&requester, &params.q).await?;
    Ok(web::Json(found.into_iter().map(Into::into).collect()))
}

/// Public profile with follow and engagement counts.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/profile",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = UserProfileDto),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile",
    security([])
)]
#[get("/users/{user_id}/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfileDto>> {
    let user_id = parse_user_id(&path, USER_ID_FIELD)?;
    let profile = state.users.profile(&user_id).await?;
    Ok(web::Json(profile.into()))
}

/// Follow the user, or unfollow when already following.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/follow",
    params(("userId" = String, Path, description = "User to follow or unfollow")),
    responses(
        (status = 200, description = "Follow state after the toggle", body = FollowResponse),
        (status = 400, description = "Invalid user id or self-follow", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "toggleFollow"
)]
#[post("/users/{user_id}/follow")]
pub async fn toggle_follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let follower = session.require_user_id()?;
    let target = parse_user_id(&path, USER_ID_FIELD)?;
    let outcome = state.follows.toggle_follow(&follower, &target).await?;
    Ok(web::Json(outcome.into()))
}

/// Users following the given user, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/followers",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Followers", body = [FollowEntryDto]),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listFollowers",
    security([])
)]
#[get("/users/{user_id}/followers")]
pub async fn list_followers(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<FollowEntryDto>>> {
    let user_id = parse_user_id(&path, USER_ID_FIELD)?;
    let entries = state.users.followers(&user_id).await?;
    Ok(web::Json(entries.into_iter().map(Into::into).collect()))
}

/// Users the given user follows, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/following",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Followed users", body = [FollowEntryDto]),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listFollowing",
    security([])
)]
#[get("/users/{user_id}/following")]
pub async fn list_following(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<FollowEntryDto>>> {
    let user_id = parse_user_id(&path, USER_ID_FIELD)?;
    let entries = state.users.following(&user_id).await?;
    Ok(web::Json(entries.into_iter().map(Into::into).collect()))
}
