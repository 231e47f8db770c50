//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the DTO
//! schemas and the domain error wrappers from
//! [`crate::inbound::http::schemas`]. Swagger UI serves it in debug builds.

use crate::inbound::http::accounts::{AccountResponse, LoginBody, SignupBody};
use crate::inbound::http::messages::{
    ConversationSummaryDto, MarkReadResponse, MessageDto, SendMessageBody,
};
use crate::inbound::http::posts_dto::{
    CommentBody, CommentDto, CreatePostBody, LikeDto, LikeResponse, PostDto, ViewResponse,
    ViewerDto,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    FollowEntryDto, FollowResponse, UserProfileDto, UserSummaryDto,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/signup or /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Circle API",
        description = "Accounts, follows, posts and direct messages over a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::me,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::toggle_follow,
        crate::inbound::http::users::list_followers,
        crate::inbound::http::users::list_following,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::list_feed,
        crate::inbound::http::posts::my_posts,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::delete_comment,
        crate::inbound::http::posts::record_view,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_conversations,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::mark_read,
        crate::inbound::http::messages::delete_conversation,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SignupBody,
        LoginBody,
        AccountResponse,
        UserSummaryDto,
        UserProfileDto,
        FollowEntryDto,
        FollowResponse,
        CreatePostBody,
        CommentBody,
        PostDto,
        LikeDto,
        CommentDto,
        ViewerDto,
        LikeResponse,
        ViewResponse,
        SendMessageBody,
        MessageDto,
        ConversationSummaryDto,
        MarkReadResponse,
    )),
    tags(
        (name = "auth", description = "Sign-up, login and session management"),
        (name = "users", description = "Search, profiles and the follow graph"),
        (name = "posts", description = "Feed, likes, comments and views"),
        (name = "messages", description = "Direct messages and conversation summaries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
