//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the ports through which adapters plug in, and the services that
//! implement the driving ports. Types validate on construction and document
//! their invariants in Rustdoc.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: API error payload and stable identifiers.
//! - [`User`], [`Message`], [`Post`] and [`Follow`]: core entities.
//! - [`summarize_conversations`]: the per-counterpart conversation fold.
//! - [`AccountService`], [`SocialService`], [`PostsService`] and
//!   [`MessagingService`]: driving-port implementations.

pub mod account_service;
pub mod auth;
pub mod conversation;
pub mod error;
pub mod message;
pub mod messaging_service;
pub mod ports;
pub mod post;
pub mod posts_service;
mod service_support;
pub mod social;
pub mod social_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, PasswordHash,
    SignupRequest, SignupValidationError, UserAccount,
};
pub use self::conversation::{
    ConversationDigest, ConversationSummary, attach_contacts, summarize_conversations,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::message::{
    MESSAGE_BODY_MAX, Message, MessageBody, MessageId, MessageValidationError,
    sort_chronologically,
};
pub use self::messaging_service::MessagingService;
pub use self::post::{
    AuthorStats, COMMENT_TEXT_MAX, Comment, CommentId, CommentText, Genre, IMAGE_URL_MAX, Like,
    POST_CONTENT_MAX, Post, PostDraft, PostFilter, PostId, PostValidationError, PostView,
};
pub use self::posts_service::PostsService;
pub use self::social::{Follow, FollowCounts, FollowEntry, FollowOutcome, UserProfile};
pub use self::social_service::SocialService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, EmailAddress, USERNAME_MAX, USERNAME_MIN, User, UserId, UserSummary,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use circle::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
