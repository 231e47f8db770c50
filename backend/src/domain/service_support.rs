//! Translate driven-port failures into domain errors.
//!
//! Connection failures surface as `service_unavailable` and
//! query failures are internal. Only the user repository reports conflicts.

use crate::domain::ports::{
    FollowPersistenceError, MessagePersistenceError, PasswordHashError, PostPersistenceError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Error, User, UserId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => Error::conflict(message),
    }
}

pub(crate) fn map_message_error(error: MessagePersistenceError) -> Error {
    match error {
        MessagePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("message repository unavailable: {message}"))
        }
        MessagePersistenceError::Query { message } => {
            Error::internal(format!("message repository error: {message}"))
        }
    }
}

pub(crate) fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

pub(crate) fn map_follow_error(error: FollowPersistenceError) -> Error {
    match error {
        FollowPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowPersistenceError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Look up a user that must exist, mapping absence to `not_found`.
pub(crate) async fn require_user<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::not_found(format!("user {id} not found")))
}
