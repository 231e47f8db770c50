//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` error whose details name the
//! offending field and a stable code, e.g.
//! `{"field": "receiverId", "code": "invalid_uuid", "value": "nope"}`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    CommentId, Error, Genre, LoginValidationError, MessageValidationError, PostId,
    PostValidationError, SignupValidationError, UserId,
};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField.as_str(),
        format!("missing required field: {field}"),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    if value.trim().is_empty() {
        return Err(missing_field_error(field));
    }
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_post_id(value: &str) -> Result<PostId, Error> {
    parse_uuid(value, FieldName::new("postId")).map(PostId::from_uuid)
}

pub(crate) fn parse_comment_id(value: &str) -> Result<CommentId, Error> {
    parse_uuid(value, FieldName::new("commentId")).map(CommentId::from_uuid)
}

pub(crate) fn parse_genre(value: &str) -> Result<Genre, Error> {
    value.parse().map_err(map_post_validation_error)
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, ErrorCode::MissingField.as_str(), err.to_string())
}

pub(crate) fn map_signup_validation_error(err: SignupValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn map_post_validation_error(err: PostValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn map_message_validation_error(err: MessageValidationError) -> Error {
    let code = match err {
        MessageValidationError::EmptyBody => ErrorCode::MissingField,
        MessageValidationError::BodyTooLong { .. } => ErrorCode::TooLong,
    };
    field_error("content", code.as_str(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    fn details(error: &Error) -> (&str, &str) {
        let details = error.details().expect("details present");
        (
            details["field"].as_str().expect("field"),
            details["code"].as_str().expect("code"),
        )
    }

    #[rstest]
    #[case("", "missing_field")]
    #[case("   ", "missing_field")]
    #[case("not-a-uuid", "invalid_uuid")]
    fn bad_user_ids_are_rejected(#[case] raw: &str, #[case] code: &str) {
        let err = parse_user_id(raw, FieldName::new("receiverId")).expect_err("invalid");

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(details(&err), ("receiverId", code));
    }

    #[rstest]
    fn valid_user_id_parses() {
        let id = parse_user_id(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            FieldName::new("userId"),
        )
        .expect("valid");
        assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn unknown_genre_reports_the_genre_field() {
        let err = parse_genre("Polka").expect_err("unknown");
        assert_eq!(details(&err), ("genre", "unknown_genre"));
        assert_eq!(err.message(), "unknown genre: Polka");
    }

    #[rstest]
    #[case(MessageValidationError::EmptyBody, "missing_field")]
    #[case(MessageValidationError::BodyTooLong { max: 10 }, "too_long")]
    fn message_errors_point_at_content(#[case] err: MessageValidationError, #[case] code: &str) {
        assert_eq!(details(&map_message_validation_error(err)), ("content", code));
    }
}
