//! Direct-message API handlers.
//!
//! ```text
//! POST /api/v1/messages {"receiverId":"<uuid>","content":"hi"}
//! GET /api/v1/messages/conversations
//! GET /api/v1/messages/{userId}
//! PATCH /api/v1/messages/read/{userId}
//! DELETE /api/v1/messages/conversation/{userId}
//! ```
//!
//! `/messages/conversations` must be registered before `/messages/{userId}`
//! so the literal segment wins.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::SendMessageRequest;
use crate::domain::{ConversationSummary, Message, MessageBody};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserSummaryDto;
use crate::inbound::http::validation::{
    FieldName, map_message_validation_error, missing_field_error, parse_user_id,
};

const RECEIVER_ID_FIELD: FieldName = FieldName::new("receiverId");
const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Body of `POST /api/v1/messages`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    #[serde(default)]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub receiver_id: Option<String>,
    #[serde(default)]
    #[schema(example = "hi")]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender.to_string(),
            receiver_id: message.receiver.to_string(),
            content: message.body.as_ref().to_owned(),
            is_read: message.is_read,
            read_at: message.read_at,
            created_at: message.created_at,
        }
    }
}

/// One entry of the conversation list.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryDto {
    pub contact: UserSummaryDto,
    pub last_message: MessageDto,
    /// Messages from `contact` the requester has not read yet.
    pub unread_count: usize,
}

impl From<ConversationSummary> for ConversationSummaryDto {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            contact: summary.contact.into(),
            last_message: summary.last_message.into(),
            unread_count: summary.unread_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    /// Messages flipped to read by this call; zero on repeats.
    pub updated: usize,
}

/// Send a direct message.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageBody,
    responses(
        (status = 201, description = "Message stored", body = MessageDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown receiver", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageBody>,
) -> ApiResult<HttpResponse> {
    let sender = session.require_user_id()?;
    let SendMessageBody {
        receiver_id,
        content,
    } = payload.into_inner();
    let raw_receiver = receiver_id.ok_or_else(|| missing_field_error(RECEIVER_ID_FIELD))?;
    let receiver = parse_user_id(&raw_receiver, RECEIVER_ID_FIELD)?;
    let body = MessageBody::new(&content).map_err(map_message_validation_error)?;
    let message = state
        .messaging
        .send_message(SendMessageRequest {
            sender,
            receiver,
            body,
        })
        .await?;
    Ok(HttpResponse::Created().json(MessageDto::from(message)))
}

/// One summary per counterpart, most recently active first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/conversations",
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummaryDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "listConversations"
)]
#[get("/messages/conversations")]
pub async fn list_conversations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ConversationSummaryDto>>> {
    let requester = session.require_user_id()?;
    let summaries = state.messaging_query.list_conversations(&requester).await?;
    Ok(web::Json(summaries.into_iter().map(Into::into).collect()))
}

/// Messages exchanged with one user, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{userId}",
    params(("userId" = String, Path, description = "Counterpart identifier")),
    responses(
        (status = 200, description = "Messages, oldest first", body = [MessageDto]),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages/{user_id}")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MessageDto>>> {
    let requester = session.require_user_id()?;
    let counterpart = parse_user_id(&path, USER_ID_FIELD)?;
    let messages = state
        .messaging_query
        .list_messages(&requester, &counterpart)
        .await?;
    Ok(web::Json(messages.into_iter().map(Into::into).collect()))
}

/// Mark everything the counterpart sent you as read.
#[utoipa::path(
    patch,
    path = "/api/v1/messages/read/{userId}",
    params(("userId" = String, Path, description = "Counterpart identifier")),
    responses(
        (status = 200, description = "Number of messages updated", body = MarkReadResponse),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "markRead"
)]
#[patch("/messages/read/{user_id}")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MarkReadResponse>> {
    let reader = session.require_user_id()?;
    let counterpart = parse_user_id(&path, USER_ID_FIELD)?;
    let updated = state.messaging.mark_read(&reader, &counterpart).await?;
    Ok(web::Json(MarkReadResponse { updated }))
}

/// Delete the whole conversation, both directions.
#[utoipa::path(
    delete,
    path = "/api/v1/messages/conversation/{userId}",
    params(("userId" = String, Path, description = "Counterpart identifier")),
    responses(
        (status = 204, description = "Conversation deleted"),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "deleteConversation"
)]
#[delete("/messages/conversation/{user_id}")]
pub async fn delete_conversation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let counterpart = parse_user_id(&path, USER_ID_FIELD)?;
    state
        .messaging
        .delete_conversation(&requester, &counterpart)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
