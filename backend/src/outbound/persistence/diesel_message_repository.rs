//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MessagePersistenceError, MessageRepository};
use crate::domain::{Message, MessageBody, MessageId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::messages;

/// Diesel-backed implementation of the [`MessageRepository`] port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MessagePersistenceError {
    map_basic_pool_error(error, MessagePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MessagePersistenceError {
    map_basic_diesel_error(
        error,
        MessagePersistenceError::query,
        MessagePersistenceError::connection,
    )
}

fn row_to_message(row: MessageRow) -> Result<Message, MessagePersistenceError> {
    let body = MessageBody::new(&row.body)
        .map_err(|err| MessagePersistenceError::query(format!("stored message {}: {err}", row.id)))?;
    Ok(Message {
        id: MessageId::from_uuid(row.id),
        sender: UserId::from_uuid(row.sender_id),
        receiver: UserId::from_uuid(row.receiver_id),
        body,
        is_read: row.is_read,
        read_at: row.read_at,
        created_at: row.created_at,
    })
}

fn rows_to_messages(rows: Vec<MessageRow>) -> Result<Vec<Message>, MessagePersistenceError> {
    rows.into_iter().map(row_to_message).collect()
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMessageRow {
            id: *message.id.as_uuid(),
            sender_id: *message.sender.as_uuid(),
            receiver_id: *message.receiver.as_uuid(),
            body: message.body.as_ref(),
            is_read: message.is_read,
            read_at: message.read_at,
            created_at: message.created_at,
        };

        diesel::insert_into(messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_involving(&self, user: &UserId) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .filter(
                messages::sender_id
                    .eq(user.as_uuid())
                    .or(messages::receiver_id.eq(user.as_uuid())),
            )
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_messages(rows)
    }

    async fn list_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .filter(
                messages::sender_id
                    .eq(a.as_uuid())
                    .and(messages::receiver_id.eq(b.as_uuid()))
                    .or(messages::sender_id
                        .eq(b.as_uuid())
                        .and(messages::receiver_id.eq(a.as_uuid()))),
            )
            .order((messages::created_at.asc(), messages::id.asc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_messages(rows)
    }

    async fn mark_read(
        &self,
        receiver: &UserId,
        sender: &UserId,
        read_at: DateTime<Utc>,
    ) -> Result<usize, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(
            messages::table
                .filter(messages::receiver_id.eq(receiver.as_uuid()))
                .filter(messages::sender_id.eq(sender.as_uuid()))
                .filter(messages::is_read.eq(false)),
        )
        .set((
            messages::is_read.eq(true),
            messages::read_at.eq(Some(read_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<usize, MessagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            messages::table.filter(
                messages::sender_id
                    .eq(a.as_uuid())
                    .and(messages::receiver_id.eq(b.as_uuid()))
                    .or(messages::sender_id
                        .eq(b.as_uuid())
                        .and(messages::receiver_id.eq(a.as_uuid()))),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
