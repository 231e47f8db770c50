//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FollowPersistenceError, FollowRepository};
use crate::domain::{Follow, FollowCounts, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::FollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel-backed implementation of the [`FollowRepository`] port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowPersistenceError {
    map_basic_pool_error(error, FollowPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowPersistenceError {
    map_basic_diesel_error(
        error,
        FollowPersistenceError::query,
        FollowPersistenceError::connection,
    )
}

impl From<FollowRow> for Follow {
    fn from(row: FollowRow) -> Self {
        Self {
            follower: UserId::from_uuid(row.follower_id),
            followee: UserId::from_uuid(row.followee_id),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::follower_id.eq(follower.as_uuid()))
                .filter(follows::followee_id.eq(followee.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = FollowRow {
            follower_id: *follow.follower.as_uuid(),
            followee_id: *follow.followee.as_uuid(),
            created_at: follow.created_at,
        };

        let inserted = diesel::insert_into(follows::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(follower.as_uuid()))
                .filter(follows::followee_id.eq(followee.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FollowRow> = follows::table
            .filter(follows::followee_id.eq(user.as_uuid()))
            .order((follows::created_at.asc(), follows::follower_id.asc()))
            .select(FollowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Follow::from).collect())
    }

    async fn followed_by(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FollowRow> = follows::table
            .filter(follows::follower_id.eq(user.as_uuid()))
            .order((follows::created_at.asc(), follows::followee_id.asc()))
            .select(FollowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Follow::from).collect())
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let followers: i64 = follows::table
            .filter(follows::followee_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let following: i64 = follows::table
            .filter(follows::follower_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(FollowCounts {
            followers: u64::try_from(followers).unwrap_or_default(),
            following: u64::try_from(following).unwrap_or_default(),
        })
    }
}
