//! PostgreSQL-backed bearer token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{TokenDigest, TokenRecord};

use super::error_mapping::{token_diesel_error, token_pool_error};
use super::models::TokenRow;
use super::pool::DbPool;
use super::schema::auth_tokens;

/// Diesel implementation of [`TokenStore`].
///
/// Tokens are deleted together with their owner by the `ON DELETE CASCADE`
/// foreign key.
#[derive(Clone)]
pub struct DieselTokenStore {
    pool: DbPool,
}

impl DieselTokenStore {
    /// Create a store backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for DieselTokenStore {
    async fn issue(&self, record: &TokenRecord) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(token_pool_error)?;
        diesel::insert_into(auth_tokens::table)
            .values(TokenRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(token_diesel_error)
    }

    async fn find(&self, digest: &TokenDigest) -> Result<Option<TokenRecord>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(token_pool_error)?;
        auth_tokens::table
            .find(digest.as_str())
            .select(TokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(token_diesel_error)?
            .map(|row| row.into_record().map_err(TokenStoreError::query))
            .transpose()
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(token_pool_error)?;
        diesel::delete(auth_tokens::table.filter(auth_tokens::expires_at.le(now)))
            .execute(&mut conn)
            .await
            .map_err(token_diesel_error)
    }
}
