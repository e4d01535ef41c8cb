//! PostgreSQL-backed account repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{PasswordDigest, User, UserId, Username};

use super::error_mapping::{FailureClass, classify, user_diesel_error, user_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn stored(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let (user, password) = row.into_user().map_err(UserPersistenceError::query)?;
    Ok(StoredUser { user, password })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(user_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email(),
            password_salt: password.salt(),
            password_hash: password.hash(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match classify(&err) {
                FailureClass::UniqueViolation => {
                    UserPersistenceError::duplicate_username(user.username().as_ref())
                }
                _ => user_diesel_error(err),
            })
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(user_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(user_diesel_error)?
            .map(stored)
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(user_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(user_diesel_error)?;
        Ok(row.map(stored).transpose()?.map(|stored| stored.user))
    }

    async fn delete_by_username(
        &self,
        username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(user_pool_error)?;
        let removed = diesel::delete(users::table.filter(users::username.eq(username.as_ref())))
            .execute(&mut conn)
            .await
            .map_err(user_diesel_error)?;
        Ok(removed > 0)
    }
}
