//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PasswordDigest, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username '{username}' is already taken",
    }
}

/// User row together with its password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Account identity.
    pub user: User,
    /// Salted password digest.
    pub password: PasswordDigest,
}

/// Port for account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateUsername` when taken.
    async fn create(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch an account and its digest by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Remove an account; `false` when absent.
    async fn delete_by_username(&self, username: &Username)
    -> Result<bool, UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise account storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(
        &self,
        _user: &User,
        _password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn delete_by_username(
        &self,
        _username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }
}
