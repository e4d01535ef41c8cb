//! In-memory account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{PasswordDigest, User, UserId, Username};

/// Account store keyed by username.
///
/// Usernames are unique; the uniqueness check and the insert happen under
/// one write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        let key = user.username().as_ref();
        if users.contains_key(key) {
            return Err(UserPersistenceError::duplicate_username(key));
        }
        users.insert(
            key.to_owned(),
            StoredUser {
                user: user.clone(),
                password: password.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self.users.read().await.get(username.as_ref()).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|stored| stored.user.id() == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn delete_by_username(
        &self,
        username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        Ok(self.users.write().await.remove(username.as_ref()).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn user(name: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            None,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repo = InMemoryUserRepository::new();
        let digest = PasswordDigest::create("pw");
        repo.create(&user("ada"), &digest).await.expect("first insert");

        let err = repo
            .create(&user("ada"), &digest)
            .await
            .expect_err("duplicate");

        assert!(matches!(
            err,
            UserPersistenceError::DuplicateUsername { ref username } if username == "ada"
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_and_deletes_by_username() {
        let repo = InMemoryUserRepository::new();
        let ada = user("ada");
        repo.create(&ada, &PasswordDigest::create("pw"))
            .await
            .expect("insert");

        let stored = repo
            .find_by_username(ada.username())
            .await
            .expect("lookup")
            .expect("present");
        assert!(stored.password.verify("pw"));
        assert_eq!(
            repo.find_by_id(&ada.id()).await.expect("lookup"),
            Some(ada.clone())
        );

        assert!(repo.delete_by_username(ada.username()).await.expect("delete"));
        assert!(!repo.delete_by_username(ada.username()).await.expect("delete"));
    }
}
