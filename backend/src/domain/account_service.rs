//! Account service: registration, login and opaque bearer tokens.
//!
//! Tokens are random secrets handed to the client once. Only their SHA-256
//! digests are stored, each with a kind and an expiry read from the injected
//! [`Clock`], so expiry can be exercised deterministically in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccessTokenVerifier, AccountCommand, TokenStore, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordDigest, Registration, TokenDigest, TokenKind, TokenPair,
    TokenRecord, User, UserId, generate_token_secret,
};

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";
const INVALID_TOKEN: &str = "Token is invalid or expired";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::invalid_request("A user with that username already exists.")
                .with_details(json!({ "field": "username", "value": username }))
        }
    }
}

/// Lifetimes applied to newly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    /// Access token lifetime.
    pub access: TimeDelta,
    /// Refresh token lifetime.
    pub refresh: TimeDelta,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: TimeDelta::minutes(5),
            refresh: TimeDelta::days(1),
        }
    }
}

/// Service implementing [`AccountCommand`] and [`AccessTokenVerifier`].
pub struct AccountService<U: ?Sized, T: ?Sized> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    lifetimes: TokenLifetimes,
}

impl<U: ?Sized, T: ?Sized> Clone for AccountService<U, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            tokens: Arc::clone(&self.tokens),
            clock: Arc::clone(&self.clock),
            lifetimes: self.lifetimes,
        }
    }
}

impl<U, T> AccountService<U, T>
where
    U: UserRepository + ?Sized,
    T: TokenStore + ?Sized,
{
    /// Create the service.
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            users,
            tokens,
            clock,
            lifetimes,
        }
    }

    async fn issue(&self, user_id: UserId, kind: TokenKind) -> Result<Zeroizing<String>, Error> {
        let secret = generate_token_secret();
        let lifetime = match kind {
            TokenKind::Access => self.lifetimes.access,
            TokenKind::Refresh => self.lifetimes.refresh,
        };
        let now = self.clock.utc();
        match self.tokens.purge_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "expired tokens removed"),
            Err(err) => warn!(error = %err, "expired token purge failed"),
        }
        let record = TokenRecord {
            digest: TokenDigest::of_secret(&secret),
            user_id,
            kind,
            expires_at: now + lifetime,
        };
        self.tokens.issue(&record).await.map_err(Error::from)?;
        Ok(secret)
    }

    async fn resolve(&self, secret: &str, kind: TokenKind) -> Result<UserId, Error> {
        if secret.is_empty() {
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        let record = self
            .tokens
            .find(&TokenDigest::of_secret(secret))
            .await
            .map_err(Error::from)?
            .filter(|record| record.kind == kind && record.is_live_at(self.clock.utc()))
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
        Ok(record.user_id)
    }
}

#[async_trait]
impl<U, T> AccountCommand for AccountService<U, T>
where
    U: UserRepository + ?Sized,
    T: TokenStore + ?Sized,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let credentials = registration.credentials();
        let digest = PasswordDigest::create(credentials.password());
        let user = User::new(
            UserId::random(),
            credentials.username().clone(),
            registration.email().map(str::to_owned),
        );
        self.users
            .create(&user, &digest)
            .await
            .map_err(map_user_error)?;
        info!(user = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<TokenPair, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .filter(|stored| stored.password.verify(credentials.password()))
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let user_id = stored.user.id();
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access).await?,
            refresh: self.issue(user_id, TokenKind::Refresh).await?,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Zeroizing<String>, Error> {
        let user_id = self.resolve(refresh_token, TokenKind::Refresh).await?;
        self.issue(user_id, TokenKind::Access).await
    }
}

#[async_trait]
impl<U, T> AccessTokenVerifier for AccountService<U, T>
where
    U: UserRepository + ?Sized,
    T: TokenStore + ?Sized,
{
    async fn verify_access(&self, token: &str) -> Result<UserId, Error> {
        self.resolve(token, TokenKind::Access).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
