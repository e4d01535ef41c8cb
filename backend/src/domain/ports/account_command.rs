//! Driving ports for registration, login and bearer token checks.
//!
//! Handlers validate raw strings into [`Registration`] and
//! [`LoginCredentials`] before calling these ports, and resolve the bearer
//! header through [`AccessTokenVerifier`] without touching storage directly.

use async_trait::async_trait;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Registration, TokenPair, User, UserId};

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Authenticate and issue an access/refresh pair.
    async fn login(&self, credentials: LoginCredentials) -> Result<TokenPair, Error>;

    /// Exchange a live refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<Zeroizing<String>, Error>;
}

/// Resolves bearer access tokens to users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenVerifier: Send + Sync {
    /// Return the owner of a live access token, or `unauthorized`.
    async fn verify_access(&self, token: &str) -> Result<UserId, Error>;
}

/// Bearer secret accepted by [`FixtureAccessTokenVerifier`].
pub const FIXTURE_ACCESS_TOKEN: &str = "fixture-access-token";

/// User returned for [`FIXTURE_ACCESS_TOKEN`].
pub const FIXTURE_USER_ID: Uuid = Uuid::from_u128(0x123e_4567_e89b_12d3_a456_4266_1417_4000);

/// Fixture verifier accepting only [`FIXTURE_ACCESS_TOKEN`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccessTokenVerifier;

#[async_trait]
impl AccessTokenVerifier for FixtureAccessTokenVerifier {
    async fn verify_access(&self, token: &str) -> Result<UserId, Error> {
        if token == FIXTURE_ACCESS_TOKEN {
            Ok(UserId::from_uuid(FIXTURE_USER_ID))
        } else {
            Err(Error::unauthorized("invalid or expired access token"))
        }
    }
}

/// Fixture account command that authenticates nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn register(&self, _registration: Registration) -> Result<User, Error> {
        Err(Error::service_unavailable("account store is not configured"))
    }

    async fn login(&self, _credentials: LoginCredentials) -> Result<TokenPair, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<Zeroizing<String>, Error> {
        Err(Error::unauthorized("invalid or expired refresh token"))
    }
}
