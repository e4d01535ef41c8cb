//! Port for bearer token persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenDigest, TokenRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub store enum TokenStoreError = "token store";
}

/// Port for issuing and resolving bearer tokens by digest.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a freshly issued token.
    async fn issue(&self, record: &TokenRecord) -> Result<(), TokenStoreError>;

    /// Look up a token by the digest of its secret.
    async fn find(&self, digest: &TokenDigest) -> Result<Option<TokenRecord>, TokenStoreError>;

    /// Delete every record no longer live at `now`, returning how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, TokenStoreError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenStore;

#[async_trait]
impl TokenStore for FixtureTokenStore {
    async fn issue(&self, _record: &TokenRecord) -> Result<(), TokenStoreError> {
        Ok(())
    }

    async fn find(&self, _digest: &TokenDigest) -> Result<Option<TokenRecord>, TokenStoreError> {
        Ok(None)
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, TokenStoreError> {
        Ok(0)
    }
}
