//! In-memory bearer token store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{TokenDigest, TokenRecord};

/// Token store keyed by secret digest.
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: RwLock<HashMap<TokenDigest, TokenRecord>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn issue(&self, record: &TokenRecord) -> Result<(), TokenStoreError> {
        self.records
            .write()
            .await
            .insert(record.digest.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, digest: &TokenDigest) -> Result<Option<TokenRecord>, TokenStoreError> {
        Ok(self.records.read().await.get(digest).cloned())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, TokenStoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.is_live_at(now));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{TokenKind, UserId};
    use chrono::{TimeDelta, Utc};
    use rstest::rstest;

    fn record(secret: &str, expires_at: DateTime<Utc>) -> TokenRecord {
        TokenRecord {
            digest: TokenDigest::of_secret(secret),
            user_id: UserId::random(),
            kind: TokenKind::Refresh,
            expires_at,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn issued_tokens_resolve_by_digest_only() {
        let store = InMemoryTokenStore::new();
        let record = TokenRecord {
            digest: TokenDigest::of_secret("secret"),
            user_id: UserId::random(),
            kind: TokenKind::Access,
            expires_at: Utc::now(),
        };
        store.issue(&record).await.expect("issue");

        assert_eq!(
            store
                .find(&TokenDigest::of_secret("secret"))
                .await
                .expect("find"),
            Some(record)
        );
        assert!(
            store
                .find(&TokenDigest::of_secret("other"))
                .await
                .expect("find")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn purge_drops_only_expired_records() {
        let store = InMemoryTokenStore::new();
        let now = Utc::now();
        store
            .issue(&record("stale", now - TimeDelta::seconds(1)))
            .await
            .expect("issue");
        store
            .issue(&record("edge", now))
            .await
            .expect("issue");
        store
            .issue(&record("fresh", now + TimeDelta::minutes(5)))
            .await
            .expect("issue");

        assert_eq!(store.purge_expired(now).await.expect("purge"), 2);
        assert!(
            store
                .find(&TokenDigest::of_secret("stale"))
                .await
                .expect("find")
                .is_none()
        );
        assert!(
            store
                .find(&TokenDigest::of_secret("fresh"))
                .await
                .expect("find")
                .is_some()
        );
    }
}
