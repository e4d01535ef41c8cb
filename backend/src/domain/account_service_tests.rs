//! Tests for the account service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockUserRepository, StoredUser, TokenStoreError};
use crate::domain::{ErrorCode, Username};

struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    fn advance(&self, delta: TimeDelta) {
        *self.lock() += delta;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

#[derive(Default)]
struct RecordingTokenStore(Mutex<HashMap<TokenDigest, TokenRecord>>);

#[async_trait]
impl TokenStore for RecordingTokenStore {
    async fn issue(&self, record: &TokenRecord) -> Result<(), TokenStoreError> {
        self.0
            .lock()
            .map_err(|_| TokenStoreError::query("poisoned"))?
            .insert(record.digest.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, digest: &TokenDigest) -> Result<Option<TokenRecord>, TokenStoreError> {
        Ok(self
            .0
            .lock()
            .map_err(|_| TokenStoreError::query("poisoned"))?
            .get(digest)
            .cloned())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, TokenStoreError> {
        let mut records = self
            .0
            .lock()
            .map_err(|_| TokenStoreError::query("poisoned"))?;
        let before = records.len();
        records.retain(|_, record| record.is_live_at(now));
        Ok(before - records.len())
    }
}

impl RecordingTokenStore {
    fn len(&self) -> usize {
        self.0.lock().map(|records| records.len()).unwrap_or_default()
    }
}

fn stored_sample_user() -> StoredUser {
    StoredUser {
        user: User::new(
            UserId::random(),
            Username::new("sampleuser").expect("valid username"),
            Some("sampleuser@example.com".to_owned()),
        ),
        password: PasswordDigest::create("password123"),
    }
}

struct Harness {
    service: AccountService<MockUserRepository, RecordingTokenStore>,
    clock: Arc<MutableClock>,
    tokens: Arc<RecordingTokenStore>,
}

#[fixture]
fn harness() -> Harness {
    let stored = stored_sample_user();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(move |username| {
            Ok((username.as_ref() == "sampleuser").then(|| stored.clone()))
        });
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    ));
    let tokens = Arc::new(RecordingTokenStore::default());
    let service = AccountService::new(
        Arc::new(users),
        Arc::clone(&tokens),
        clock.clone(),
        TokenLifetimes::default(),
    );
    Harness {
        service,
        clock,
        tokens,
    }
}

fn credentials(username: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(username, password).expect("credential shape")
}

#[rstest]
#[tokio::test]
async fn login_issues_distinct_usable_tokens(harness: Harness) {
    let pair = harness
        .service
        .login(credentials("sampleuser", "password123"))
        .await
        .expect("login succeeds");

    assert_ne!(pair.access, pair.refresh);
    harness
        .service
        .verify_access(&pair.access)
        .await
        .expect("access token verifies");
}

#[rstest]
#[case("sampleuser", "wrong")]
#[case("nobody", "password123")]
#[tokio::test]
async fn login_rejects_bad_credentials(
    harness: Harness,
    #[case] username: &str,
    #[case] password: &str,
) {
    let err = harness
        .service
        .login(credentials(username, password))
        .await
        .expect_err("bad credentials");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn refresh_tokens_are_not_access_tokens(harness: Harness) {
    let pair = harness
        .service
        .login(credentials("sampleuser", "password123"))
        .await
        .expect("login succeeds");

    let err = harness
        .service
        .verify_access(&pair.refresh)
        .await
        .expect_err("refresh token rejected as access");
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let err = harness
        .service
        .refresh(&pair.access)
        .await
        .expect_err("access token rejected as refresh");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn access_tokens_expire_and_refresh_restores_access(harness: Harness) {
    let pair = harness
        .service
        .login(credentials("sampleuser", "password123"))
        .await
        .expect("login succeeds");

    harness.clock.advance(TimeDelta::minutes(5));
    harness
        .service
        .verify_access(&pair.access)
        .await
        .expect_err("access token expired");

    let access = harness
        .service
        .refresh(&pair.refresh)
        .await
        .expect("refresh succeeds");
    harness
        .service
        .verify_access(&access)
        .await
        .expect("new access token verifies");
}

#[rstest]
#[tokio::test]
async fn refresh_tokens_expire_after_a_day(harness: Harness) {
    let pair = harness
        .service
        .login(credentials("sampleuser", "password123"))
        .await
        .expect("login succeeds");

    harness.clock.advance(TimeDelta::days(1));
    let err = harness
        .service
        .refresh(&pair.refresh)
        .await
        .expect_err("refresh expired");
    assert_eq!(err.message(), INVALID_TOKEN);
}

#[rstest]
#[tokio::test]
async fn repeated_logins_do_not_accumulate_expired_tokens(harness: Harness) {
    for _ in 0..3 {
        harness
            .service
            .login(credentials("sampleuser", "password123"))
            .await
            .expect("login succeeds");
        harness.clock.advance(TimeDelta::hours(1));
    }
    // Three refresh tokens plus the last, now stale, access token.
    assert_eq!(harness.tokens.len(), 4);

    harness.clock.advance(TimeDelta::days(1));
    let pair = harness
        .service
        .login(credentials("sampleuser", "password123"))
        .await
        .expect("login succeeds");

    assert_eq!(harness.tokens.len(), 2);
    harness
        .service
        .verify_access(&pair.access)
        .await
        .expect("fresh token verifies");
}

#[rstest]
#[tokio::test]
async fn register_stores_a_salted_digest() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|user, digest| {
            user.username().as_ref() == "newbie" && digest.verify("s3cret") && digest.hash() != "s3cret"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let service = AccountService::new(
        Arc::new(users),
        Arc::new(RecordingTokenStore::default()),
        Arc::new(mockable::DefaultClock),
        TokenLifetimes::default(),
    );

    let registration =
        Registration::try_from_parts("newbie", "s3cret", Some("newbie@example.com"))
            .expect("valid registration");
    let user = service.register(registration).await.expect("registered");

    assert_eq!(user.email(), Some("newbie@example.com"));
}

#[rstest]
#[tokio::test]
async fn register_reports_duplicate_usernames() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .times(1)
        .returning(|user, _| {
            Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ))
        });
    let service = AccountService::new(
        Arc::new(users),
        Arc::new(RecordingTokenStore::default()),
        Arc::new(mockable::DefaultClock),
        TokenLifetimes::default(),
    );

    let registration =
        Registration::try_from_parts("sampleuser", "pw", None).expect("valid registration");
    let err = service
        .register(registration)
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
