//! Authentication primitives: credentials, password digests and bearer tokens.
//!
//! Handlers build these values from raw strings before talking to a port, so
//! blank usernames or passwords never reach a repository. Secrets are held in
//! [`Zeroizing`] buffers and only their SHA-256 digests are persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::{UserId, UserValidationError, Username, normalise_email};

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or invalid.
    Username(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Email was present but malformed.
    Email(UserValidationError),
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use pantry_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" sampleuser ", "password123").unwrap();
/// assert_eq!(creds.username().as_ref(), "sampleuser");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// The password keeps caller-provided whitespace.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username).map_err(LoginValidationError::Username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    email: Option<String>,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let credentials = LoginCredentials::try_from_parts(username, password)?;
        let email = normalise_email(email).map_err(LoginValidationError::Email)?;
        Ok(Self { credentials, email })
    }

    /// Credentials for the new account.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Optional contact address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Salted SHA-256 password digest, both parts hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: String,
    hash: String,
}

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn create(password: &str) -> Self {
        let mut salt = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let hash = salted_hash(&salt, password);
        Self { salt, hash }
    }

    /// Rebuild a digest from stored parts.
    pub fn from_parts(salt: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            hash: hash.into(),
        }
    }

    /// Hex-encoded salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Hex-encoded digest of salt and password.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Check `password` against the stored digest in constant time.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = salted_hash(&self.salt, password);
        constant_time_eq(candidate.as_bytes(), self.hash.as_bytes())
    }
}

fn salted_hash(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Bearer token flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token accepted on protected endpoints.
    Access,
    /// Longer-lived token exchanged for new access tokens.
    Refresh,
}

impl TokenKind {
    /// Persistent label for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Parse a persisted label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "access" => Some(Self::Access),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

/// SHA-256 digest of a bearer token, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Digest a presented bearer secret.
    pub fn of_secret(secret: &str) -> Self {
        Self(hex::encode(Sha256::digest(secret.as_bytes())))
    }

    /// Wrap a stored digest.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generate a random opaque bearer secret.
pub fn generate_token_secret() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
    rand::thread_rng().fill_bytes(&mut *bytes);
    Zeroizing::new(hex::encode(&*bytes))
}

/// Persisted token record; the secret itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Digest of the bearer secret.
    pub digest: TokenDigest,
    /// Owner of the token.
    pub user_id: UserId,
    /// Access or refresh.
    pub kind: TokenKind,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Whether the token is still usable at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Access and refresh secrets returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access secret.
    pub access: Zeroizing<String>,
    /// Longer-lived refresh secret.
    pub refresh: Zeroizing<String>,
}
