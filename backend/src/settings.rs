//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PANTRY_*` environment variables and an
//! optional config file. Most fields are optional; accessors apply defaults
//! and parse the raw values.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    DEFAULT_NOTIFICATION_TIMEOUT, DEFAULT_RECIPIENT, DEFAULT_SENDER, TokenLifetimes,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid setting values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// Bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// Webhook URL does not parse.
    #[error("invalid notification webhook {value:?}: {message}")]
    Webhook { value: String, message: String },
    /// A lifetime or timeout is zero.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PANTRY")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
    /// Sender address for running-low messages.
    pub notification_sender: Option<String>,
    /// Recipient address for running-low messages.
    pub notification_recipient: Option<String>,
    /// Webhook receiving running-low messages; they are logged when absent.
    pub notification_webhook: Option<String>,
    /// Upper bound on one delivery attempt, in milliseconds.
    pub notification_timeout_ms: Option<u64>,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: Option<u64>,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: Option<u64>,
}

fn positive_secs(
    value: Option<u64>,
    field: &'static str,
    default: TimeDelta,
) -> Result<TimeDelta, SettingsError> {
    match value {
        None => Ok(default),
        Some(0) => Err(SettingsError::Zero { field }),
        Some(secs) => Ok(i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)),
    }
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Sender address.
    pub fn notification_sender(&self) -> &str {
        self.notification_sender.as_deref().unwrap_or(DEFAULT_SENDER)
    }

    /// Recipient address.
    pub fn notification_recipient(&self) -> &str {
        self.notification_recipient
            .as_deref()
            .unwrap_or(DEFAULT_RECIPIENT)
    }

    /// Parsed webhook URL, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Webhook`] when the URL does not parse.
    pub fn notification_webhook(&self) -> Result<Option<Url>, SettingsError> {
        let Some(raw) = self
            .notification_webhook
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Ok(None);
        };
        Url::parse(raw)
            .map(Some)
            .map_err(|err| SettingsError::Webhook {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Delivery timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Zero`] for a zero timeout.
    pub fn notification_timeout(&self) -> Result<Duration, SettingsError> {
        match self.notification_timeout_ms {
            None => Ok(DEFAULT_NOTIFICATION_TIMEOUT),
            Some(0) => Err(SettingsError::Zero {
                field: "notification_timeout_ms",
            }),
            Some(ms) => Ok(Duration::from_millis(ms)),
        }
    }

    /// Token lifetimes, defaulting to five minutes and one day.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Zero`] for a zero lifetime.
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, SettingsError> {
        let defaults = TokenLifetimes::default();
        Ok(TokenLifetimes {
            access: positive_secs(
                self.access_token_ttl_secs,
                "access_token_ttl_secs",
                defaults.access,
            )?,
            refresh: positive_secs(
                self.refresh_token_ttl_secs,
                "refresh_token_ttl_secs",
                defaults.refresh,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "PANTRY_BIND_ADDR",
        "PANTRY_DATABASE_URL",
        "PANTRY_DB_MAX_CONNECTIONS",
        "PANTRY_NOTIFICATION_SENDER",
        "PANTRY_NOTIFICATION_RECIPIENT",
        "PANTRY_NOTIFICATION_WEBHOOK",
        "PANTRY_NOTIFICATION_TIMEOUT_MS",
        "PANTRY_ACCESS_TOKEN_TTL_SECS",
        "PANTRY_REFRESH_TOKEN_TTL_SECS",
    ];

    fn blank() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            notification_sender: None,
            notification_recipient: None,
            notification_webhook: None,
            notification_timeout_ms: None,
            access_token_ttl_secs: None,
            refresh_token_ttl_secs: None,
        }
    }

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("pantry-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(settings.notification_sender(), "no-reply@yourapp.com");
        assert_eq!(settings.notification_recipient(), "user@example.com");
        assert_eq!(settings.notification_webhook(), Ok(None));
        assert_eq!(settings.notification_timeout(), Ok(Duration::from_secs(5)));
        assert_eq!(settings.token_lifetimes(), Ok(TokenLifetimes::default()));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("PANTRY_BIND_ADDR", "127.0.0.1:9000"),
            ("PANTRY_DATABASE_URL", "postgres://localhost/pantry"),
            ("PANTRY_NOTIFICATION_RECIPIENT", "ops@example.com"),
            ("PANTRY_NOTIFICATION_WEBHOOK", "http://hooks.local/notify"),
            ("PANTRY_NOTIFICATION_TIMEOUT_MS", "250"),
            ("PANTRY_ACCESS_TOKEN_TTL_SECS", "60"),
        ]);

        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9000)))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/pantry"));
        assert_eq!(settings.notification_recipient(), "ops@example.com");
        assert_eq!(
            settings
                .notification_webhook()
                .ok()
                .flatten()
                .map(|url| url.to_string()),
            Some("http://hooks.local/notify".to_owned())
        );
        assert_eq!(
            settings.notification_timeout(),
            Ok(Duration::from_millis(250))
        );
        assert_eq!(
            settings.token_lifetimes().map(|lifetimes| lifetimes.access),
            Ok(TimeDelta::seconds(60))
        );
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let settings = AppSettings {
            bind_addr: Some("nowhere".to_owned()),
            notification_webhook: Some("not a url".to_owned()),
            notification_timeout_ms: Some(0),
            refresh_token_ttl_secs: Some(0),
            ..blank()
        };

        assert!(matches!(settings.bind_addr(), Err(SettingsError::BindAddr { .. })));
        assert!(matches!(
            settings.notification_webhook(),
            Err(SettingsError::Webhook { .. })
        ));
        assert!(settings.notification_timeout().is_err());
        assert_eq!(
            settings.token_lifetimes(),
            Err(SettingsError::Zero {
                field: "refresh_token_ttl_secs"
            })
        );
    }

    #[rstest]
    fn zero_pool_size_is_raised_to_one() {
        let settings = AppSettings {
            db_max_connections: 0,
            ..blank()
        };
        assert_eq!(settings.db_max_connections(), 1);
    }

    #[rstest]
    fn blank_database_urls_are_ignored() {
        let settings = AppSettings {
            database_url: Some("  ".to_owned()),
            ..blank()
        };
        assert_eq!(settings.database_url(), None);
    }
}
