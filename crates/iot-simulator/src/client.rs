//! Pantry API client used by the simulator.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::Credentials;
use crate::error::ClientError;

const USER_AGENT: &str = "pantry-iot-simulator/0.1";
const LOGIN_PATH: &str = "api/users/login/";
const DISPENSERS_PATH: &str = "api/dispensers/";

/// Bearer access token. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// The fields of a dispenser the simulator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DispenserReading {
    /// Dispenser identifier.
    pub id: i64,
    /// Last known fill level.
    pub current_level: i64,
}

/// Operations the simulator needs from the pantry API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispenserApi: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ClientError>;

    /// List every dispenser.
    async fn list_dispensers(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<DispenserReading>, ClientError>;

    /// Set a dispenser's absolute level.
    async fn update_level(
        &self,
        token: &AccessToken,
        dispenser: i64,
        level: i64,
    ) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    access: String,
}

#[derive(Serialize)]
struct LevelBody {
    current_level: i64,
}

/// [`DispenserApi`] over HTTP with reqwest.
pub struct HttpDispenserApi {
    client: Client,
    base: Url,
}

impl HttpDispenserApi {
    /// Build a client rooted at `base` whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the reqwest client cannot be
    /// constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(|err| ClientError::Endpoint {
            path: path.to_owned(),
            message: err.to_string(),
        })
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DispenserApi for HttpDispenserApi {
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ClientError> {
        let response = self
            .client
            .post(self.endpoint(LOGIN_PATH)?)
            .json(&LoginBody {
                username: credentials.username(),
                password: credentials.password(),
            })
            .send()
            .await?;
        let reply: LoginReply = check(response).await?.json().await?;
        Ok(AccessToken::new(reply.access))
    }

    async fn list_dispensers(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<DispenserReading>, ClientError> {
        let response = self
            .client
            .get(self.endpoint(DISPENSERS_PATH)?)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_level(
        &self,
        token: &AccessToken,
        dispenser: i64,
        level: i64,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("{DISPENSERS_PATH}{dispenser}/update-level/"))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&LevelBody {
                current_level: level,
            })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/api/dispensers/")]
    #[case("http://host/pantry", "http://host/pantry/api/dispensers/")]
    #[case("http://host/pantry/", "http://host/pantry/api/dispensers/")]
    fn endpoints_keep_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let api = HttpDispenserApi::new(
            Url::parse(base).expect("valid url"),
            Duration::from_secs(1),
        )
        .expect("client builds");

        let url = api.endpoint(DISPENSERS_PATH).expect("joins");

        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn token_debug_is_redacted() {
        assert_eq!(
            format!("{:?}", AccessToken::new("secret")),
            "AccessToken(<redacted>)"
        );
    }
}
