//! Bearer token authentication for protected handlers.
//!
//! Handlers that take an [`AuthenticatedUser`] argument reject requests
//! without a valid `Authorization: Bearer <access>` header before any of
//! their own logic runs.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
const MALFORMED_HEADER: &str = "Authorization header must use the Bearer scheme";

/// Identity of the caller, resolved from a bearer access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// Caller's user id.
    pub fn id(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(MISSING_CREDENTIALS))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(MALFORMED_HEADER))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized(MALFORMED_HEADER))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::unauthorized(MALFORMED_HEADER));
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.tokens.verify_access(&token).await.inspect_err(|err| {
                debug!(code = ?err.code(), "bearer token rejected");
            })?;
            Ok(Self(user))
        })
    }
}
