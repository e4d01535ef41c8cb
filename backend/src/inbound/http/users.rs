//! Account handlers: registration, login and token refresh.
//!
//! ```text
//! POST /api/users/register/      {"username":"ada","password":"pw","email":"ada@example.com"}
//! POST /api/users/login/         {"username":"ada","password":"pw"}
//! POST /api/users/token/refresh/ {"refresh":"..."}
//! ```
//!
//! These routes are public; every other `/api` route requires the access
//! token issued here.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, login_validation_error, require};

const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");
const REFRESH: FieldName = FieldName::new("refresh");

/// Registration body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
}

/// Newly created account. The password is never echoed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUser {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub username: String,
    /// Empty when no address was supplied.
    pub email: String,
}

impl From<User> for RegisteredUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().unwrap_or_default().to_owned(),
        }
    }
}

/// Login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Refresh body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Fresh access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUser),
        (status = 400, description = "Invalid request or username taken", body = ErrorSchema),
        (status = 503, description = "Account store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        password,
        email,
    } = payload.into_inner();
    let username = require(username, USERNAME)?;
    let password = require(password, PASSWORD)?;
    let registration = Registration::try_from_parts(&username, &password, email.as_deref())
        .map_err(login_validation_error)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUser::from(user)))
}

/// Exchange credentials for an access/refresh pair.
#[utoipa::path(
    post,
    path = "/api/users/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPairResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenPairResponse>> {
    let LoginRequest { username, password } = payload.into_inner();
    let username = require(username, USERNAME)?;
    let password = require(password, PASSWORD)?;
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(login_validation_error)?;
    let pair = state.accounts.login(credentials).await?;
    Ok(web::Json(TokenPairResponse {
        access: pair.access.to_string(),
        refresh: pair.refresh.to_string(),
    }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/users/token/refresh/",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token issued", body = AccessTokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/users/token/refresh/")]
pub async fn refresh(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AccessTokenResponse>> {
    let token = require(payload.into_inner().refresh, REFRESH)?;
    let access = state.accounts.refresh(&token).await?;
    Ok(web::Json(AccessTokenResponse {
        access: access.to_string(),
    }))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
