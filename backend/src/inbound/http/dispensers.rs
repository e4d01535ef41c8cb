//! Dispenser CRUD handlers and the level-update endpoint.
//!
//! ```text
//! POST /api/dispensers/{id}/update-level/ {"current_level": 42}
//! ```
//!
//! The level endpoint forwards the raw `current_level` value to the domain,
//! which looks the dispenser up before validating the value.

use std::collections::HashMap;

use actix_web::{Either, HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{DispenserPayload, UpdateLevelRequest};
use crate::domain::{Dispenser, DispenserId, DispenserKind, Error, PantryId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{DispenserKindSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_choice_error, require};

const UPDATED: &str = "Dispenser updated successfully";
const KIND: FieldName = FieldName::new("type");

/// Dispenser body for create and replace.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DispenserRequest {
    /// Two-letter kind code: `DR`, `SN` or `CO`.
    #[serde(rename = "type")]
    #[schema(example = "DR")]
    pub kind: Option<String>,
    #[schema(example = 100)]
    pub max_capacity: Option<i64>,
    #[schema(example = 80)]
    pub current_level: Option<i64>,
    /// Running-low percentage; defaults to 10.
    #[schema(example = 10)]
    pub threshold: Option<i64>,
    /// Parent pantry id.
    pub pantry: Option<i64>,
}

fn parse_kind(raw: &str) -> Result<DispenserKind, Error> {
    raw.parse().map_err(|err: crate::domain::UnknownDispenserKind| {
        invalid_choice_error(KIND, err.to_string())
    })
}

impl TryFrom<DispenserRequest> for DispenserPayload {
    type Error = Error;

    fn try_from(value: DispenserRequest) -> Result<Self, Self::Error> {
        let kind = parse_kind(&require(value.kind, KIND)?)?;
        Ok(Self {
            kind,
            max_capacity: require(value.max_capacity, FieldName::new("max_capacity"))?,
            current_level: require(value.current_level, FieldName::new("current_level"))?,
            threshold: value.threshold,
            pantry: PantryId::new(require(value.pantry, FieldName::new("pantry"))?),
        })
    }
}

impl DispenserRequest {
    /// Fill fields absent from a partial update with the stored values.
    fn merged_over(self, current: &Dispenser) -> Self {
        Self {
            kind: self.kind.or_else(|| Some(current.kind().code().to_owned())),
            max_capacity: self.max_capacity.or(Some(i64::from(current.max_capacity()))),
            current_level: self
                .current_level
                .or(Some(i64::from(current.current_level()))),
            threshold: self.threshold.or(Some(i64::from(current.threshold()))),
            pantry: self.pantry.or(Some(current.pantry().get())),
        }
    }
}

/// Dispenser representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DispenserResponse {
    pub id: i64,
    #[serde(rename = "type")]
    #[schema(value_type = DispenserKindSchema)]
    pub kind: DispenserKind,
    pub max_capacity: i32,
    pub current_level: i32,
    pub threshold: i32,
    pub pantry: i64,
}

impl From<Dispenser> for DispenserResponse {
    fn from(dispenser: Dispenser) -> Self {
        Self {
            id: dispenser.id().get(),
            kind: dispenser.kind(),
            max_capacity: dispenser.max_capacity(),
            current_level: dispenser.current_level(),
            threshold: dispenser.threshold(),
            pantry: dispenser.pantry().get(),
        }
    }
}

/// Optional listing filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DispenserFilter {
    /// Only dispensers in this pantry.
    pub pantry: Option<i64>,
}

/// Documented shape of the level-update body.
///
/// The handler reads the raw JSON so that strings and floats reach the
/// domain coercion rules instead of failing deserialisation.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateLevelBody {
    /// New absolute level; zero or greater.
    #[schema(example = 42)]
    current_level: i64,
}

/// Level-update acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLevelAck {
    #[schema(example = "Dispenser updated successfully")]
    pub message: String,
}

/// List dispensers.
#[utoipa::path(
    get,
    path = "/api/dispensers/",
    params(DispenserFilter),
    responses(
        (status = 200, description = "Dispensers", body = [DispenserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "listDispensers"
)]
#[get("/dispensers/")]
pub async fn list_dispensers(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    filter: web::Query<DispenserFilter>,
) -> ApiResult<web::Json<Vec<DispenserResponse>>> {
    let dispensers = state
        .inventory
        .list_dispensers(filter.pantry.map(PantryId::new))
        .await?;
    Ok(web::Json(
        dispensers.into_iter().map(DispenserResponse::from).collect(),
    ))
}

/// Create a dispenser in an existing pantry.
#[utoipa::path(
    post,
    path = "/api/dispensers/",
    request_body = DispenserRequest,
    responses(
        (status = 201, description = "Dispenser created", body = DispenserResponse),
        (status = 400, description = "Invalid request or unknown pantry", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "createDispenser"
)]
#[post("/dispensers/")]
pub async fn create_dispenser(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<DispenserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = DispenserPayload::try_from(payload.into_inner())?;
    let dispenser = state.inventory_commands.create_dispenser(payload).await?;
    Ok(HttpResponse::Created().json(DispenserResponse::from(dispenser)))
}

/// Fetch one dispenser.
#[utoipa::path(
    get,
    path = "/api/dispensers/{id}/",
    params(("id" = i64, Path, description = "Dispenser id")),
    responses(
        (status = 200, description = "Dispenser", body = DispenserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "getDispenser"
)]
#[get("/dispensers/{id}/")]
pub async fn get_dispenser(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DispenserResponse>> {
    let dispenser = state
        .inventory
        .get_dispenser(DispenserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(dispenser.into()))
}

/// Replace every mutable dispenser field.
#[utoipa::path(
    put,
    path = "/api/dispensers/{id}/",
    params(("id" = i64, Path, description = "Dispenser id")),
    request_body = DispenserRequest,
    responses(
        (status = 200, description = "Dispenser replaced", body = DispenserResponse),
        (status = 400, description = "Invalid request or unknown pantry", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "updateDispenser"
)]
#[put("/dispensers/{id}/")]
pub async fn update_dispenser(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<DispenserRequest>,
) -> ApiResult<web::Json<DispenserResponse>> {
    let payload = DispenserPayload::try_from(payload.into_inner())?;
    let dispenser = state
        .inventory_commands
        .update_dispenser(DispenserId::new(path.into_inner()), payload)
        .await?;
    Ok(web::Json(dispenser.into()))
}

/// Partially update a dispenser; absent fields keep their stored values.
#[utoipa::path(
    patch,
    path = "/api/dispensers/{id}/",
    params(("id" = i64, Path, description = "Dispenser id")),
    request_body = DispenserRequest,
    responses(
        (status = 200, description = "Dispenser updated", body = DispenserResponse),
        (status = 400, description = "Invalid request or unknown pantry", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "patchDispenser"
)]
#[patch("/dispensers/{id}/")]
pub async fn patch_dispenser(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<DispenserRequest>,
) -> ApiResult<web::Json<DispenserResponse>> {
    let id = DispenserId::new(path.into_inner());
    let current = state.inventory.get_dispenser(id).await?;
    let payload = DispenserPayload::try_from(payload.into_inner().merged_over(&current))?;
    let dispenser = state.inventory_commands.update_dispenser(id, payload).await?;
    Ok(web::Json(dispenser.into()))
}

/// Delete a dispenser.
#[utoipa::path(
    delete,
    path = "/api/dispensers/{id}/",
    params(("id" = i64, Path, description = "Dispenser id")),
    responses(
        (status = 204, description = "Dispenser deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "deleteDispenser"
)]
#[delete("/dispensers/{id}/")]
pub async fn delete_dispenser(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .inventory_commands
        .delete_dispenser(DispenserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Level update body, JSON or form encoded.
type LevelBody = Either<web::Json<Value>, web::Form<HashMap<String, String>>>;

/// Pull `current_level` out of a decoded body.
///
/// Undecodable bodies arrive as `None` and read as a missing field, so the
/// dispenser lookup still decides between 404 and 400.
fn level_field(payload: LevelBody) -> Option<Value> {
    match payload {
        Either::Left(json) => match json.into_inner() {
            Value::Object(mut body) => body.remove("current_level"),
            _ => None,
        },
        Either::Right(form) => form
            .into_inner()
            .remove("current_level")
            .map(Value::String),
    }
}

/// Set a dispenser's absolute level.
///
/// Sends a running-low notification when the new level drops below the
/// dispenser's threshold. Notification failures never change the response.
#[utoipa::path(
    post,
    path = "/api/dispensers/{id}/update-level/",
    params(("id" = i64, Path, description = "Dispenser id")),
    request_body = UpdateLevelBody,
    responses(
        (status = 200, description = "Level stored", body = UpdateLevelAck),
        (status = 400, description = "Missing or invalid current_level", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Dispenser not found", body = ErrorSchema)
    ),
    tags = ["dispensers"],
    operation_id = "updateDispenserLevel"
)]
#[post("/dispensers/{id}/update-level/")]
pub async fn update_level(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: Option<LevelBody>,
) -> ApiResult<web::Json<UpdateLevelAck>> {
    let dispenser_id = DispenserId::new(path.into_inner());
    let current_level = payload.and_then(level_field);
    let response = state
        .levels
        .update_level(UpdateLevelRequest {
            dispenser_id,
            current_level,
        })
        .await?;
    info!(
        dispenser = %dispenser_id,
        level = response.dispenser.current_level(),
        running_low = response.running_low,
        notified = response.notified,
        "level update accepted"
    );
    Ok(web::Json(UpdateLevelAck {
        message: UPDATED.to_owned(),
    }))
}

#[cfg(test)]
#[path = "dispensers_tests.rs"]
mod tests;
