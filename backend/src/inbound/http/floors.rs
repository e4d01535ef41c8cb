//! Floor CRUD handlers.
//!
//! ```text
//! GET    /api/floors/
//! POST   /api/floors/        {"number": 3}
//! GET    /api/floors/{id}/
//! PUT    /api/floors/{id}/   {"number": 4}
//! DELETE /api/floors/{id}/
//! ```
//!
//! New floors are owned by the caller; replacing a floor keeps its owner.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FloorPayload;
use crate::domain::{Error, Floor, FloorId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Floor body for create and replace.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct FloorRequest {
    #[schema(example = 3)]
    pub number: Option<i64>,
}

impl TryFrom<FloorRequest> for FloorPayload {
    type Error = Error;

    fn try_from(value: FloorRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            number: require(value.number, FieldName::new("number"))?,
        })
    }
}

impl FloorRequest {
    /// Fill fields absent from a partial update with the stored values.
    fn merged_over(self, current: &Floor) -> Self {
        Self {
            number: self.number.or(Some(i64::from(current.number()))),
        }
    }
}

/// Floor representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FloorResponse {
    pub id: i64,
    pub number: i32,
    /// Owning user id.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user: String,
}

impl From<Floor> for FloorResponse {
    fn from(floor: Floor) -> Self {
        Self {
            id: floor.id().get(),
            number: floor.number(),
            user: floor.owner().to_string(),
        }
    }
}

/// List all floors.
#[utoipa::path(
    get,
    path = "/api/floors/",
    responses(
        (status = 200, description = "Floors", body = [FloorResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "listFloors"
)]
#[get("/floors/")]
pub async fn list_floors(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<FloorResponse>>> {
    let floors = state.inventory.list_floors().await?;
    Ok(web::Json(floors.into_iter().map(FloorResponse::from).collect()))
}

/// Create a floor owned by the caller.
#[utoipa::path(
    post,
    path = "/api/floors/",
    request_body = FloorRequest,
    responses(
        (status = 201, description = "Floor created", body = FloorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "createFloor"
)]
#[post("/floors/")]
pub async fn create_floor(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<FloorRequest>,
) -> ApiResult<HttpResponse> {
    let payload = FloorPayload::try_from(payload.into_inner())?;
    let floor = state
        .inventory_commands
        .create_floor(user.id(), payload)
        .await?;
    Ok(HttpResponse::Created().json(FloorResponse::from(floor)))
}

/// Fetch one floor.
#[utoipa::path(
    get,
    path = "/api/floors/{id}/",
    params(("id" = i64, Path, description = "Floor id")),
    responses(
        (status = 200, description = "Floor", body = FloorResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "getFloor"
)]
#[get("/floors/{id}/")]
pub async fn get_floor(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<FloorResponse>> {
    let floor = state
        .inventory
        .get_floor(FloorId::new(path.into_inner()))
        .await?;
    Ok(web::Json(floor.into()))
}

/// Replace a floor's number.
#[utoipa::path(
    put,
    path = "/api/floors/{id}/",
    params(("id" = i64, Path, description = "Floor id")),
    request_body = FloorRequest,
    responses(
        (status = 200, description = "Floor replaced", body = FloorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "updateFloor"
)]
#[put("/floors/{id}/")]
pub async fn update_floor(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<FloorRequest>,
) -> ApiResult<web::Json<FloorResponse>> {
    let payload = FloorPayload::try_from(payload.into_inner())?;
    let floor = state
        .inventory_commands
        .update_floor(FloorId::new(path.into_inner()), payload)
        .await?;
    Ok(web::Json(floor.into()))
}

/// Partially update a floor; absent fields keep their stored values.
#[utoipa::path(
    patch,
    path = "/api/floors/{id}/",
    params(("id" = i64, Path, description = "Floor id")),
    request_body = FloorRequest,
    responses(
        (status = 200, description = "Floor updated", body = FloorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "patchFloor"
)]
#[patch("/floors/{id}/")]
pub async fn patch_floor(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<FloorRequest>,
) -> ApiResult<web::Json<FloorResponse>> {
    let id = FloorId::new(path.into_inner());
    let current = state.inventory.get_floor(id).await?;
    let payload = FloorPayload::try_from(payload.into_inner().merged_over(&current))?;
    let floor = state.inventory_commands.update_floor(id, payload).await?;
    Ok(web::Json(floor.into()))
}

/// Delete a floor with its pantries and dispensers.
#[utoipa::path(
    delete,
    path = "/api/floors/{id}/",
    params(("id" = i64, Path, description = "Floor id")),
    responses(
        (status = 204, description = "Floor deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["floors"],
    operation_id = "deleteFloor"
)]
#[delete("/floors/{id}/")]
pub async fn delete_floor(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .inventory_commands
        .delete_floor(FloorId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
