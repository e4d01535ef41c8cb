//! Pantry CRUD handlers.
//!
//! `GET /api/pantries/?floor=<id>` restricts the listing to one floor.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PantryPayload;
use crate::domain::{Error, FloorId, Pantry, PantryId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Pantry body for create and replace.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PantryRequest {
    #[schema(example = "Pantry 1 on Floor 1")]
    pub name: Option<String>,
    /// Parent floor id.
    pub floor: Option<i64>,
}

impl TryFrom<PantryRequest> for PantryPayload {
    type Error = Error;

    fn try_from(value: PantryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require(value.name, FieldName::new("name"))?,
            floor: FloorId::new(require(value.floor, FieldName::new("floor"))?),
        })
    }
}

impl PantryRequest {
    /// Fill fields absent from a partial update with the stored values.
    fn merged_over(self, current: &Pantry) -> Self {
        Self {
            name: self.name.or_else(|| Some(current.name().to_owned())),
            floor: self.floor.or(Some(current.floor().get())),
        }
    }
}

/// Pantry representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PantryResponse {
    pub id: i64,
    pub name: String,
    pub floor: i64,
}

impl From<Pantry> for PantryResponse {
    fn from(pantry: Pantry) -> Self {
        Self {
            id: pantry.id().get(),
            floor: pantry.floor().get(),
            name: pantry.name().to_owned(),
        }
    }
}

/// Optional listing filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PantryFilter {
    /// Only pantries on this floor.
    pub floor: Option<i64>,
}

/// List pantries.
#[utoipa::path(
    get,
    path = "/api/pantries/",
    params(PantryFilter),
    responses(
        (status = 200, description = "Pantries", body = [PantryResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "listPantries"
)]
#[get("/pantries/")]
pub async fn list_pantries(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    filter: web::Query<PantryFilter>,
) -> ApiResult<web::Json<Vec<PantryResponse>>> {
    let pantries = state
        .inventory
        .list_pantries(filter.floor.map(FloorId::new))
        .await?;
    Ok(web::Json(
        pantries.into_iter().map(PantryResponse::from).collect(),
    ))
}

/// Create a pantry on an existing floor.
#[utoipa::path(
    post,
    path = "/api/pantries/",
    request_body = PantryRequest,
    responses(
        (status = 201, description = "Pantry created", body = PantryResponse),
        (status = 400, description = "Invalid request or unknown floor", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "createPantry"
)]
#[post("/pantries/")]
pub async fn create_pantry(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<PantryRequest>,
) -> ApiResult<HttpResponse> {
    let payload = PantryPayload::try_from(payload.into_inner())?;
    let pantry = state.inventory_commands.create_pantry(payload).await?;
    Ok(HttpResponse::Created().json(PantryResponse::from(pantry)))
}

/// Fetch one pantry.
#[utoipa::path(
    get,
    path = "/api/pantries/{id}/",
    params(("id" = i64, Path, description = "Pantry id")),
    responses(
        (status = 200, description = "Pantry", body = PantryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "getPantry"
)]
#[get("/pantries/{id}/")]
pub async fn get_pantry(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PantryResponse>> {
    let pantry = state
        .inventory
        .get_pantry(PantryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(pantry.into()))
}

/// Replace a pantry's name and floor.
#[utoipa::path(
    put,
    path = "/api/pantries/{id}/",
    params(("id" = i64, Path, description = "Pantry id")),
    request_body = PantryRequest,
    responses(
        (status = 200, description = "Pantry replaced", body = PantryResponse),
        (status = 400, description = "Invalid request or unknown floor", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "updatePantry"
)]
#[put("/pantries/{id}/")]
pub async fn update_pantry(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PantryRequest>,
) -> ApiResult<web::Json<PantryResponse>> {
    let payload = PantryPayload::try_from(payload.into_inner())?;
    let pantry = state
        .inventory_commands
        .update_pantry(PantryId::new(path.into_inner()), payload)
        .await?;
    Ok(web::Json(pantry.into()))
}

/// Partially update a pantry; absent fields keep their stored values.
#[utoipa::path(
    patch,
    path = "/api/pantries/{id}/",
    params(("id" = i64, Path, description = "Pantry id")),
    request_body = PantryRequest,
    responses(
        (status = 200, description = "Pantry updated", body = PantryResponse),
        (status = 400, description = "Invalid request or unknown floor", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "patchPantry"
)]
#[patch("/pantries/{id}/")]
pub async fn patch_pantry(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PantryRequest>,
) -> ApiResult<web::Json<PantryResponse>> {
    let id = PantryId::new(path.into_inner());
    let current = state.inventory.get_pantry(id).await?;
    let payload = PantryPayload::try_from(payload.into_inner().merged_over(&current))?;
    let pantry = state.inventory_commands.update_pantry(id, payload).await?;
    Ok(web::Json(pantry.into()))
}

/// Delete a pantry and its dispensers.
#[utoipa::path(
    delete,
    path = "/api/pantries/{id}/",
    params(("id" = i64, Path, description = "Pantry id")),
    responses(
        (status = 204, description = "Pantry deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pantries"],
    operation_id = "deletePantry"
)]
#[delete("/pantries/{id}/")]
pub async fn delete_pantry(
    _user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .inventory_commands
        .delete_pantry(PantryId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::domain::PantryDraft;
    use crate::domain::ports::{MockInventoryCommand, MockInventoryQuery};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{fixture_bearer, state_with, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn pantry(id: i64, name: &str, floor: i64) -> Pantry {
        Pantry::from_draft(
            PantryId::new(id),
            PantryDraft::new(name, FloorId::new(floor)).expect("valid pantry"),
        )
    }

    async fn send(ports: HttpStatePorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            test_app(state_with(ports))
                .service(list_pantries)
                .service(create_pantry)
                .service(get_pantry)
                .service(update_pantry)
                .service(delete_pantry),
        )
        .await;
        let res = test::call_service(
            &app,
            request.insert_header(fixture_bearer()).to_request(),
        )
        .await;
        let status = res.status();
        let body = test::read_body(res).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[rstest]
    #[case("/pantries/", None)]
    #[case("/pantries/?floor=2", Some(FloorId::new(2)))]
    #[actix_web::test]
    async fn list_passes_the_floor_filter(#[case] uri: &str, #[case] expected: Option<FloorId>) {
        let mut query = MockInventoryQuery::new();
        query
            .expect_list_pantries()
            .withf(move |floor| *floor == expected)
            .times(1)
            .returning(|floor| Ok(vec![pantry(1, "North", floor.map_or(1, FloorId::get))]));
        let ports = HttpStatePorts {
            inventory: Arc::new(query),
            ..HttpStatePorts::default()
        };

        let (status, body) = send(ports, test::TestRequest::get().uri(uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "North");
    }

    #[rstest]
    #[actix_web::test]
    async fn create_returns_the_stored_pantry() {
        let mut commands = MockInventoryCommand::new();
        commands
            .expect_create_pantry()
            .withf(|payload| payload.name == "Annex" && payload.floor == FloorId::new(2))
            .times(1)
            .returning(|payload| Ok(pantry(7, &payload.name, payload.floor.get())));
        let ports = HttpStatePorts {
            inventory_commands: Arc::new(commands),
            ..HttpStatePorts::default()
        };

        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/pantries/")
                .set_json(json!({"name": "Annex", "floor": 2})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 7, "name": "Annex", "floor": 2}));
    }

    #[rstest]
    #[case(json!({"floor": 2}), "name")]
    #[case(json!({"name": "Annex"}), "floor")]
    #[actix_web::test]
    async fn create_reports_missing_fields(#[case] request: Value, #[case] field: &str) {
        let (status, body) = send(
            HttpStatePorts::default(),
            test::TestRequest::post().uri("/pantries/").set_json(request),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_surfaces_unknown_parent_floors() {
        let mut commands = MockInventoryCommand::new();
        commands.expect_update_pantry().times(1).returning(|_, _| {
            Err(Error::invalid_request("Invalid floor 9: object does not exist"))
        });
        let ports = HttpStatePorts {
            inventory_commands: Arc::new(commands),
            ..HttpStatePorts::default()
        };

        let (status, _) = send(
            ports,
            test::TestRequest::put()
                .uri("/pantries/1/")
                .set_json(json!({"name": "Annex", "floor": 9})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_numeric_ids_do_not_match() {
        let (status, _) = send(
            HttpStatePorts::default(),
            test::TestRequest::get().uri("/pantries/abc/"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
