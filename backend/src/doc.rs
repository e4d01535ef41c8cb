//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer token security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::dispensers::{
    DispenserRequest, DispenserResponse, UpdateLevelAck, UpdateLevelBody,
};
use crate::inbound::http::floors::{FloorRequest, FloorResponse};
use crate::inbound::http::health::{ProbeReport, ProbeStatus};
use crate::inbound::http::pantries::{PantryRequest, PantryResponse};
use crate::inbound::http::schemas::{DispenserKindSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisteredUser,
    TokenPairResponse,
};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Adds the bearer access token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Access token issued by POST /api/users/login/."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pantry dispenser API",
        description = "Floors, pantries and dispensers with level updates and running-low notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::refresh,
        crate::inbound::http::floors::list_floors,
        crate::inbound::http::floors::create_floor,
        crate::inbound::http::floors::get_floor,
        crate::inbound::http::floors::update_floor,
        crate::inbound::http::floors::patch_floor,
        crate::inbound::http::floors::delete_floor,
        crate::inbound::http::pantries::list_pantries,
        crate::inbound::http::pantries::create_pantry,
        crate::inbound::http::pantries::get_pantry,
        crate::inbound::http::pantries::update_pantry,
        crate::inbound::http::pantries::patch_pantry,
        crate::inbound::http::pantries::delete_pantry,
        crate::inbound::http::dispensers::list_dispensers,
        crate::inbound::http::dispensers::create_dispenser,
        crate::inbound::http::dispensers::get_dispenser,
        crate::inbound::http::dispensers::update_dispenser,
        crate::inbound::http::dispensers::patch_dispenser,
        crate::inbound::http::dispensers::delete_dispenser,
        crate::inbound::http::dispensers::update_level,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DispenserKindSchema,
        RegisterRequest,
        RegisteredUser,
        LoginRequest,
        TokenPairResponse,
        RefreshRequest,
        AccessTokenResponse,
        FloorRequest,
        FloorResponse,
        PantryRequest,
        PantryResponse,
        DispenserRequest,
        DispenserResponse,
        UpdateLevelBody,
        UpdateLevelAck,
        ProbeReport,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration and token issuance"),
        (name = "floors", description = "Floors owned by users"),
        (name = "pantries", description = "Pantries on a floor"),
        (name = "dispensers", description = "Dispensers and level updates"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
