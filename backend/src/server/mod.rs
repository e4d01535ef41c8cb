//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use pantry_backend::Trace;
#[cfg(debug_assertions)]
use pantry_backend::doc::ApiDoc;
use pantry_backend::inbound::http::dispensers::{
    create_dispenser, delete_dispenser, get_dispenser, list_dispensers, patch_dispenser,
    update_dispenser, update_level,
};
use pantry_backend::inbound::http::error::json_error_handler;
use pantry_backend::inbound::http::floors::{
    create_floor, delete_floor, get_floor, list_floors, patch_floor, update_floor,
};
use pantry_backend::inbound::http::health::{HealthState, live, ready};
use pantry_backend::inbound::http::pantries::{
    create_pantry, delete_pantry, get_pantry, list_pantries, patch_pantry, update_pantry,
};
use pantry_backend::inbound::http::state::HttpState;
use pantry_backend::inbound::http::users::{login, refresh, register};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api")
        .service(register)
        .service(login)
        .service(refresh)
        .service(list_floors)
        .service(create_floor)
        .service(get_floor)
        .service(update_floor)
        .service(patch_floor)
        .service(delete_floor)
        .service(list_pantries)
        .service(create_pantry)
        .service(get_pantry)
        .service(update_pantry)
        .service(patch_pantry)
        .service(delete_pantry)
        .service(list_dispensers)
        .service(create_dispenser)
        .service(get_dispenser)
        .service(update_dispenser)
        .service(patch_dispenser)
        .service(delete_dispenser)
        .service(update_level);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
