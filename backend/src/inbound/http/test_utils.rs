//! Test helpers for inbound HTTP components.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};

use crate::domain::ports::FIXTURE_ACCESS_TOKEN;

use super::error::json_error_handler;
use super::state::{HttpState, HttpStatePorts};

/// Handler state backed entirely by fixture ports.
pub fn fixture_state() -> web::Data<HttpState> {
    state_with(HttpStatePorts::default())
}

/// Handler state built from a customised ports bundle.
pub fn state_with(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}

/// JSON extractor config matching the production server.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Authorization header accepted by the fixture token verifier.
pub fn fixture_bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {FIXTURE_ACCESS_TOKEN}"))
}

/// App with state and JSON config, ready for route registration.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).app_data(json_config())
}
