//! Shared harness for HTTP integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use pantry_backend::Trace;
use pantry_backend::domain::ports::{
    NotificationTransport, NotificationTransportError, OutboundMessage,
};
use pantry_backend::domain::{
    AccountService, InventoryService, LevelUpdateService, LowLevelNotifier, TokenLifetimes,
};
use pantry_backend::inbound::http::dispensers::{
    create_dispenser, delete_dispenser, get_dispenser, list_dispensers, patch_dispenser,
    update_dispenser, update_level,
};
use pantry_backend::inbound::http::error::json_error_handler;
use pantry_backend::inbound::http::floors::{
    create_floor, delete_floor, get_floor, list_floors, patch_floor, update_floor,
};
use pantry_backend::inbound::http::pantries::{
    create_pantry, delete_pantry, get_pantry, list_pantries, patch_pantry, update_pantry,
};
use pantry_backend::inbound::http::state::{HttpState, HttpStatePorts};
use pantry_backend::inbound::http::users::{login, refresh, register};
use pantry_backend::outbound::StoreAdapters;
use serde_json::Value;

/// Transport recording every message, optionally failing each send.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("transport lock").clone()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationTransportError> {
        self.sent
            .lock()
            .expect("transport lock")
            .push(message.clone());
        if self.fail {
            return Err(NotificationTransportError::unavailable("smtp down"));
        }
        Ok(())
    }
}

/// Build handler state over the given stores and transport.
pub fn http_state(
    stores: &StoreAdapters,
    transport: Arc<RecordingTransport>,
) -> web::Data<HttpState> {
    let accounts = Arc::new(AccountService::new(
        stores.users.clone(),
        stores.tokens.clone(),
        Arc::new(DefaultClock),
        TokenLifetimes::default(),
    ));
    let inventory = Arc::new(InventoryService::new(
        stores.floors.clone(),
        stores.pantries.clone(),
        stores.dispensers.clone(),
    ));
    let notifier = LowLevelNotifier::new(
        transport,
        "ops@example.com",
        "facilities@example.com",
        Duration::from_secs(1),
    );
    let levels = Arc::new(LevelUpdateService::new(stores.dispensers.clone(), notifier));
    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        tokens: accounts,
        inventory: inventory.clone(),
        inventory_commands: inventory,
        levels,
    }))
}

/// Initialise the `/api` surface as the server mounts it.
pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(
                web::scope("/api")
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
                    .service(update_level),
            ),
    )
    .await
}

/// Issue one request and decode the JSON body, or `Null` when empty.
pub async fn call<S>(
    app: &S,
    request: test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = match token {
        Some(token) => request.insert_header(("Authorization", format!("Bearer {token}"))),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

/// Log in and return the access token.
pub async fn access_token<S>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = call(
        app,
        test::TestRequest::post()
            .uri("/api/users/login/")
            .set_json(serde_json::json!({"username": username, "password": password})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access"].as_str().expect("access token").to_owned()
}
