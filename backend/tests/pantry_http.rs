//! End-to-end HTTP behaviour over the in-memory stores.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use pantry_backend::outbound::StoreAdapters;
use rstest::rstest;
use serde_json::{Value, json};

use support::{RecordingTransport, access_token, call, http_state, init_app};

async fn register_and_login<S>(app: &S) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = call(
        app,
        TestRequest::post()
            .uri("/api/users/register/")
            .set_json(json!({"username": "ops", "password": "hunter2", "email": "ops@example.com"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["username"], "ops");
    access_token(app, "ops", "hunter2").await
}

async fn create<S>(app: &S, token: &str, uri: &str, body: Value) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, created) = call(app, TestRequest::post().uri(uri).set_json(body), Some(token)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

#[rstest]
#[actix_web::test]
async fn running_low_update_notifies_with_location() {
    let transport = Arc::new(RecordingTransport::default());
    let app = init_app(http_state(&StoreAdapters::in_memory(), transport.clone())).await;
    let token = register_and_login(&app).await;

    let floor = create(&app, &token, "/api/floors/", json!({"number": 4})).await;
    let pantry = create(
        &app,
        &token,
        "/api/pantries/",
        json!({"name": "Kitchenette", "floor": floor["id"]}),
    )
    .await;
    let dispenser = create(
        &app,
        &token,
        "/api/dispensers/",
        json!({"type": "CO", "max_capacity": 200, "current_level": 150, "pantry": pantry["id"]}),
    )
    .await;
    assert_eq!(dispenser["threshold"], 10);
    let uri = format!("/api/dispensers/{}/update-level/", dispenser["id"]);

    let (status, body) = call(
        &app,
        TestRequest::post().uri(&uri).set_json(json!({"current_level": 20})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Dispenser updated successfully"}));
    assert!(transport.messages().is_empty(), "20 of 200 is not below 10%");

    let (status, _) = call(
        &app,
        TestRequest::post().uri(&uri).set_json(json!({"current_level": 19})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    let message = messages.first().expect("one message");
    assert_eq!(message.from, "ops@example.com");
    assert_eq!(message.to, "facilities@example.com");
    assert_eq!(message.subject, "Coffee Dispenser Running Low");
    assert_eq!(
        message.body,
        "The dispenser in pantry 'Kitchenette' on floor '4' is running low. Please refill it soon."
    );

    let (_, fetched) = call(&app, TestRequest::get().uri(&format!("/api/dispensers/{}/", dispenser["id"])), Some(&token)).await;
    assert_eq!(fetched["current_level"], 19);
}

#[rstest]
#[actix_web::test]
async fn failing_transport_never_fails_the_update() {
    let transport = Arc::new(RecordingTransport::failing());
    let app = init_app(http_state(&StoreAdapters::in_memory(), transport.clone())).await;
    let token = register_and_login(&app).await;
    let floor = create(&app, &token, "/api/floors/", json!({"number": 1})).await;
    let pantry = create(&app, &token, "/api/pantries/", json!({"name": "A", "floor": floor["id"]})).await;
    let dispenser = create(
        &app,
        &token,
        "/api/dispensers/",
        json!({"type": "SN", "max_capacity": 100, "current_level": 50, "pantry": pantry["id"]}),
    )
    .await;

    let (status, _) = call(
        &app,
        TestRequest::post()
            .uri(&format!("/api/dispensers/{}/update-level/", dispenser["id"]))
            .set_json(json!({"current_level": 0})),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transport.messages().len(), 1);
}

#[rstest]
#[case(json!({}), "'current_level' is required")]
#[case(json!({"current_level": null}), "'current_level' is required")]
#[case(json!({"current_level": -1}), "'current_level' must be a positive integer")]
#[case(json!({"current_level": "abc"}), "'current_level' must be a positive integer")]
#[actix_web::test]
async fn invalid_levels_are_rejected_without_writing(#[case] body: Value, #[case] error: &str) {
    let app = init_app(http_state(
        &StoreAdapters::in_memory(),
        Arc::new(RecordingTransport::default()),
    ))
    .await;
    let token = register_and_login(&app).await;
    let floor = create(&app, &token, "/api/floors/", json!({"number": 1})).await;
    let pantry = create(&app, &token, "/api/pantries/", json!({"name": "A", "floor": floor["id"]})).await;
    let dispenser = create(
        &app,
        &token,
        "/api/dispensers/",
        json!({"type": "DR", "max_capacity": 100, "current_level": 50, "pantry": pantry["id"]}),
    )
    .await;

    let (status, response) = call(
        &app,
        TestRequest::post()
            .uri(&format!("/api/dispensers/{}/update-level/", dispenser["id"]))
            .set_json(body),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], error);
    let (_, fetched) = call(
        &app,
        TestRequest::get().uri(&format!("/api/dispensers/{}/", dispenser["id"])),
        Some(&token),
    )
    .await;
    assert_eq!(fetched["current_level"], 50);
}

#[rstest]
#[actix_web::test]
async fn unknown_dispenser_is_not_found_before_validation() {
    let app = init_app(http_state(
        &StoreAdapters::in_memory(),
        Arc::new(RecordingTransport::default()),
    ))
    .await;
    let token = register_and_login(&app).await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/dispensers/999/update-level/")
            .set_json(json!({"current_level": -5})),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Dispenser not found");
}

#[rstest]
#[actix_web::test]
async fn deleting_a_floor_cascades_to_its_pantries() {
    let app = init_app(http_state(
        &StoreAdapters::in_memory(),
        Arc::new(RecordingTransport::default()),
    ))
    .await;
    let token = register_and_login(&app).await;
    let floor = create(&app, &token, "/api/floors/", json!({"number": 2})).await;
    create(&app, &token, "/api/pantries/", json!({"name": "West", "floor": floor["id"]})).await;

    let (status, _) = call(
        &app,
        TestRequest::delete().uri(&format!("/api/floors/{}/", floor["id"])),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, pantries) = call(&app, TestRequest::get().uri("/api/pantries/"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pantries, json!([]));
}

#[rstest]
#[actix_web::test]
async fn refresh_issues_a_working_access_token() {
    let app = init_app(http_state(
        &StoreAdapters::in_memory(),
        Arc::new(RecordingTransport::default()),
    ))
    .await;
    register_and_login(&app).await;
    let (_, pair) = call(
        &app,
        TestRequest::post()
            .uri("/api/users/login/")
            .set_json(json!({"username": "ops", "password": "hunter2"})),
        None,
    )
    .await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/users/token/refresh/")
            .set_json(json!({"refresh": pair["refresh"]})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().expect("access token");

    let (status, _) = call(&app, TestRequest::get().uri("/api/floors/"), Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, TestRequest::get().uri("/api/floors/"), Some("bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn patch_keeps_fields_the_body_omits() {
    let app = init_app(http_state(
        &StoreAdapters::in_memory(),
        Arc::new(RecordingTransport::default()),
    ))
    .await;
    let token = register_and_login(&app).await;
    let floor = create(&app, &token, "/api/floors/", json!({"number": 2})).await;
    let pantry = create(
        &app,
        &token,
        "/api/pantries/",
        json!({"name": "East Wing", "floor": floor["id"]}),
    )
    .await;
    let dispenser = create(
        &app,
        &token,
        "/api/dispensers/",
        json!({"type": "DR", "max_capacity": 80, "current_level": 60, "pantry": pantry["id"]}),
    )
    .await;

    let uri = format!("/api/dispensers/{}/", dispenser["id"]);
    let (status, patched) = call(
        &app,
        TestRequest::patch().uri(&uri).set_json(json!({"threshold": 25})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{patched}");
    assert_eq!(
        patched,
        json!({
            "id": dispenser["id"],
            "type": "DR",
            "max_capacity": 80,
            "current_level": 60,
            "threshold": 25,
            "pantry": pantry["id"],
        })
    );

    let uri = format!("/api/pantries/{}/", pantry["id"]);
    let (status, renamed) = call(
        &app,
        TestRequest::patch().uri(&uri).set_json(json!({"name": "West Wing"})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["floor"], floor["id"]);
    assert_eq!(renamed["name"], "West Wing");

    let uri = format!("/api/floors/{}/", floor["id"]);
    let (status, _) = call(
        &app,
        TestRequest::patch().uri(&uri).set_json(json!({"number": 0})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        TestRequest::patch()
            .uri("/api/dispensers/999/")
            .set_json(json!({"threshold": 5})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
}
