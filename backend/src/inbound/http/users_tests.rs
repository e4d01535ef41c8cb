//! Regression coverage for this module.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use super::*;
use crate::domain::ports::MockAccountCommand;
use crate::domain::{Error, TokenPair, UserId, Username};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{state_with, test_app};

fn ports_with(accounts: MockAccountCommand) -> HttpStatePorts {
    HttpStatePorts {
        accounts: Arc::new(accounts),
        ..HttpStatePorts::default()
    }
}

async fn post(accounts: MockAccountCommand, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(
        test_app(state_with(ports_with(accounts)))
            .service(register)
            .service(login)
            .service(refresh),
    )
    .await;
    let res = test::call_service(
        &app,
        test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_user_without_password() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_register()
        .withf(|registration| {
            registration.credentials().username().as_ref() == "ada"
                && registration.email() == Some("ada@example.com")
        })
        .times(1)
        .returning(|registration| {
            Ok(User::new(
                UserId::random(),
                registration.credentials().username().clone(),
                registration.email().map(str::to_owned),
            ))
        });

    let (status, body) = post(
        accounts,
        "/users/register/",
        json!({"username": "ada", "password": "pw", "email": "ada@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
}

#[rstest]
#[case(json!({"password": "pw"}), "username", "missing_field")]
#[case(json!({"username": "ada"}), "password", "missing_field")]
#[case(json!({"username": "  ", "password": "pw"}), "username", "empty_username")]
#[case(json!({"username": "ada", "password": "pw", "email": "nope"}), "email", "invalid_email")]
#[actix_web::test]
async fn register_rejects_invalid_bodies(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut accounts = MockAccountCommand::new();
    accounts.expect_register().times(0);

    let (status, body) = post(accounts, "/users/register/", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn login_returns_token_pair() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_login()
        .withf(|credentials| {
            credentials.username() == &Username::new("sampleuser").expect("username")
                && credentials.password() == "password123"
        })
        .times(1)
        .returning(|_| {
            Ok(TokenPair {
                access: Zeroizing::new("a".to_owned()),
                refresh: Zeroizing::new("r".to_owned()),
            })
        });

    let (status, body) = post(
        accounts,
        "/users/login/",
        json!({"username": "sampleuser", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"access": "a", "refresh": "r"}));
}

#[rstest]
#[actix_web::test]
async fn login_failures_are_unauthorised() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_login()
        .returning(|_| Err(Error::unauthorized("invalid credentials")));

    let (status, body) = post(
        accounts,
        "/users/login/",
        json!({"username": "sampleuser", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn refresh_returns_new_access_token() {
    let mut accounts = MockAccountCommand::new();
    accounts
        .expect_refresh()
        .withf(|token| token == "r")
        .times(1)
        .returning(|_| Ok(Zeroizing::new("a2".to_owned())));

    let (status, body) = post(accounts, "/users/token/refresh/", json!({"refresh": "r"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"access": "a2"}));
}

#[rstest]
#[actix_web::test]
async fn refresh_requires_the_token_field() {
    let mut accounts = MockAccountCommand::new();
    accounts.expect_refresh().times(0);

    let (status, body) = post(accounts, "/users/token/refresh/", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "refresh");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_client_error() {
    let app = test::init_service(
        test_app(state_with(HttpStatePorts::default())).service(login),
    )
    .await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/login/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
