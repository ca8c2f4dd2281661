mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

#[sqlx::test]
async fn test_register_activate_authenticate(pool: PgPool) {
    let mailer = common::RecordingMailer::default();
    let state = common::create_test_state_with_mailer(pool, Arc::new(mailer.clone()));
    let background = state.background.clone();
    let server = TestServer::new(common::api_app(state)).unwrap();

    let registered = server
        .post("/v1/users")
        .json(&json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": common::TEST_PASSWORD
        }))
        .await;
    registered.assert_status(StatusCode::ACCEPTED);
    let user = registered.json::<Value>()["user"].clone();
    assert_eq!(user["activated"], false);
    assert!(user.get("password_hash").is_none());

    assert!(background.drain(Duration::from_secs(5)).await);
    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "ada@example.com");
    assert_eq!(sent[0].1, "user_welcome");
    assert_eq!(sent[0].2["userID"], user["id"]);
    let activation = sent[0].2["activationToken"].as_str().unwrap().to_string();
    assert_eq!(activation.len(), 26);

    let activated = server
        .put("/v1/users/activated")
        .json(&json!({ "token": activation }))
        .await;
    activated.assert_status_ok();
    assert_eq!(activated.json::<Value>()["user"]["activated"], true);
    assert_eq!(activated.json::<Value>()["user"]["version"], 2);

    // Activation tokens are single-use.
    server
        .put("/v1/users/activated")
        .json(&json!({ "token": activation }))
        .await
        .assert_status_bad_request();

    let token = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "ada@example.com", "password": common::TEST_PASSWORD }))
        .await;
    token.assert_status(StatusCode::CREATED);
    let bearer = token.json::<Value>()["authentication_token"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let me = server
        .get(&format!("/v1/users/{}", user["id"]))
        .authorization_bearer(&bearer)
        .await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["user"]["email"], "ada@example.com");
}

#[sqlx::test]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    common::create_test_user(&pool, "ada@example.com", false).await;
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server
        .post("/v1/users")
        .json(&json!({
            "username": "ada2",
            "email": "ada@example.com",
            "password": common::TEST_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(response.json::<Value>()["error"]["details"]["email"].is_string());
}

#[sqlx::test]
async fn test_wrong_password_is_rejected(pool: PgPool) {
    common::create_test_user(&pool, "ada@example.com", true).await;
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let wrong = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "ada@example.com", "password": "not-the-password" }))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json::<Value>()["error"]["code"], "invalid_credentials");

    let unknown = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever-pass" }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        unknown.json::<Value>()["error"],
        wrong.json::<Value>()["error"]
    );
}

#[sqlx::test]
async fn test_unknown_well_formed_bearer_is_rejected(pool: PgPool) {
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server
        .get("/v1/products")
        .authorization_bearer("ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_token");
}

#[sqlx::test]
async fn test_activation_token_cannot_authenticate(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let user_id = common::create_test_user(&pool, "ada@example.com", true).await;
    let activation = state
        .token_service
        .issue(
            user_id,
            chrono::Duration::hours(1),
            catalog_api::domain::entities::TokenScope::Activation,
        )
        .await
        .unwrap()
        .into_plaintext();
    let server = TestServer::new(common::api_app(state)).unwrap();

    server
        .get(&format!("/v1/users/{user_id}"))
        .authorization_bearer(&activation)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
