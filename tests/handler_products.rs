mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn authorized(pool: PgPool) -> (TestServer, String, PgPool) {
    let state = common::create_test_state(pool.clone());
    let user_id = common::create_test_user(&pool, "editor@example.com", true).await;
    let token = common::bearer_for(&state, user_id).await;
    (TestServer::new(common::api_app(state)).unwrap(), token, pool)
}

fn kettle() -> Value {
    json!({
        "name": "Kettle",
        "description": "Boils water",
        "category": "kitchen",
        "image_url": "https://img.example.com/kettle.png",
        "price": "29.99"
    })
}

#[sqlx::test]
async fn test_create_product(pool: PgPool) {
    let (server, token, _) = authorized(pool).await;

    let response = server
        .post("/v1/products")
        .authorization_bearer(&token)
        .json(&kettle())
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    let id = json["product"]["id"].as_i64().unwrap();
    assert_eq!(response.header("location"), format!("/v1/products/{id}").as_str());
    assert_eq!(json["product"]["version"], 1);
    assert_eq!(json["product"]["avg_rating"], 0.0);
}

#[sqlx::test]
async fn test_inactive_user_is_forbidden(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    let user_id = common::create_test_user(&pool, "new@example.com", false).await;
    let token = common::bearer_for(&state, user_id).await;
    let server = TestServer::new(common::api_app(state)).unwrap();

    let response = server
        .post("/v1/products")
        .authorization_bearer(&token)
        .json(&kettle())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_show_missing_product(pool: PgPool) {
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    server.get("/v1/products/9999").await.assert_status_not_found();
}

#[sqlx::test]
async fn test_update_with_stale_version_conflicts(pool: PgPool) {
    let (server, token, pool) = authorized(pool).await;
    let id = common::create_test_product(&pool, "Kettle", "kitchen", "29.99").await;

    let first = server
        .patch(&format!("/v1/products/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "price": "24.99", "version": 1 }))
        .await;
    first.assert_status_ok();
    assert_eq!(first.json::<Value>()["product"]["version"], 2);
    assert_eq!(first.json::<Value>()["product"]["price"], "24.99");

    let second = server
        .patch(&format!("/v1/products/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "price": "19.99", "version": 1 }))
        .await;
    second.assert_status(StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>()["error"]["code"], "edit_conflict");

    let stored = server.get(&format!("/v1/products/{id}")).await;
    assert_eq!(stored.json::<Value>()["product"]["price"], "24.99");
}

#[sqlx::test]
async fn test_update_without_version_applies(pool: PgPool) {
    let (server, token, pool) = authorized(pool).await;
    let id = common::create_test_product(&pool, "Kettle", "kitchen", "29.99").await;

    let response = server
        .patch(&format!("/v1/products/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Electric kettle" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["product"]["name"], "Electric kettle");
    assert_eq!(json["product"]["category"], "kitchen");
    assert_eq!(json["product"]["version"], 2);
}

#[sqlx::test]
async fn test_delete_product(pool: PgPool) {
    let (server, token, pool) = authorized(pool).await;
    let id = common::create_test_product(&pool, "Kettle", "kitchen", "29.99").await;

    server
        .delete(&format!("/v1/products/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete(&format!("/v1/products/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_list_sorted_and_paginated(pool: PgPool) {
    for name in ["Anvil", "Bucket", "Chisel", "Drill", "Easel"] {
        common::create_test_product(&pool, name, "tools", "10.00").await;
    }
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server
        .get("/v1/products")
        .add_query_param("sort", "-name")
        .add_query_param("page", "2")
        .add_query_param("page_size", "2")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let names: Vec<&str> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chisel", "Bucket"]);

    let metadata = &json["@metadata"];
    assert_eq!(metadata["current_page"], 2);
    assert_eq!(metadata["page_size"], 2);
    assert_eq!(metadata["first_page"], 1);
    assert_eq!(metadata["last_page"], 3);
    assert_eq!(metadata["total_records"], 5);
}

#[sqlx::test]
async fn test_list_past_last_page_is_empty(pool: PgPool) {
    common::create_test_product(&pool, "Anvil", "tools", "10.00").await;
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server.get("/v1/products").add_query_param("page", "3").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["products"], json!([]));
    assert_eq!(json["@metadata"], json!({}));
}

#[sqlx::test]
async fn test_list_filters_by_category(pool: PgPool) {
    common::create_test_product(&pool, "Anvil", "tools", "10.00").await;
    common::create_test_product(&pool, "Kettle", "kitchen", "29.99").await;
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server
        .get("/v1/products")
        .add_query_param("category", "kitchen")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["products"].as_array().unwrap().len(), 1);
    assert_eq!(json["products"][0]["name"], "Kettle");
}
