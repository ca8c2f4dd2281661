mod common;

use axum_test::TestServer;
use serde_json::Value;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let server = TestServer::new(common::api_app(common::create_test_state(pool))).unwrap();

    let response = server.get("/v1/healthcheck").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "available");
    assert_eq!(json["environment"], "test");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["background_tasks"]["status"], "ok");
}

#[sqlx::test]
async fn test_health_reports_draining_background_tasks(pool: PgPool) {
    let state = common::create_test_state(pool);
    state.background.drain(std::time::Duration::from_millis(10)).await;
    let server = TestServer::new(common::api_app(state)).unwrap();

    let response = server.get("/v1/healthcheck").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["background_tasks"]["status"], "error");
}
