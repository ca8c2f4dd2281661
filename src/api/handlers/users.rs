//! Handlers for account endpoints.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::users::{ActivateUserRequest, RegisterUserRequest, UserResponse};
use crate::error::AppError;
use crate::infrastructure::mailer::{WELCOME_TEMPLATE, send_with_retry};
use crate::state::AppState;

/// Registers an inactive account and mails its activation token.
///
/// # Endpoint
///
/// `POST /v1/users`
///
/// The welcome mail is sent in the background, so the response is
/// `202 Accepted` even if delivery later fails.
///
/// # Errors
///
/// - 400 if a field fails validation
/// - 409 if the email address is already registered
pub async fn register_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (user, token) = state
        .user_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    let mailer = state.mailer.clone();
    let base_delay = state.mail_retry_base;
    let recipient = user.email.clone();
    let data = json!({
        "activationToken": token.into_plaintext(),
        "userID": user.id,
    });

    state.background.spawn("welcome_mail", async move {
        send_with_retry(mailer.as_ref(), &recipient, WELCOME_TEMPLATE, &data, base_delay).await
    });

    Ok((StatusCode::ACCEPTED, Json(UserResponse { user: user.into() })))
}

/// Activates the account owning the token.
///
/// # Endpoint
///
/// `PUT /v1/users/activated`
///
/// # Errors
///
/// Returns 400 with a `token` detail if the token is malformed, unknown or
/// expired.
pub async fn activate_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(payload) = payload?;
    let user = state.user_service.activate(&payload.token).await?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// # Endpoint
///
/// `GET /v1/users/{id}` (activated user)
pub async fn show_user_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(id) = id?;
    let user = state.user_service.get(id).await?;

    Ok(Json(UserResponse { user: user.into() }))
}
