//! Handler for minting authentication tokens.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::users::{AuthenticationRequest, AuthenticationTokenResponse, TokenItem};
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /v1/tokens/authentication`
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "password": "pa55word" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "authentication_token": {
///     "token": "X3ASTT2CDAN66BACKSCI4SU7SI",
///     "expiry": "2026-10-17T10:00:00Z"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 401 for an unknown email or a wrong password.
pub async fn create_authentication_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthenticationTokenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let issued = state
        .user_service
        .authenticate(&payload.email, payload.password)
        .await?;

    let expiry = issued.expiry;
    let response = AuthenticationTokenResponse {
        authentication_token: TokenItem {
            token: issued.into_plaintext(),
            expiry,
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}
