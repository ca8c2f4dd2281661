//! Bearer token authentication middleware.
//!
//! [`authenticate`] runs on every request and records who is calling as a
//! [`CurrentUser`] request extension. [`require_activated_user`] guards the
//! routes that mutate data.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// Caller identity resolved from the `Authorization` header.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Anonymous,
    Authenticated(User),
}

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated(user) => Some(user),
        }
    }
}

/// Resolves the bearer token, if any, into a [`CurrentUser`].
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <26-character token>
/// ```
///
/// A request without the header continues as [`CurrentUser::Anonymous`].
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header is
/// present but not a bearer token, or the token is malformed, unknown,
/// expired, or not an authentication token.
pub async fn authenticate(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let current = if parts.headers.contains_key(header::AUTHORIZATION) {
        let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
            .await
            .map_err(|_| AppError::invalid_token())?;

        let user = st
            .user_service
            .user_for_token(&token)
            .await
            .map_err(|e| match e {
                AppError::Validation { .. } => AppError::invalid_token(),
                other => other,
            })?;

        CurrentUser::Authenticated(user)
    } else {
        CurrentUser::Anonymous
    };

    parts.extensions.insert(current);
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Rejects anonymous callers and accounts that are not activated yet.
///
/// Must run after [`authenticate`].
///
/// # Errors
///
/// - `401 Unauthorized` for anonymous callers
/// - `403 Forbidden` for inactive accounts
pub async fn require_activated_user(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<CurrentUser>().and_then(CurrentUser::user) {
        None => Err(AppError::unauthorized(
            "You must be authenticated to access this resource",
            json!({}),
        )),
        Some(user) if !user.activated => Err(AppError::forbidden(
            "Your user account must be activated to access this resource",
            json!({}),
        )),
        Some(_) => Ok(next.run(req).await),
    }
}
