//! Application error type and its HTTP mapping.
//!
//! Every core operation returns [`AppError`]. Variants line up with the
//! failure kinds callers need to branch on: bad input, missing record,
//! uniqueness clash, stale version, unreachable store, rejected token.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller input failed validation (page bounds, sort token, token format, payload fields).
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A unique constraint was violated.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// The stored version no longer matches the version the caller read.
    #[error("{message}")]
    EditConflict { message: String, details: Value },

    /// The store timed out or the connection could not be used.
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    /// Token is unknown, expired or minted for another scope.
    #[error("{message}")]
    InvalidToken { message: String, details: Value },

    #[error("{message}")]
    InvalidCredentials { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// The secure random source could not produce token material.
    #[error("{message}")]
    TokenGeneration { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn edit_conflict(details: Value) -> Self {
        Self::EditConflict {
            message: "Unable to update the record due to an edit conflict, please try again"
                .to_string(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_token() -> Self {
        Self::InvalidToken {
            message: "Invalid or expired token".to_string(),
            details: json!({}),
        }
    }
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "Invalid authentication credentials".to_string(),
            details: json!({}),
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn token_generation(details: Value) -> Self {
        Self::TokenGeneration {
            message: "Failed to generate token".to_string(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::EditConflict { .. } => "edit_conflict",
            AppError::Unavailable { .. } => "service_unavailable",
            AppError::InvalidToken { .. } => "invalid_token",
            AppError::InvalidCredentials { .. } => "invalid_credentials",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Forbidden { .. } => "forbidden",
            AppError::TokenGeneration { .. } => "token_generation_failed",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } | AppError::EditConflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidToken { .. }
            | AppError::InvalidCredentials { .. }
            | AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::TokenGeneration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    fn into_parts(self) -> (String, Value) {
        match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::EditConflict { message, details }
            | AppError::Unavailable { message, details }
            | AppError::InvalidToken { message, details }
            | AppError::InvalidCredentials { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::TokenGeneration { message, details }
            | AppError::Internal { message, details } => (message, details),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let bearer_challenge = matches!(
            self,
            AppError::InvalidToken { .. } | AppError::Unauthorized { .. }
        );

        let (message, details) = self.into_parts();
        // Server faults keep their details in the log only.
        let details = if status.is_server_error() {
            tracing::error!(code, %message, %details, "request failed");
            json!({})
        } else {
            details
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if bearer_challenge {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found", json!({})),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => {
                AppError::unavailable("Database is unavailable", json!({ "reason": e.to_string() }))
            }
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            ),
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => AppError::not_found(
                "Referenced record not found",
                json!({ "constraint": db.constraint() }),
            ),
            other => AppError::internal("Database error", json!({ "reason": other.to_string() })),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query string",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Body contains badly-formed JSON",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::not_found(
            "The requested resource could not be found",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect::<serde_json::Map<_, _>>();

        AppError::bad_request("Failed validation", Value::Object(details))
    }
}
