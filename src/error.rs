// src/error.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error envelope returned for every 4xx/5xx condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Envelope carrying the default message for `status_code`, if there is one.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            message: default_message(status_code).map(str::to_string),
        }
    }

    pub fn with_message(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: Some(message.into()),
        }
    }
}

fn default_message(status_code: u16) -> Option<&'static str> {
    match status_code {
        400 => Some("Has realizado una petición incorrecta."),
        401 => Some("Usuario no autorizado."),
        403 => Some("No tienes permisos para acceder a este recurso."),
        404 => Some("El recurso que has intentado solicitar no existe."),
        405 => Some("Este método HTTP no está permitido en el servidor."),
        500 => Some("Error en el servidor."),
        _ => None,
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status().as_u16();
        let envelope = match self {
            // Store and server failures are logged, never echoed to the client
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error occurred");
                ApiResponse::new(code)
            }
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal server error");
                ApiResponse::new(code)
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg) => ApiResponse::with_message(code, msg),
        };

        envelope.into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_messages_cover_common_codes() {
        assert_eq!(
            ApiResponse::new(404).message.as_deref(),
            Some("El recurso que has intentado solicitar no existe.")
        );
        assert_eq!(
            ApiResponse::new(400).message.as_deref(),
            Some("Has realizado una petición incorrecta.")
        );
        assert!(ApiResponse::new(418).message.is_none());
    }

    #[test]
    fn envelope_serializes_camel_case_and_skips_missing_message() {
        let json = serde_json::to_value(ApiResponse::new(418)).unwrap();
        assert_eq!(json, serde_json::json!({ "statusCode": 418 }));

        let json = serde_json::to_value(ApiResponse::with_message(404, "x")).unwrap();
        assert_eq!(json, serde_json::json!({ "statusCode": 404, "message": "x" }));
    }

    #[test]
    fn app_error_maps_to_status() {
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_error_hides_details() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
