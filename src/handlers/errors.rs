// src/handlers/errors.rs
use axum::extract::{rejection::PathRejection, Path};

use crate::error::ApiResponse;

/// GET /errors/{code} - renders the envelope for a status code routed here.
pub async fn render_error(code: Result<Path<u16>, PathRejection>) -> ApiResponse {
    match code {
        Ok(Path(code)) if (100..=599).contains(&code) => ApiResponse::new(code),
        _ => ApiResponse::new(400),
    }
}

pub async fn not_found() -> ApiResponse {
    ApiResponse::new(404)
}

pub async fn method_not_allowed() -> ApiResponse {
    ApiResponse::new(405)
}
