// src/versioning.rs
use axum::extract::{FromRequestParts, Query};
use http::request::Parts;
use serde::Deserialize;

use crate::error::AppError;

pub const VERSION_HEADER: &str = "X-Version";

/// API version requested by the caller: `X-Version` header first, then the
/// `ver` query parameter, defaulting to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    #[default]
    V1_0,
    V1_1,
}

impl ApiVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" | "1.0" => Some(ApiVersion::V1_0),
            "1.1" => Some(ApiVersion::V1_1),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionQuery {
    ver: Option<String>,
}

fn requested_version(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(value) = parts.headers.get(VERSION_HEADER) {
        return Ok(Some(value.to_str().unwrap_or_default().to_string()));
    }

    let Query(query) = Query::<VersionQuery>::try_from_uri(&parts.uri)?;
    Ok(query.ver)
}

impl<S> FromRequestParts<S> for ApiVersion
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match requested_version(parts)? {
            None => Ok(ApiVersion::default()),
            Some(raw) => ApiVersion::parse(&raw)
                .ok_or_else(|| AppError::validation(format!("Versión de API no soportada: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<ApiVersion, AppError> {
        let (mut parts, _) = req.into_parts();
        ApiVersion::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn defaults_to_1_0() {
        let req = Request::builder().uri("/productos").body(()).unwrap();
        assert_eq!(extract(req).await.unwrap(), ApiVersion::V1_0);
    }

    #[tokio::test]
    async fn header_takes_precedence_over_query() {
        let req = Request::builder()
            .uri("/productos?ver=1.0")
            .header(VERSION_HEADER, "1.1")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap(), ApiVersion::V1_1);
    }

    #[tokio::test]
    async fn reads_query_parameter() {
        let req = Request::builder()
            .uri("/productos?pageIndex=2&ver=1.1")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap(), ApiVersion::V1_1);
    }

    #[tokio::test]
    async fn decodes_percent_encoded_query_value() {
        let req = Request::builder()
            .uri("/productos?ver=1%2E1&search=pan%20dulce")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap(), ApiVersion::V1_1);
    }

    #[tokio::test]
    async fn ignores_unrelated_query_parameters() {
        let req = Request::builder()
            .uri("/productos?version=1.1&pageSize=3")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.unwrap(), ApiVersion::V1_0);
    }

    #[tokio::test]
    async fn rejects_unknown_version() {
        let req = Request::builder()
            .uri("/productos")
            .header(VERSION_HEADER, "2.0")
            .body(())
            .unwrap();
        assert!(matches!(extract(req).await, Err(AppError::BadRequest(_))));
    }
}
