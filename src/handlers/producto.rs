// src/handlers/producto.rs
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dtos::pager::{Pager, Params};
use crate::dtos::producto::{ProductoAddUpdateDto, ProductoDto, ProductoListDto};
use crate::error::AppError;
use crate::repository::PRODUCTO_NOT_FOUND;
use crate::routes::API_BASE;
use crate::state::AppState;
use crate::versioning::ApiVersion;

pub const INLINE_COUNT: HeaderName = HeaderName::from_static("x-inlinecount");

// GET /productos - paged listing (1.0) or full listing (1.1)
#[instrument(skip(state, params))]
pub async fn get_productos(
    State(state): State<AppState>,
    version: ApiVersion,
    params: Result<Query<Params>, QueryRejection>,
) -> Result<Response, AppError> {
    match version {
        ApiVersion::V1_0 => {
            let Query(params) = params?;
            list_paged(&state, params).await
        }
        ApiVersion::V1_1 => list_all(&state).await,
    }
}

async fn list_paged(state: &AppState, params: Params) -> Result<Response, AppError> {
    let params = params.normalized(state.max_page_size);
    let (total, registros) = state
        .store
        .get_page(params.page_index, params.page_size, params.search.as_deref())
        .await?;

    let registros: Vec<ProductoListDto> = registros.into_iter().map(ProductoListDto::from).collect();
    let pager = Pager::new(params.page_index, params.page_size, total, registros, params.search);

    Ok(([(INLINE_COUNT, total.to_string())], Json(pager)).into_response())
}

async fn list_all(state: &AppState) -> Result<Response, AppError> {
    let productos = state.store.get_all().await?;
    let response: Vec<ProductoDto> = productos.into_iter().map(ProductoDto::from).collect();
    Ok(Json(response).into_response())
}

// GET /productos/{id}
#[instrument(skip(state))]
pub async fn get_producto(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ProductoDto>, AppError> {
    let Path(id) = id?;
    let producto = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;

    Ok(Json(ProductoDto::from(producto)))
}

// POST /productos
#[instrument(skip(state, payload))]
pub async fn create_producto(
    State(state): State<AppState>,
    payload: Result<Json<ProductoAddUpdateDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(mut dto) = payload?;

    let mut uow = state.unit_of_work();
    uow.add(dto.to_entity(0, Utc::now()));
    let producto = uow
        .save()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::validation("No se pudo crear el producto"))?;

    info!(id = producto.id, nombre = %producto.nombre, "Producto created");
    dto.id = Some(producto.id);
    let location = format!("{API_BASE}/productos/{}", producto.id);

    Ok((StatusCode::CREATED, [(http::header::LOCATION, location)], Json(dto)).into_response())
}

// PUT /productos/{id}
#[instrument(skip(state, body))]
pub async fn update_producto(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<ProductoAddUpdateDto>, AppError> {
    let Path(id) = id?;
    let mut dto = parse_optional_body(&body)?
        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;

    let mut uow = state.unit_of_work();
    let existing = uow
        .productos()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;

    uow.update(dto.to_entity(id, existing.fecha_creacion));
    uow.save().await?;

    info!(id, "Producto updated");
    dto.id = Some(id);
    Ok(Json(dto))
}

/// An absent, blank or `null` body is `None`; anything else must be a valid DTO.
fn parse_optional_body(body: &[u8]) -> Result<Option<ProductoAddUpdateDto>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let Json(dto) = Json::<Option<ProductoAddUpdateDto>>::from_bytes(body)?;
    Ok(dto)
}

// DELETE /productos/{id}
#[instrument(skip(state))]
pub async fn delete_producto(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    let mut uow = state.unit_of_work();
    let producto = uow
        .productos()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;

    uow.remove(&producto);
    uow.save().await?;

    info!(id, "Producto deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_null_body_is_missing() {
        assert!(parse_optional_body(b"").unwrap().is_none());
        assert!(parse_optional_body(b"  \n").unwrap().is_none());
        assert!(parse_optional_body(b"null").unwrap().is_none());
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_optional_body(br#"{"nombre":"Pan"}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn valid_body_is_parsed() {
        let body = br#"{"nombre":"Pan","precio":"3","marcaId":1,"categoriaId":2}"#;
        let dto = parse_optional_body(body).unwrap().unwrap();
        assert_eq!(dto.nombre, "Pan");
        assert_eq!(dto.categoria_id, 2);
    }
}
