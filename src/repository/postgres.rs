// src/repository/postgres.rs
use async_trait::async_trait;
use sqlx::{Error as SqlxError, PgPool};
use tracing::{error, instrument};

use super::{Change, ProductoStore, MISSING_REFERENCE, PRODUCTO_NOT_FOUND};
use crate::dtos::pager::page_offset;
use crate::error::{AppError, AppResult};
use crate::models::producto::{Producto, ProductoRow};

macro_rules! select_productos {
    () => {
        "SELECT p.id, p.nombre, p.precio,
                p.marca_id, m.nombre AS marca_nombre,
                p.categoria_id, c.nombre AS categoria_nombre,
                p.fecha_creacion
         FROM productos p
         JOIN marcas m ON m.id = p.marca_id
         JOIN categorias c ON c.id = p.categoria_id"
    };
}

// strpos instead of LIKE so '%' and '_' in the search term match literally
const SEARCH_FILTER: &str = "($1::TEXT IS NULL OR strpos(lower(p.nombre), $1) > 0)";

fn map_reference_violation(err: SqlxError) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            AppError::validation(MISSING_REFERENCE)
        }
        other => other.into(),
    }
}

/// Store backed by the Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgProductoStore {
    pool: PgPool,
}

impl PgProductoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductoStore for PgProductoStore {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Producto>> {
        let row = sqlx::query_as::<_, ProductoRow>(concat!(select_productos!(), " WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Producto::from))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> AppResult<Vec<Producto>> {
        let rows = sqlx::query_as::<_, ProductoRow>(concat!(select_productos!(), " ORDER BY p.id"))
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| error!(?e, "Failed to fetch productos"))?;

        Ok(rows.into_iter().map(Producto::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_page(
        &self,
        page_index: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> AppResult<(i64, Vec<Producto>)> {
        let count_sql = format!("SELECT COUNT(*) FROM productos p WHERE {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(search)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "{} WHERE {SEARCH_FILTER} ORDER BY p.id LIMIT $2 OFFSET $3",
            select_productos!()
        );
        let rows = sqlx::query_as::<_, ProductoRow>(&page_sql)
            .bind(search)
            .bind(i64::from(page_size))
            .bind(page_offset(page_index, page_size))
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| error!(?e, "Failed to fetch productos page"))?;

        Ok((total, rows.into_iter().map(Producto::from).collect()))
    }

    #[instrument(skip(self, changes), fields(changes = changes.len()))]
    async fn commit(&self, changes: Vec<Change>) -> AppResult<Vec<Producto>> {
        let mut tx = self.pool.begin().await?;
        let mut touched = Vec::new();

        for change in changes {
            match change {
                Change::Add(producto) => {
                    let id: i32 = sqlx::query_scalar(
                        "INSERT INTO productos (nombre, precio, marca_id, categoria_id, fecha_creacion)
                         VALUES ($1, $2, $3, $4, $5) RETURNING id",
                    )
                    .bind(producto.nombre)
                    .bind(producto.precio)
                    .bind(producto.marca_id)
                    .bind(producto.categoria_id)
                    .bind(producto.fecha_creacion)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_reference_violation)?;
                    touched.push(id);
                }
                Change::Update(producto) => {
                    let id = producto.id;
                    let result = sqlx::query(
                        "UPDATE productos SET
                         nombre = $1, precio = $2, marca_id = $3, categoria_id = $4
                         WHERE id = $5",
                    )
                    .bind(producto.nombre)
                    .bind(producto.precio)
                    .bind(producto.marca_id)
                    .bind(producto.categoria_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_reference_violation)?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(PRODUCTO_NOT_FOUND));
                    }
                    touched.push(id);
                }
                Change::Remove(id) => {
                    let result = sqlx::query("DELETE FROM productos WHERE id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(PRODUCTO_NOT_FOUND));
                    }
                }
            }
        }

        let mut persisted = Vec::with_capacity(touched.len());
        for id in touched {
            let row = sqlx::query_as::<_, ProductoRow>(concat!(select_productos!(), " WHERE p.id = $1"))
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            persisted.push(Producto::from(row));
        }

        tx.commit().await?;
        Ok(persisted)
    }
}
