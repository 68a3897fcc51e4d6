use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq)]
pub struct Marca {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Categoria {
    pub id: i32,
    pub nombre: String,
}

/// Catalog product. `marca` and `categoria` are only populated when the
/// row is loaded from the store; staged entities carry the foreign keys alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Producto {
    pub id: i32,
    pub nombre: String,
    pub precio: BigDecimal,
    pub marca_id: i32,
    pub marca: Option<Marca>,
    pub categoria_id: i32,
    pub categoria: Option<Categoria>,
    pub fecha_creacion: DateTime<Utc>,
}

/// Flat row shape returned by the joined product queries.
#[derive(Debug, FromRow)]
pub struct ProductoRow {
    pub id: i32,
    pub nombre: String,
    pub precio: BigDecimal,
    pub marca_id: i32,
    pub marca_nombre: String,
    pub categoria_id: i32,
    pub categoria_nombre: String,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<ProductoRow> for Producto {
    fn from(row: ProductoRow) -> Self {
        Self {
            id: row.id,
            nombre: row.nombre,
            precio: row.precio,
            marca_id: row.marca_id,
            marca: Some(Marca {
                id: row.marca_id,
                nombre: row.marca_nombre,
            }),
            categoria_id: row.categoria_id,
            categoria: Some(Categoria {
                id: row.categoria_id,
                nombre: row.categoria_nombre,
            }),
            fecha_creacion: row.fecha_creacion,
        }
    }
}
