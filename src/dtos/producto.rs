// src/dtos/producto.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::producto::Producto;

/// Row of the paged listing, with brand and category names flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoListDto {
    pub id: i32,
    pub nombre: String,
    pub precio: BigDecimal,
    pub fecha_creacion: DateTime<Utc>,
    pub marca_id: i32,
    pub marca: String,
    pub categoria_id: i32,
    pub categoria: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarcaDto {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriaDto {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoDto {
    pub id: i32,
    pub nombre: String,
    pub precio: BigDecimal,
    pub fecha_creacion: DateTime<Utc>,
    pub marca: MarcaDto,
    pub categoria: CategoriaDto,
}

/// Request body for create and update. `id` is ignored on input and echoed
/// back once the store has assigned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoAddUpdateDto {
    #[serde(default)]
    pub id: Option<i32>,
    pub nombre: String,
    pub precio: BigDecimal,
    pub marca_id: i32,
    pub categoria_id: i32,
}

impl ProductoAddUpdateDto {
    /// Builds the entity to stage. Server-assigned fields come from the caller.
    pub fn to_entity(&self, id: i32, fecha_creacion: DateTime<Utc>) -> Producto {
        Producto {
            id,
            nombre: self.nombre.clone(),
            precio: self.precio.clone(),
            marca_id: self.marca_id,
            marca: None,
            categoria_id: self.categoria_id,
            categoria: None,
            fecha_creacion,
        }
    }
}

// Convert from Model to list DTO
impl From<Producto> for ProductoListDto {
    fn from(producto: Producto) -> Self {
        Self {
            id: producto.id,
            nombre: producto.nombre,
            precio: producto.precio,
            fecha_creacion: producto.fecha_creacion,
            marca_id: producto.marca_id,
            marca: producto.marca.map(|m| m.nombre).unwrap_or_default(),
            categoria_id: producto.categoria_id,
            categoria: producto.categoria.map(|c| c.nombre).unwrap_or_default(),
        }
    }
}

// Convert from Model to detail DTO
impl From<Producto> for ProductoDto {
    fn from(producto: Producto) -> Self {
        Self {
            id: producto.id,
            nombre: producto.nombre,
            precio: producto.precio,
            fecha_creacion: producto.fecha_creacion,
            marca: MarcaDto {
                id: producto.marca_id,
                nombre: producto.marca.map(|m| m.nombre).unwrap_or_default(),
            },
            categoria: CategoriaDto {
                id: producto.categoria_id,
                nombre: producto.categoria.map(|c| c.nombre).unwrap_or_default(),
            },
        }
    }
}
