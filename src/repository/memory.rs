use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Change, ProductoStore, MISSING_REFERENCE, PRODUCTO_NOT_FOUND};
use crate::dtos::pager::page_offset;
use crate::error::{AppError, AppResult};
use crate::models::producto::{Categoria, Marca, Producto};

#[derive(Debug, Default, Clone)]
struct Tables {
    marcas: BTreeMap<i32, Marca>,
    categorias: BTreeMap<i32, Categoria>,
    productos: BTreeMap<i32, Producto>,
    last_id: i32,
}

impl Tables {
    /// Attaches brand and category, the way the joined SQL query does.
    fn hydrate(&self, producto: &Producto) -> Producto {
        Producto {
            marca: self.marcas.get(&producto.marca_id).cloned(),
            categoria: self.categorias.get(&producto.categoria_id).cloned(),
            ..producto.clone()
        }
    }

    fn check_references(&self, producto: &Producto) -> AppResult<()> {
        if self.marcas.contains_key(&producto.marca_id)
            && self.categorias.contains_key(&producto.categoria_id)
        {
            Ok(())
        } else {
            Err(AppError::validation(MISSING_REFERENCE))
        }
    }

    fn detach(mut producto: Producto) -> Producto {
        producto.marca = None;
        producto.categoria = None;
        producto
    }
}

/// In-memory implementation of [`ProductoStore`] (for development/testing).
///
/// Commits apply to a copy of the tables which replaces the original only
/// when every change succeeded, so a failed commit leaves no trace.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductoStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryProductoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_marca(&self, marca: Marca) {
        self.tables.write().await.marcas.insert(marca.id, marca);
    }

    pub async fn insert_categoria(&self, categoria: Categoria) {
        self.tables
            .write()
            .await
            .categorias
            .insert(categoria.id, categoria);
    }
}

#[async_trait]
impl ProductoStore for InMemoryProductoStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Producto>> {
        let tables = self.tables.read().await;
        Ok(tables.productos.get(&id).map(|p| tables.hydrate(p)))
    }

    async fn get_all(&self) -> AppResult<Vec<Producto>> {
        let tables = self.tables.read().await;
        Ok(tables.productos.values().map(|p| tables.hydrate(p)).collect())
    }

    async fn get_page(
        &self,
        page_index: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> AppResult<(i64, Vec<Producto>)> {
        let tables = self.tables.read().await;
        let needle = search.map(str::to_lowercase);

        let matching: Vec<&Producto> = tables
            .productos
            .values()
            .filter(|p| match &needle {
                Some(needle) => p.nombre.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len() as i64;
        let skip = usize::try_from(page_offset(page_index, page_size)).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .map(|p| tables.hydrate(p))
            .collect();

        Ok((total, page))
    }

    async fn commit(&self, changes: Vec<Change>) -> AppResult<Vec<Producto>> {
        let mut guard = self.tables.write().await;
        let mut staged = guard.clone();
        let mut touched = Vec::new();

        for change in changes {
            match change {
                Change::Add(producto) => {
                    staged.check_references(&producto)?;
                    staged.last_id += 1;
                    let id = staged.last_id;
                    staged.productos.insert(
                        id,
                        Tables::detach(Producto { id, ..producto }),
                    );
                    touched.push(id);
                }
                Change::Update(producto) => {
                    staged.check_references(&producto)?;
                    let existing = staged
                        .productos
                        .get_mut(&producto.id)
                        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;
                    existing.nombre = producto.nombre;
                    existing.precio = producto.precio;
                    existing.marca_id = producto.marca_id;
                    existing.categoria_id = producto.categoria_id;
                    touched.push(producto.id);
                }
                Change::Remove(id) => {
                    staged
                        .productos
                        .remove(&id)
                        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;
                }
            }
        }

        let persisted = touched
            .iter()
            .filter_map(|id| staged.productos.get(id).map(|p| staged.hydrate(p)))
            .collect();

        *guard = staged;
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn producto(nombre: &str) -> Producto {
        Producto {
            id: 0,
            nombre: nombre.to_string(),
            precio: BigDecimal::from(1),
            marca_id: 1,
            marca: None,
            categoria_id: 1,
            categoria: None,
            fecha_creacion: Utc::now(),
        }
    }

    async fn store_with(nombres: &[&str]) -> InMemoryProductoStore {
        let store = InMemoryProductoStore::new();
        store.insert_marca(Marca { id: 1, nombre: "Alpura".into() }).await;
        store.insert_categoria(Categoria { id: 1, nombre: "Lácteos".into() }).await;
        let changes = nombres.iter().map(|n| Change::Add(producto(n))).collect();
        store.commit(changes).await.unwrap();
        store
    }

    #[tokio::test]
    async fn assigns_sequential_ids_and_hydrates_references() {
        let store = store_with(&["Leche", "Pan"]).await;
        let all = store.get_all().await.unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(all[0].marca.as_ref().unwrap().nombre, "Alpura");
        assert_eq!(all[1].categoria.as_ref().unwrap().nombre, "Lácteos");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = store_with(&["Leche", "Pan", "LECHE deslactosada"]).await;
        let (total, page) = store.get_page(1, 10, Some("le")).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|p| p.nombre.to_lowercase().contains("le")));
    }

    #[tokio::test]
    async fn pages_are_ordered_by_id() {
        let store = store_with(&["a", "b", "c", "d", "e"]).await;
        let (total, page) = store.get_page(2, 2, None).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.iter().map(|p| p.nombre.as_str()).collect::<Vec<_>>(), vec!["c", "d"]);

        let (total, page) = store.get_page(4, 2, None).await.unwrap();
        assert_eq!(total, 5);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn update_preserves_creation_time() {
        let store = store_with(&["Leche"]).await;
        let original = store.get_by_id(1).await.unwrap().unwrap();

        let mut cambio = producto("Leche entera");
        cambio.id = 1;
        let saved = store.commit(vec![Change::Update(cambio)]).await.unwrap();

        assert_eq!(saved[0].nombre, "Leche entera");
        assert_eq!(saved[0].fecha_creacion, original.fecha_creacion);
    }

    #[tokio::test]
    async fn removing_missing_row_fails_without_side_effects() {
        let store = store_with(&["Leche"]).await;
        let result = store
            .commit(vec![Change::Remove(1), Change::Remove(99)])
            .await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == PRODUCTO_NOT_FOUND));
        assert!(store.get_by_id(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let store = store_with(&[]).await;
        let mut p = producto("Queso");
        p.categoria_id = 9;
        let result = store.commit(vec![Change::Add(p)]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
