//! Persistence gateway for the product catalog.
//!
//! Reads go straight to a [`ProductoStore`]; mutations are staged on a
//! [`UnitOfWork`] and only reach the store, all together, on [`UnitOfWork::save`].

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::producto::Producto;

pub use memory::InMemoryProductoStore;
pub use postgres::PgProductoStore;

pub const PRODUCTO_NOT_FOUND: &str = "El producto solicitado no existe";
pub const MISSING_REFERENCE: &str = "La marca o la categoría indicada no existe";

/// A staged mutation, applied on commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Add(Producto),
    Update(Producto),
    Remove(i32),
}

#[async_trait]
pub trait ProductoStore: Send + Sync {
    /// Absence is signalled with `Ok(None)`, not an error.
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Producto>>;

    async fn get_all(&self) -> AppResult<Vec<Producto>>;

    /// Returns the number of matching rows and the requested 1-based page.
    ///
    /// `search` is a lower-cased substring matched against the name. Count
    /// and fetch are separate round-trips: a concurrent write between them
    /// can make the page and the total disagree.
    async fn get_page(
        &self,
        page_index: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> AppResult<(i64, Vec<Producto>)>;

    /// Applies every change atomically. Returns the stored rows for each
    /// `Add`/`Update`, in staging order, with identifiers assigned.
    async fn commit(&self, changes: Vec<Change>) -> AppResult<Vec<Producto>>;
}

/// Request-scoped batch of staged product mutations.
pub struct UnitOfWork {
    store: Arc<dyn ProductoStore>,
    pending: Vec<Change>,
}

impl UnitOfWork {
    pub fn new(store: Arc<dyn ProductoStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    pub fn productos(&self) -> &dyn ProductoStore {
        self.store.as_ref()
    }

    pub fn add(&mut self, producto: Producto) {
        self.pending.push(Change::Add(producto));
    }

    pub fn update(&mut self, producto: Producto) {
        self.pending.push(Change::Update(producto));
    }

    pub fn remove(&mut self, producto: &Producto) {
        self.pending.push(Change::Remove(producto.id));
    }

    pub fn pending(&self) -> &[Change] {
        &self.pending
    }

    /// Commits and clears the staged changes. On failure nothing is applied
    /// and the staged changes are dropped.
    pub async fn save(&mut self) -> AppResult<Vec<Producto>> {
        let changes = std::mem::take(&mut self.pending);
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(changes = changes.len(), "Committing unit of work");
        self.store.commit(changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::producto::{Categoria, Marca};
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn nuevo(nombre: &str) -> Producto {
        Producto {
            id: 0,
            nombre: nombre.to_string(),
            precio: BigDecimal::from(10),
            marca_id: 1,
            marca: None,
            categoria_id: 1,
            categoria: None,
            fecha_creacion: Utc::now(),
        }
    }

    async fn seeded() -> Arc<InMemoryProductoStore> {
        let store = InMemoryProductoStore::new();
        store.insert_marca(Marca { id: 1, nombre: "Alpura".into() }).await;
        store.insert_categoria(Categoria { id: 1, nombre: "Lácteos".into() }).await;
        Arc::new(store)
    }

    #[tokio::test]
    async fn staged_changes_are_invisible_until_save() {
        let store = seeded().await;
        let mut uow = UnitOfWork::new(store.clone());

        uow.add(nuevo("Leche"));
        assert_eq!(uow.pending().len(), 1);
        assert!(store.get_all().await.unwrap().is_empty());

        let saved = uow.save().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].id > 0);
        assert!(uow.pending().is_empty());
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_with_nothing_staged_is_a_no_op() {
        let store = seeded().await;
        let mut uow = UnitOfWork::new(store);
        assert!(uow.save().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_save_applies_nothing() {
        let store = seeded().await;
        let mut uow = UnitOfWork::new(store.clone());

        uow.add(nuevo("Leche"));
        let mut huerfano = nuevo("Pan");
        huerfano.marca_id = 42;
        uow.add(huerfano);

        assert!(uow.save().await.is_err());
        assert!(uow.pending().is_empty());
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
