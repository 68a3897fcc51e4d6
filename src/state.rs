use std::sync::Arc;

use crate::config::Config;
use crate::repository::{ProductoStore, UnitOfWork};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductoStore>,
    pub jwt_secret: Arc<str>,
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductoStore>, config: &Config) -> Self {
        Self::with_settings(store, &config.jwt_secret, config.max_page_size)
    }

    pub fn with_settings(store: Arc<dyn ProductoStore>, jwt_secret: &str, max_page_size: u32) -> Self {
        Self {
            store,
            jwt_secret: Arc::from(jwt_secret),
            max_page_size,
        }
    }

    /// Fresh unit of work for a single request.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.store.clone())
    }
}
