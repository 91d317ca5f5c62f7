//! Shared application state for all routes. Built once at startup.

use crate::config::SchemaRegistry;
use crate::service::RowService;
use crate::store::RowStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SchemaRegistry>,
    pub store: Arc<dyn RowStore>,
}

impl AppState {
    pub fn new(registry: SchemaRegistry, store: Arc<dyn RowStore>) -> Self {
        AppState {
            registry: Arc::new(registry),
            store,
        }
    }

    pub fn rows(&self) -> RowService<'_> {
        RowService::new(&self.registry, self.store.as_ref())
    }
}
