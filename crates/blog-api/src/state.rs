//! Shared application state for the REST API server.

use std::sync::Arc;

use blog_core::{BlogServices, BlogStore, MemoryStore};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Post, comment, and like services over one store.
    pub services: BlogServices,
}

impl AppState {
    /// Create state whose services run against `store`.
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self {
            services: BlogServices::new(store),
        }
    }

    /// Create state backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
