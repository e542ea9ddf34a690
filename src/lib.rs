// Product discovery engine for the resale storefront, plus the JSON surface the
// storefront's views drive it through.

use axum::extract::FromRef;
use std::sync::Arc;

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod facets;
pub mod models;
pub mod pagination;
pub mod presets;
pub mod refine;
pub mod routes;
pub mod session;
pub mod views;

#[cfg(test)]
mod test_support;

use crate::{catalog::CatalogBackend, config::Settings, coordinator::FetchCoordinator, views::ViewRegistry};

// Shared application state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub coordinator: Arc<FetchCoordinator>,
    pub views: ViewRegistry,
}

impl AppState {
    pub fn new(settings: Settings, backend: Arc<dyn CatalogBackend>) -> Self {
        let coordinator = FetchCoordinator::new(backend, settings.fetch_timeout());
        Self {
            settings: Arc::new(settings),
            coordinator: Arc::new(coordinator),
            views: ViewRegistry::default(),
        }
    }
}
