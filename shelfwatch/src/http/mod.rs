//! HTTP surface: shared state, route table and middleware.

pub mod clock_in_routes;
pub mod extract;
pub mod items_routes;

use std::{path::Path, sync::Arc};

use axum::Router;
use shelfwatch_core::store::DocumentStore;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::services::{ClockInService, ItemService};
use clock_in_routes::clock_in_routes;
use items_routes::item_routes;

// ==================
// Shared State
// ==================

#[derive(Debug, Clone)]
pub struct AppState {
    pub items: ItemService,
    pub clock_ins: ClockInService,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            items: ItemService::new(store.clone()),
            clock_ins: ClockInService::new(store),
        }
    }
}

/// Builds the full application router.
///
/// `GET /` serves `index.html` from `static_dir`; everything else in the
/// directory is served under `/static`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(item_routes())
        .merge(clock_in_routes())
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        // Any origin, method and header
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
