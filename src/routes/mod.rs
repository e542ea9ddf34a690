// Route definitions

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod api;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/presets/:slug", get(api::get_preset))
        .route("/filter-options", get(api::get_filter_options))
        .route("/views", post(api::open_view))
        .route("/views/:id", get(api::get_view).delete(api::close_view))
        .route("/views/:id/filters", put(api::apply_filters))
        .route("/views/:id/brands", post(api::set_brands))
        .route("/views/:id/categories", post(api::set_categories))
        .route("/views/:id/conditions", post(api::set_conditions))
        .route("/views/:id/price", post(api::set_price))
        .route("/views/:id/sort", post(api::set_sort))
        .route("/views/:id/search", post(api::set_search))
        .route("/views/:id/clear", post(api::clear_filters))
        .route("/views/:id/load-more", post(api::load_more))
        .route("/views/:id/retry", post(api::retry))
        .with_state(app_state);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}
