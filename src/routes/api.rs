// Handlers for the host-facing discovery API

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{FilterOptions, FilterState, PresetConfig, SortKey},
    presets,
    session::{DiscoveryState, DiscoverySession, FetchRequest},
};

// --- Request / Response Structs ---

#[derive(Deserialize, Debug)]
pub struct OpenViewRequest {
    slug: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenViewResponse {
    view_id: Uuid,
    state: DiscoveryState,
    // Backend-provided facets; absent when that lookup failed
    filter_options: Option<FilterOptions>,
}

#[derive(Deserialize, Debug)]
pub struct ValuesBody {
    #[serde(default)]
    values: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PriceBody {
    min_price: Option<f64>,
    max_price: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SortBody {
    sort_by: SortKey,
}

#[derive(Deserialize, Debug)]
pub struct SearchBody {
    #[serde(default)]
    search: String,
}

#[derive(Deserialize, Debug)]
pub struct FilterOptionsQuery {
    category: Option<String>,
}

// Runs an action against an open view and returns the resulting state
async fn act<F>(app_state: &AppState, view_id: Uuid, action: F) -> AppResult<Json<DiscoveryState>>
where
    F: FnOnce(&mut DiscoverySession) -> Option<FetchRequest>,
{
    let session = app_state
        .views
        .get(&view_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open view with id {}", view_id)))?;

    if app_state.coordinator.dispatch(&session, action).await.is_none() {
        tracing::debug!(%view_id, "Action was a no-op");
    }
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

// --- API Handlers ---

pub async fn get_preset(Path(slug): Path<String>) -> Json<PresetConfig> {
    Json(presets::resolve(&slug))
}

pub async fn get_filter_options(
    State(app_state): State<AppState>,
    Query(query): Query<FilterOptionsQuery>,
) -> AppResult<Json<FilterOptions>> {
    tracing::info!("API call: get_filter_options for category: {:?}", query.category);
    let options = app_state
        .coordinator
        .filter_options(query.category.as_deref())
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(options))
}

pub async fn open_view(
    State(app_state): State<AppState>,
    Json(request): Json<OpenViewRequest>,
) -> impl IntoResponse {
    let preset = presets::resolve(&request.slug);
    let category = preset.server_category().map(str::to_string);
    let session = Arc::new(Mutex::new(DiscoverySession::new(preset, app_state.settings.page_size)));
    let view_id = app_state.views.insert(session.clone()).await;
    let open_views = app_state.views.len().await;
    tracing::info!(%view_id, slug = %request.slug, open_views, "Opening view");

    // First page and backend facets are independent; fetch both at once
    let coordinator = &app_state.coordinator;
    let (_, options) = futures::future::join(
        coordinator.dispatch(&session, |s| Some(s.fetch_fresh())),
        coordinator.filter_options(category.as_deref()),
    )
    .await;

    let filter_options = match options {
        Ok(options) => Some(options),
        Err(e) => {
            tracing::warn!(%view_id, error = %e, "Filter options unavailable");
            None
        }
    };

    let state = session.lock().await.snapshot();
    (
        StatusCode::CREATED,
        Json(OpenViewResponse {
            view_id,
            state,
            filter_options,
        }),
    )
}

pub async fn get_view(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> AppResult<Json<DiscoveryState>> {
    act(&app_state, view_id, |_| None).await
}

pub async fn apply_filters(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(filters): Json<FilterState>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, ?filters, "API call: apply_filters");
    act(&app_state, view_id, |s| Some(s.apply_filters(filters))).await
}

pub async fn set_brands(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<ValuesBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, brands = ?body.values, "API call: set_brands");
    act(&app_state, view_id, |s| Some(s.set_brand_filter(body.values))).await
}

pub async fn set_categories(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<ValuesBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, categories = ?body.values, "API call: set_categories");
    act(&app_state, view_id, |s| Some(s.set_category_filter(body.values))).await
}

pub async fn set_conditions(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<ValuesBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, conditions = ?body.values, "API call: set_conditions");
    act(&app_state, view_id, |s| Some(s.set_condition_filter(body.values))).await
}

pub async fn set_price(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<PriceBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, min = ?body.min_price, max = ?body.max_price, "API call: set_price");
    act(&app_state, view_id, |s| Some(s.set_price_range(body.min_price, body.max_price))).await
}

pub async fn set_sort(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<SortBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, sort = body.sort_by.as_str(), "API call: set_sort");
    act(&app_state, view_id, |s| Some(s.set_sort(body.sort_by))).await
}

pub async fn set_search(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Json(body): Json<SearchBody>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, search = %body.search, "API call: set_search");
    act(&app_state, view_id, |s| Some(s.set_search(body.search))).await
}

pub async fn clear_filters(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, "API call: clear_filters");
    act(&app_state, view_id, |s| Some(s.clear_filters())).await
}

pub async fn load_more(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::debug!(%view_id, "API call: load_more");
    act(&app_state, view_id, |s| s.load_more()).await
}

pub async fn retry(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> AppResult<Json<DiscoveryState>> {
    tracing::info!(%view_id, "API call: retry");
    act(&app_state, view_id, |s| Some(s.retry())).await
}

pub async fn close_view(
    State(app_state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if app_state.views.close(&view_id).await {
        tracing::info!(%view_id, "View closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No open view with id {}", view_id)))
    }
}
