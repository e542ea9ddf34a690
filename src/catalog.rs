// Catalogue backend access: query construction and the HTTP client for `/products`

use crate::{
    config::Settings,
    error::FetchError,
    models::{FilterOptions, FilterState, PresetConfig, Product, SortKey, ViewKind},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    Client, Proxy,
    header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA},
};
use serde::Deserialize;

/// Everything the backend needs to serve one page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sort: SortKey,
    pub page: u32,
    pub limit: u32,
    pub brands: Vec<String>,
    pub conditions: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn build(filters: &FilterState, sort: SortKey, page: u32, limit: u32, preset: &PresetConfig) -> Self {
        let category = match preset.server_category().filter(|c| !c.is_empty()) {
            Some(server) => Some(server.to_string()),
            // Shop views have no pinned category; forward the user's selection instead
            None if preset.view_kind() == ViewKind::Shop && !filters.categories.is_empty() => {
                Some(join_csv(filters.categories.iter()))
            }
            None => None,
        };

        Self {
            category,
            sort,
            page,
            limit,
            brands: filters.brands.iter().cloned().collect(),
            conditions: filters.conditions.iter().cloned().collect(),
            min_price: filters.min_price,
            max_price: filters.max_price,
            search: filters.search_term().map(str::to_string),
        }
    }

    /// Query-string pairs in wire order. Empty constraints are left out entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs.push(("sort", self.sort.as_str().to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        if !self.brands.is_empty() {
            pairs.push(("brand", join_csv(self.brands.iter())));
        }
        if !self.conditions.is_empty() {
            pairs.push(("condition", join_csv(self.conditions.iter())));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", format_price(min)));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", format_price(max)));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

fn join_csv<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(",")
}

// 20000.0 -> "20000", 199.5 -> "199.5"
fn format_price(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Source of products and filter options for the discovery engine.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// One page of products. Never retries on its own.
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError>;

    /// Facet values the backend knows for a category (all categories when `None`).
    async fn fetch_filter_options(&self, category: Option<&str>) -> Result<FilterOptions, FetchError>;
}

// --- Wire envelopes ---

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    success: bool,
    products: Option<Vec<Product>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FiltersEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(flatten)]
    options: FilterOptions,
    message: Option<String>,
}

/// reqwest-backed catalogue client.
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(build_client(settings)?, settings.catalog_base_url.clone()))
    }

    async fn get_bytes(&self, path: &str, query: &[(&'static str, String)]) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?query, "Requesting catalogue");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Catalogue returned an error status");
            return Err(FetchError::Network(format!("backend returned {}", status)));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Shared reqwest client: configured proxy, user agent, and request timeout.
/// Every request bypasses HTTP caches so a filter change always reaches the backend.
pub fn build_client(settings: &Settings) -> anyhow::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    let mut builder = Client::builder()
        .user_agent(settings.user_agent.clone())
        .default_headers(headers)
        .timeout(settings.fetch_timeout());

    if let Some(proxy_url) = settings.proxy_url.as_deref().filter(|u| !u.is_empty()) {
        let proxy = Proxy::all(proxy_url).context("Invalid proxy_url")?;
        builder = builder.proxy(proxy);
        tracing::info!("Catalogue client will use the configured proxy.");
    }

    builder.build().context("Failed to build catalogue HTTP client")
}

#[async_trait]
impl CatalogBackend for HttpCatalog {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError> {
        let body = self.get_bytes("/products", &query.to_pairs()).await?;
        parse_products(&body)
    }

    async fn fetch_filter_options(&self, category: Option<&str>) -> Result<FilterOptions, FetchError> {
        let query: Vec<(&'static str, String)> = category.map(|c| ("category", c.to_string())).into_iter().collect();
        let body = self.get_bytes("/products/filters", &query).await?;

        let envelope: FiltersEnvelope = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Protocol(format!("malformed filters body: {}", e)))?;
        if !envelope.success {
            return Err(FetchError::Protocol(
                envelope.message.unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        Ok(envelope.options)
    }
}

// `{success: true, products: [...]}` or a protocol error
fn parse_products(body: &[u8]) -> Result<Vec<Product>, FetchError> {
    let envelope: ProductsEnvelope = serde_json::from_slice(body)
        .map_err(|e| FetchError::Protocol(format!("malformed products body: {}", e)))?;

    if !envelope.success {
        let reason = envelope.message.unwrap_or_else(|| "backend reported failure".to_string());
        return Err(FetchError::Protocol(reason));
    }
    envelope
        .products
        .ok_or_else(|| FetchError::Protocol("response has no products field".to_string()))
}
