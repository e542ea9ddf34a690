#![allow(dead_code)]

use async_trait::async_trait;
use std::{collections::HashMap, net::SocketAddr, sync::Mutex, time::Duration};
use storefront_discovery::{
    catalog::{CatalogBackend, ProductQuery},
    config::Settings,
    error::FetchError,
    models::{FilterOptions, PriceRange, Product, SortKey},
};

pub fn product(id: &str, brand: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("{brand} {id}"),
        brand: Some(brand.to_string()),
        category: Some("Bags".to_string()),
        condition: Some("Excellent".to_string()),
        final_price: Some(price),
        original_price: None,
        created_at: None,
        images: vec![],
        views: 0,
        likes: 0,
    }
}

pub fn catalogue(n: usize) -> Vec<Product> {
    let brands = ["Chanel", "Gucci", "Hermes", "Prada"];
    (0..n)
        .map(|i| product(&format!("p{i}"), brands[i % brands.len()], 5000.0 * (i as f64 + 1.0)))
        .collect()
}

pub fn settings(catalog_base_url: &str) -> Settings {
    Settings {
        server_address: "127.0.0.1:0".to_string(),
        catalog_base_url: catalog_base_url.to_string(),
        page_size: 12,
        fetch_timeout_secs: 15,
        view_idle_secs: 1800,
        proxy_url: None,
        user_agent: "storefront-discovery-tests".to_string(),
    }
}

/// In-memory backend: filters by brand and price ceiling, pages by `page`/`limit`.
#[derive(Default)]
pub struct FakeCatalog {
    pub products: Vec<Product>,
    pub delays: HashMap<SortKey, Duration>,
    pub failing: Mutex<bool>,
    pub queries: Mutex<Vec<ProductQuery>>,
}

impl FakeCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Default::default()
        }
    }

    pub fn delay(mut self, sort: SortKey, delay: Duration) -> Self {
        self.delays.insert(sort, delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn recorded(&self) -> Vec<ProductQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogBackend for FakeCatalog {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delays.get(&query.sort) {
            tokio::time::sleep(*delay).await;
        }
        if *self.failing.lock().unwrap() {
            return Err(FetchError::Protocol("backend reported failure".to_string()));
        }

        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| query.brands.is_empty() || p.brand.as_ref().is_some_and(|b| query.brands.contains(b)))
            .filter(|p| query.max_price.is_none_or(|max| p.effective_price() <= max))
            .cloned()
            .collect();
        let skip = ((query.page - 1) * query.limit) as usize;
        Ok(matching.into_iter().skip(skip).take(query.limit as usize).collect())
    }

    async fn fetch_filter_options(&self, _category: Option<&str>) -> Result<FilterOptions, FetchError> {
        Ok(FilterOptions {
            brands: vec!["Chanel".to_string(), "Gucci".to_string()],
            conditions: vec!["Excellent".to_string()],
            price_range: PriceRange { min: 5000.0, max: 100000.0 },
        })
    }
}

pub async fn serve(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}
