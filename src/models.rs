// Data structures shared by the discovery engine, the catalogue client and the routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// A product as served by the catalogue backend (read-only for us)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")] // Backend documents may still carry the Mongo-style key
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub final_price: Option<f64>,
    pub original_price: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

impl Product {
    /// Price used for filtering and sorting; a missing price reads as zero.
    pub fn effective_price(&self) -> f64 {
        self.final_price.unwrap_or(0.0)
    }

    /// Creation time in milliseconds; a missing timestamp reads as the epoch.
    pub fn created_millis(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }
}

// The canonical filter selection of a view.
// Empty sets / None mean "unconstrained"; fields are deliberately independent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub brands: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub conditions: BTreeSet<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: String,
}

impl FilterState {
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "alphabetical-az")]
    AlphabeticalAz,
    #[serde(rename = "alphabetical-za")]
    AlphabeticalZa,
}

impl SortKey {
    // Value sent in the `sort` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::AlphabeticalAz => "alphabetical-az",
            SortKey::AlphabeticalZa => "alphabetical-za",
        }
    }
}

// One page of products as received from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<Product>,
    pub page_number: u32,
    pub requested_limit: u32,
    pub received_count: u32,
}

impl ResultPage {
    pub fn new(items: Vec<Product>, page_number: u32, requested_limit: u32) -> Self {
        let received_count = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Self {
            items,
            page_number,
            requested_limit,
            received_count,
        }
    }

    /// "Exact page size" heuristic: a full page suggests there may be another one.
    pub fn has_more(&self) -> bool {
        self.received_count == self.requested_limit
    }
}

// Which server-side selector a preset pins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum PresetSelector {
    Category(String),
    MaxPrice(Option<f64>), // None for the "all" tier
}

// Category pages pin one server category; shop pages (budget tiers) browse across categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    Category,
    Shop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub banner: String,
    pub selector: PresetSelector,
    pub features: Vec<String>,
    pub seo_keywords: Vec<String>,
}

impl PresetConfig {
    pub fn view_kind(&self) -> ViewKind {
        match self.selector {
            PresetSelector::Category(_) => ViewKind::Category,
            PresetSelector::MaxPrice(_) => ViewKind::Shop,
        }
    }

    pub fn server_category(&self) -> Option<&str> {
        match &self.selector {
            PresetSelector::Category(name) => Some(name.as_str()),
            PresetSelector::MaxPrice(_) => None,
        }
    }

    /// Filter selection a view starts from (and returns to on "clear filters").
    pub fn default_filters(&self) -> FilterState {
        let max_price = match self.selector {
            PresetSelector::MaxPrice(ceiling) => ceiling,
            PresetSelector::Category(_) => None,
        };
        FilterState {
            max_price,
            ..FilterState::default()
        }
    }
}

// Facet values offered to the user, derived from page 1 of a fresh fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FacetSet {
    pub brands: Vec<String>,
    pub conditions: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

// Richer facet source served by `GET /products/filters`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub price_range: PriceRange,
}
