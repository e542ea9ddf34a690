// Per-view discovery state. All transitions are synchronous; the only suspension
// points live in the fetch coordinator, which hands results back through `complete`.

use crate::{
    catalog::ProductQuery,
    error::FetchError,
    facets,
    models::{FacetSet, FilterState, PresetConfig, Product, ResultPage, SortKey},
    pagination::Pagination,
    refine,
};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Fresh,
    LoadMore,
}

/// A fetch the session wants issued, tagged with the epoch it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub kind: FetchKind,
    pub query: ProductQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer fresh fetch was issued since; the result was dropped.
    Stale,
    /// The view was closed; the result was dropped.
    Closed,
}

/// State handed to the host view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryState {
    pub products: Vec<Product>,
    pub loaded_count: usize,
    pub loading: bool,
    pub loading_more: bool,
    pub page: u32,
    pub has_more: bool,
    pub filters: FilterState,
    pub sort_by: SortKey,
    pub error: Option<String>,
    pub facets: FacetSet,
    pub preset: PresetConfig,
}

#[derive(Debug)]
pub struct DiscoverySession {
    preset: PresetConfig,
    limit: u32,
    filters: FilterState,
    sort: SortKey,
    products: Vec<Product>,
    facets: FacetSet,
    pagination: Pagination,
    loading: bool,
    error: Option<String>,
    epoch: u64,
    closed: bool,
}

impl DiscoverySession {
    /// A view session seeded with the preset's default filters. Nothing is loaded
    /// until the first `fetch_fresh`.
    pub fn new(preset: PresetConfig, limit: u32) -> Self {
        Self {
            filters: preset.default_filters(),
            preset,
            limit: limit.max(1),
            sort: SortKey::default(),
            products: Vec::new(),
            facets: FacetSet::default(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
            epoch: 0,
            closed: false,
        }
    }

    pub fn preset(&self) -> &PresetConfig {
        &self.preset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Every product received so far, unrefined.
    pub fn loaded(&self) -> &[Product] {
        &self.products
    }

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.pagination.is_loading_more()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The refined and sorted list the host renders.
    pub fn visible(&self) -> Vec<&Product> {
        refine::visible(&self.filters, self.sort, &self.products, self.preset.view_kind())
    }

    pub fn snapshot(&self) -> DiscoveryState {
        DiscoveryState {
            products: self.visible().into_iter().cloned().collect(),
            loaded_count: self.products.len(),
            loading: self.loading,
            loading_more: self.pagination.is_loading_more(),
            page: self.pagination.page(),
            has_more: self.pagination.has_more(),
            filters: self.filters.clone(),
            sort_by: self.sort,
            error: self.error.clone(),
            facets: self.facets.clone(),
            preset: self.preset.clone(),
        }
    }

    // --- Actions ---

    /// Starts a fresh fetch: new epoch, page 1, accumulated items discarded.
    /// Facets stay as they are until the new first page lands.
    pub fn fetch_fresh(&mut self) -> FetchRequest {
        self.epoch += 1;
        self.products.clear();
        self.pagination.reset();
        self.loading = true;
        self.error = None;

        tracing::debug!(epoch = self.epoch, slug = %self.preset.slug, "Issuing fresh fetch");
        FetchRequest {
            epoch: self.epoch,
            kind: FetchKind::Fresh,
            query: self.query_for(1),
        }
    }

    /// Replaces the whole selection and refetches.
    pub fn apply_filters(&mut self, filters: FilterState) -> FetchRequest {
        self.filters = filters;
        self.fetch_fresh()
    }

    pub fn set_brand_filter(&mut self, brands: impl IntoIterator<Item = String>) -> FetchRequest {
        self.filters.brands = collect_selection(brands);
        self.fetch_fresh()
    }

    pub fn set_category_filter(&mut self, categories: impl IntoIterator<Item = String>) -> FetchRequest {
        self.filters.categories = collect_selection(categories);
        self.fetch_fresh()
    }

    pub fn set_condition_filter(&mut self, conditions: impl IntoIterator<Item = String>) -> FetchRequest {
        self.filters.conditions = collect_selection(conditions);
        self.fetch_fresh()
    }

    pub fn set_price_range(&mut self, min_price: Option<f64>, max_price: Option<f64>) -> FetchRequest {
        self.filters.min_price = min_price;
        self.filters.max_price = max_price;
        self.fetch_fresh()
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> FetchRequest {
        self.filters.search = search.into();
        self.fetch_fresh()
    }

    pub fn set_sort(&mut self, sort: SortKey) -> FetchRequest {
        self.sort = sort;
        self.fetch_fresh()
    }

    /// Back to the preset's defaults (a budget tier keeps its ceiling).
    pub fn clear_filters(&mut self) -> FetchRequest {
        self.filters = self.preset.default_filters();
        self.fetch_fresh()
    }

    /// Re-issues the identical fresh fetch for the current selection.
    pub fn retry(&mut self) -> FetchRequest {
        self.fetch_fresh()
    }

    /// Requests the next page, or `None` when there is nothing more, a load-more is
    /// already pending, the first page is still loading, or the view is closed.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.closed || self.loading {
            return None;
        }
        let page = self.pagination.begin()?;
        tracing::debug!(epoch = self.epoch, page, "Issuing load-more fetch");
        Some(FetchRequest {
            epoch: self.epoch,
            kind: FetchKind::LoadMore,
            query: self.query_for(page),
        })
    }

    /// The host went away: every later completion is ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn query_for(&self, page: u32) -> ProductQuery {
        ProductQuery::build(&self.filters, self.sort, page, self.limit, &self.preset)
    }

    // --- Completions ---

    pub fn complete(&mut self, request: &FetchRequest, result: Result<ResultPage, FetchError>) -> Completion {
        if self.closed {
            return Completion::Closed;
        }
        if request.epoch != self.epoch {
            tracing::debug!(
                request_epoch = request.epoch,
                current_epoch = self.epoch,
                "Discarding stale response"
            );
            return Completion::Stale;
        }

        match request.kind {
            FetchKind::Fresh => self.complete_fresh(result),
            FetchKind::LoadMore => self.complete_more(result),
        }
        Completion::Applied
    }

    fn complete_fresh(&mut self, result: Result<ResultPage, FetchError>) {
        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(epoch = self.epoch, received = page.received_count, "Fresh page applied");
                self.pagination.finish_fresh(page.has_more());
                self.facets = facets::derive(&page.items);
                self.products = page.items;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(epoch = self.epoch, error = %e, "Fresh fetch failed");
                self.products.clear();
                self.pagination.fail_fresh();
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    fn complete_more(&mut self, result: Result<ResultPage, FetchError>) {
        match result {
            Ok(page) => {
                tracing::debug!(
                    epoch = self.epoch,
                    page = page.page_number,
                    received = page.received_count,
                    "Load-more page appended"
                );
                // Appended as-is: ids repeated across pages are not collapsed
                self.pagination.finish_more(Some(page.has_more()));
                self.products.extend(page.items);
            }
            Err(e) => {
                tracing::warn!(epoch = self.epoch, error = %e, "Load-more fetch failed");
                self.pagination.finish_more(None);
                self.error = Some(e.user_message().to_string());
            }
        }
    }
}

fn collect_selection(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}
