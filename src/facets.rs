// Facet derivation: the filter values offered to the user

use crate::models::{FacetSet, Product};
use std::collections::HashSet;

/// Derives the available brands, conditions and categories from the first page of a
/// fresh result set. Values keep first-seen order; null, empty and whitespace-only
/// values are skipped.
pub fn derive(items: &[Product]) -> FacetSet {
    FacetSet {
        brands: unique_in_order(items.iter().map(|p| p.brand.as_deref())),
        conditions: unique_in_order(items.iter().map(|p| p.condition.as_deref())),
        categories: unique_in_order(items.iter().map(|p| p.category.as_deref())),
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .filter(|value| seen.insert(*value)) // insert returns false for repeats
        .map(str::to_string)
        .collect()
}
