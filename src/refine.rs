// In-memory refinement and ordering of the accumulated product list.
// Mirrors the server-side filters so the view reacts instantly and never shows
// an item the current selection excludes.

use crate::models::{FilterState, Product, SortKey, ViewKind};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Whether `product` satisfies every active constraint of `filters`.
/// Checks run brand, category (shop views only), condition, min price, max price, search.
pub fn matches(filters: &FilterState, product: &Product, kind: ViewKind) -> bool {
    if !in_selection(&filters.brands, product.brand.as_deref()) {
        return false;
    }
    if kind == ViewKind::Shop && !in_selection(&filters.categories, product.category.as_deref()) {
        return false;
    }
    if !in_selection(&filters.conditions, product.condition.as_deref()) {
        return false;
    }

    let price = product.effective_price();
    if filters.min_price.is_some_and(|min| price < min) {
        return false;
    }
    if filters.max_price.is_some_and(|max| price > max) {
        return false;
    }

    match filters.search_term() {
        Some(term) => {
            let term = term.to_lowercase();
            product.name.to_lowercase().contains(&term)
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|brand| brand.to_lowercase().contains(&term))
        }
        None => true,
    }
}

// An empty selection passes everything; otherwise the value must be selected
fn in_selection(selection: &BTreeSet<String>, value: Option<&str>) -> bool {
    selection.is_empty() || value.is_some_and(|v| selection.contains(v))
}

/// Filters the list, keeping input order.
pub fn refine<'a>(filters: &FilterState, products: &'a [Product], kind: ViewKind) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| matches(filters, product, kind))
        .collect()
}

/// Orders products in place. `sort_by` is stable, so ties keep their incoming order.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    products.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Newest => b.created_millis().cmp(&a.created_millis()),
        SortKey::PriceLow => a.effective_price().total_cmp(&b.effective_price()),
        SortKey::PriceHigh => b.effective_price().total_cmp(&a.effective_price()),
        SortKey::AlphabeticalAz => a.name.cmp(&b.name),
        SortKey::AlphabeticalZa => b.name.cmp(&a.name),
    }
}

/// Refinement followed by ordering: what the host view renders.
pub fn visible<'a>(
    filters: &FilterState,
    sort: SortKey,
    products: &'a [Product],
    kind: ViewKind,
) -> Vec<&'a Product> {
    let mut refined = refine(filters, products, kind);
    sort_products(&mut refined, sort);
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{created_on_day, ids, listed, product};

    fn catalogue() -> Vec<Product> {
        let mut items = vec![
            listed("1", "Chanel", "Pristine", 450000.0),
            listed("2", "Gucci", "Excellent", 18000.0),
            listed("3", "Hermes", "Good", 980000.0),
            listed("4", "Gucci", "Pristine", 25000.0),
            listed("5", "Prada", "Excellent", 12000.0),
            product("6"),
        ];
        items[0].category = Some("Bags".into());
        items[1].category = Some("Shoes".into());
        items[2].category = Some("Bags".into());
        items[3].category = Some("Watches".into());
        items
    }

    fn assert_satisfies(filters: &FilterState, kept: &[&Product]) {
        for p in kept {
            if !filters.brands.is_empty() {
                assert!(filters.brands.contains(p.brand.as_deref().unwrap_or_default()));
            }
            if !filters.conditions.is_empty() {
                assert!(filters.conditions.contains(p.condition.as_deref().unwrap_or_default()));
            }
            if let Some(min) = filters.min_price {
                assert!(p.effective_price() >= min);
            }
            if let Some(max) = filters.max_price {
                assert!(p.effective_price() <= max);
            }
        }
    }

    fn selection_grid() -> Vec<FilterState> {
        let mut grid = vec![FilterState::default()];
        grid.push(FilterState {
            brands: ["Gucci".to_string()].into(),
            ..Default::default()
        });
        grid.push(FilterState {
            conditions: ["Pristine".to_string(), "Excellent".to_string()].into(),
            min_price: Some(15000.0),
            ..Default::default()
        });
        grid.push(FilterState {
            max_price: Some(20000.0),
            ..Default::default()
        });
        grid.push(FilterState {
            brands: ["Hermes".to_string(), "Chanel".to_string()].into(),
            min_price: Some(500000.0),
            max_price: Some(1000000.0),
            ..Default::default()
        });
        grid
    }

    #[test]
    fn refined_items_satisfy_constraints_and_come_from_the_input() {
        let items = catalogue();
        for filters in selection_grid() {
            let kept = refine(&filters, &items, ViewKind::Shop);
            assert_satisfies(&filters, &kept);
            assert!(kept.iter().all(|p| items.contains(p)));
        }
    }

    #[test]
    fn refinement_is_idempotent() {
        let items = catalogue();
        for filters in selection_grid() {
            let once: Vec<Product> = refine(&filters, &items, ViewKind::Shop).into_iter().cloned().collect();
            let twice: Vec<Product> = refine(&filters, &once, ViewKind::Shop).into_iter().cloned().collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_selection_passes_everything() {
        let items = catalogue();
        assert_eq!(refine(&FilterState::default(), &items, ViewKind::Shop).len(), items.len());
    }

    #[test]
    fn inverted_price_bounds_yield_nothing() {
        let items = catalogue();
        let filters = FilterState {
            min_price: Some(50000.0),
            max_price: Some(10000.0),
            ..Default::default()
        };
        assert!(refine(&filters, &items, ViewKind::Shop).is_empty());
    }

    #[test]
    fn budget_ceiling_excludes_pricier_items() {
        let items = catalogue();
        let filters = FilterState {
            max_price: Some(20000.0),
            ..Default::default()
        };
        let kept = refine(&filters, &items, ViewKind::Shop);
        assert_eq!(ids(&kept), vec!["2", "5", "6"]);
        assert!(!ids(&kept).contains(&"4".to_string()));
    }

    #[test]
    fn category_selection_only_applies_in_shop_views() {
        let items = catalogue();
        let filters = FilterState {
            categories: ["Bags".to_string()].into(),
            ..Default::default()
        };
        assert_eq!(ids(&refine(&filters, &items, ViewKind::Shop)), vec!["1", "3"]);
        assert_eq!(refine(&filters, &items, ViewKind::Category).len(), items.len());
    }

    #[test]
    fn brand_selection_drops_unbranded_items() {
        let items = catalogue();
        let filters = FilterState {
            brands: ["Prada".to_string()].into(),
            ..Default::default()
        };
        assert_eq!(ids(&refine(&filters, &items, ViewKind::Category)), vec!["5"]);
    }

    #[test]
    fn search_matches_name_or_brand_case_insensitively() {
        let mut items = catalogue();
        items[4].name = "Re-Edition 2005".into();
        let by_brand = FilterState {
            search: "gUCci".into(),
            ..Default::default()
        };
        assert_eq!(ids(&refine(&by_brand, &items, ViewKind::Shop)), vec!["2", "4"]);
        let by_name = FilterState {
            search: " re-edition ".into(),
            ..Default::default()
        };
        assert_eq!(ids(&refine(&by_name, &items, ViewKind::Shop)), vec!["5"]);
    }

    #[test]
    fn price_low_treats_missing_price_as_zero() {
        let mut a = product("a");
        a.final_price = Some(500.0);
        let missing = product("missing");
        let mut b = product("b");
        b.final_price = Some(200.0);
        let items = vec![a, missing, b];

        let mut refs: Vec<&Product> = items.iter().collect();
        sort_products(&mut refs, SortKey::PriceLow);
        assert_eq!(ids(&refs), vec!["missing", "b", "a"]);

        sort_products(&mut refs, SortKey::PriceHigh);
        assert_eq!(ids(&refs), vec!["a", "b", "missing"]);
    }

    #[test]
    fn newest_puts_undated_items_last() {
        let items = vec![
            created_on_day(product("old"), 2),
            product("undated"),
            created_on_day(product("new"), 20),
        ];
        let mut refs: Vec<&Product> = items.iter().collect();
        sort_products(&mut refs, SortKey::Newest);
        assert_eq!(ids(&refs), vec!["new", "old", "undated"]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let items = vec![
            listed("first", "Chanel", "Good", 100.0),
            listed("second", "Dior", "Good", 100.0),
            listed("third", "Fendi", "Good", 50.0),
            listed("fourth", "Gucci", "Good", 100.0),
        ];
        let mut refs: Vec<&Product> = items.iter().collect();
        sort_products(&mut refs, SortKey::PriceHigh);
        assert_eq!(ids(&refs), vec!["first", "second", "fourth", "third"]);

        // all undated: newest is a full tie
        sort_products(&mut refs, SortKey::Newest);
        assert_eq!(ids(&refs), vec!["first", "second", "fourth", "third"]);
    }

    #[test]
    fn alphabetical_orders_by_name_both_ways() {
        let mut items = vec![product("1"), product("2"), product("3")];
        items[0].name = "Speedy 30".into();
        items[1].name = "Birkin 35".into();
        items[2].name = "Lady Dior".into();
        let mut refs: Vec<&Product> = items.iter().collect();
        sort_products(&mut refs, SortKey::AlphabeticalAz);
        assert_eq!(ids(&refs), vec!["2", "3", "1"]);
        sort_products(&mut refs, SortKey::AlphabeticalZa);
        assert_eq!(ids(&refs), vec!["1", "3", "2"]);
    }

    #[test]
    fn sorting_is_a_permutation_of_the_filtered_input() {
        let items = catalogue();
        let filters = FilterState {
            conditions: ["Pristine".to_string(), "Excellent".to_string()].into(),
            ..Default::default()
        };
        let refined = refine(&filters, &items, ViewKind::Shop);
        for key in [
            SortKey::Newest,
            SortKey::PriceLow,
            SortKey::PriceHigh,
            SortKey::AlphabeticalAz,
            SortKey::AlphabeticalZa,
        ] {
            let mut sorted_ids = ids(&visible(&filters, key, &items, ViewKind::Shop));
            let mut expected = ids(&refined);
            sorted_ids.sort();
            expected.sort();
            assert_eq!(sorted_ids, expected);
        }
    }
}
