// Fixture helpers for unit tests

use crate::models::Product;
use chrono::{TimeZone, Utc};

pub(crate) fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Item {id}"),
        brand: None,
        category: None,
        condition: None,
        final_price: None,
        original_price: None,
        created_at: None,
        images: vec![],
        views: 0,
        likes: 0,
    }
}

pub(crate) fn listed(id: &str, brand: &str, condition: &str, price: f64) -> Product {
    Product {
        brand: Some(brand.to_string()),
        condition: Some(condition.to_string()),
        final_price: Some(price),
        ..product(id)
    }
}

pub(crate) fn created_on_day(mut product: Product, day: u32) -> Product {
    product.created_at = Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).single();
    product
}

pub(crate) fn ids(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.id.clone()).collect()
}
