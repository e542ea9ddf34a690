// Route slug -> preset (category page or budget tier) resolution

use crate::models::{PresetConfig, PresetSelector};
use once_cell::sync::Lazy;
use std::collections::HashMap;

const DEFAULT_BANNER: &str = "/images/banners/default.jpg";

const DEFAULT_FEATURES: [&str; 4] = [
    "Authenticity guaranteed",
    "Expert quality inspection",
    "Secure payments",
    "Pan-India delivery",
];

// One row per browsable category: route slug, display name and the name the
// catalogue backend files products under. Both directions are served from here.
struct CategoryEntry {
    slug: &'static str,
    display: &'static str,
    server: &'static str,
    subtitle: &'static str,
    banner: &'static str,
    features: &'static [&'static str],
}

const CATEGORIES: &[CategoryEntry] = &[
    CategoryEntry {
        slug: "handbags",
        display: "Handbags",
        server: "Bags",
        subtitle: "Iconic silhouettes from Hermès, Chanel, Louis Vuitton and more",
        banner: "/images/banners/handbags.jpg",
        features: &["Authenticity guaranteed", "Dust bag & box where available", "Condition graded by experts"],
    },
    CategoryEntry {
        slug: "shoes",
        display: "Shoes",
        server: "Footwear",
        subtitle: "Pre-owned heels, sneakers and loafers from the great houses",
        banner: "/images/banners/shoes.jpg",
        features: &["Authenticity guaranteed", "Sole wear disclosed", "Size verified"],
    },
    CategoryEntry {
        slug: "watches",
        display: "Watches",
        server: "Watches",
        subtitle: "Certified pre-owned timepieces",
        banner: "/images/banners/watches.jpg",
        features: &["Movement serviced", "Authenticity guaranteed", "Box & papers disclosed"],
    },
    CategoryEntry {
        slug: "jewellery",
        display: "Fine Jewellery",
        server: "Jewelry",
        subtitle: "Signed pieces in gold, platinum and precious stones",
        banner: "/images/banners/jewellery.jpg",
        features: &["Hallmark verified", "Authenticity guaranteed", "Insured shipping"],
    },
    CategoryEntry {
        slug: "clothing",
        display: "Clothing",
        server: "Apparel",
        subtitle: "Ready-to-wear from runway to everyday",
        banner: "/images/banners/clothing.jpg",
        features: &["Authenticity guaranteed", "Professionally cleaned", "Measurements listed"],
    },
    CategoryEntry {
        slug: "accessories",
        display: "Accessories",
        server: "Accessories",
        subtitle: "Belts, scarves, wallets and small leather goods",
        banner: "/images/banners/accessories.jpg",
        features: &DEFAULT_FEATURES,
    },
    CategoryEntry {
        slug: "sunglasses",
        display: "Eyewear",
        server: "Sunglasses",
        subtitle: "Designer frames, inspected lens by lens",
        banner: "/images/banners/eyewear.jpg",
        features: &DEFAULT_FEATURES,
    },
];

struct BudgetTier {
    slug: &'static str,
    title: &'static str,
    subtitle: &'static str,
    max_price: Option<f64>,
}

const BUDGET_TIERS: &[BudgetTier] = &[
    BudgetTier {
        slug: "under-20k",
        title: "Luxury Under ₹20k",
        subtitle: "Your first designer piece starts here",
        max_price: Some(20_000.0),
    },
    BudgetTier {
        slug: "under-50k",
        title: "Luxury Under ₹50k",
        subtitle: "Statement pieces at accessible prices",
        max_price: Some(50_000.0),
    },
    BudgetTier {
        slug: "under-1-lakh",
        title: "Luxury Under ₹1 Lakh",
        subtitle: "Investment pieces for less",
        max_price: Some(100_000.0),
    },
    BudgetTier {
        slug: "all",
        title: "Shop All",
        subtitle: "Every authenticated piece in one place",
        max_price: None,
    },
];

enum Entry {
    Category(&'static CategoryEntry),
    Budget(&'static BudgetTier),
}

static PRESET_INDEX: Lazy<HashMap<&'static str, Entry>> = Lazy::new(|| {
    let categories = CATEGORIES.iter().map(|c| (c.slug, Entry::Category(c)));
    let tiers = BUDGET_TIERS.iter().map(|t| (t.slug, Entry::Budget(t)));
    categories.chain(tiers).collect()
});

/// Resolves a route slug to its preset. Lookup is exact but case-insensitive; an
/// unknown slug gets a synthesized category preset, so this never fails.
pub fn resolve(slug: &str) -> PresetConfig {
    let key = slug.to_lowercase();
    match PRESET_INDEX.get(key.as_str()) {
        Some(Entry::Category(entry)) => category_preset(entry),
        Some(Entry::Budget(tier)) => budget_preset(tier),
        None => {
            tracing::debug!(slug, "No preset for slug, synthesizing one");
            synthesize(&key)
        }
    }
}

fn category_preset(entry: &CategoryEntry) -> PresetConfig {
    PresetConfig {
        slug: entry.slug.to_string(),
        title: entry.display.to_string(),
        subtitle: entry.subtitle.to_string(),
        banner: entry.banner.to_string(),
        selector: PresetSelector::Category(entry.server.to_string()),
        features: to_strings(entry.features),
        seo_keywords: seo_keywords(entry.display),
    }
}

fn budget_preset(tier: &BudgetTier) -> PresetConfig {
    PresetConfig {
        slug: tier.slug.to_string(),
        title: tier.title.to_string(),
        subtitle: tier.subtitle.to_string(),
        banner: DEFAULT_BANNER.to_string(),
        selector: PresetSelector::MaxPrice(tier.max_price),
        features: to_strings(&DEFAULT_FEATURES),
        seo_keywords: seo_keywords(tier.title),
    }
}

fn synthesize(slug: &str) -> PresetConfig {
    let title = title_case(slug);
    PresetConfig {
        slug: slug.to_string(),
        subtitle: format!("Discover pre-owned {title} from the world's finest houses"),
        banner: DEFAULT_BANNER.to_string(),
        selector: PresetSelector::Category(title.clone()),
        features: to_strings(&DEFAULT_FEATURES),
        seo_keywords: seo_keywords(&title),
        title,
    }
}

// "vintage-silk-scarves" -> "Vintage Silk Scarves"
fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn seo_keywords(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    vec![
        format!("pre-owned {lower}"),
        format!("luxury {lower}"),
        format!("authentic designer {lower}"),
    ]
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// --- Category name mapping ---

fn find_category(pred: impl Fn(&CategoryEntry) -> bool) -> Option<&'static CategoryEntry> {
    CATEGORIES.iter().find(|entry| pred(entry))
}

pub fn server_category_for_slug(slug: &str) -> Option<&'static str> {
    find_category(|e| e.slug.eq_ignore_ascii_case(slug)).map(|e| e.server)
}

pub fn slug_for_server_category(server: &str) -> Option<&'static str> {
    find_category(|e| e.server.eq_ignore_ascii_case(server)).map(|e| e.slug)
}

pub fn display_name_for_slug(slug: &str) -> Option<&'static str> {
    find_category(|e| e.slug.eq_ignore_ascii_case(slug)).map(|e| e.display)
}

pub fn slug_for_display_name(display: &str) -> Option<&'static str> {
    find_category(|e| e.display.eq_ignore_ascii_case(display)).map(|e| e.slug)
}
