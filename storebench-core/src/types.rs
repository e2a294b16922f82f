//! Data model types shared by both access layers.
//!
//! These types mirror the persistent schema: categories, products, the
//! product/category join projection, and the stock aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Category ────────────────────────────────────────────────────────────────

/// A product category. `name` is unique across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Categories inserted on schema creation and after `clear_all`.
pub const SEED_CATEGORIES: [(&str, &str); 3] = [
    ("Electronics", "Electronic devices"),
    ("Books", "Books and magazines"),
    ("Clothing", "Apparel and accessories"),
];

// ── Product ─────────────────────────────────────────────────────────────────

/// A product belonging to exactly one category.
///
/// `id` is assigned by the store on insert; the value carried by a record
/// passed to `create_product` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    #[serde(default)]
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// A not-yet-persisted product stamped with the current time.
    pub fn new(name: impl Into<String>, price: f64, category_id: i64, stock: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            category_id,
            stock,
            created_at: Utc::now(),
        }
    }
}

// ── Derived rows ────────────────────────────────────────────────────────────

/// A product joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
}

/// Total stock across all products of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockTotal {
    pub category_name: String,
    pub total_stock: i64,
}

/// Row counts for both tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub products: i64,
    pub categories: i64,
}
