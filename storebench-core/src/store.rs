//! The data-access contract implemented by both layers.

use crate::error::StoreError;
use crate::types::{Category, Product, ProductWithCategory, StockTotal, StoreCounts};

/// CRUD, join and aggregate operations over the `categories`/`products`
/// schema.
///
/// The benchmark harness and the CLI depend only on this trait, so the
/// direct and managed layers are interchangeable. Both implementations must
/// agree on ordering, on `None` for missing ids, and on reporting
/// constraint failures as [`StoreError::ConstraintViolation`].
pub trait CatalogStore {
    /// Short label used in reports ("direct", "managed").
    fn layer_name(&self) -> &'static str;

    // ── Categories ──

    /// Insert a category. Fails with `ConstraintViolation` on a duplicate name.
    fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, StoreError>;

    /// All categories ordered by name.
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError>;

    /// Replace name and description by id. Returns the number of rows updated.
    fn update_category(&self, category: &Category) -> Result<usize, StoreError>;

    /// Delete by id, cascading to the category's products.
    fn delete_category(&self, id: i64) -> Result<usize, StoreError>;

    // ── Products ──

    /// Insert a product and return it with the assigned id.
    fn create_product(&self, product: &Product) -> Result<Product, StoreError>;

    /// All products, newest first.
    fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Full-record replace by id. Returns the number of rows updated.
    fn update_product(&self, product: &Product) -> Result<usize, StoreError>;

    fn delete_product(&self, id: i64) -> Result<usize, StoreError>;

    fn delete_products_by_category(&self, category_id: i64) -> Result<usize, StoreError>;

    // ── Joins, search, aggregates ──

    /// Products joined with their category name, newest first.
    fn list_products_with_category(&self) -> Result<Vec<ProductWithCategory>, StoreError>;

    /// Products of one category ordered by name.
    fn list_products_by_category(&self, category_id: i64) -> Result<Vec<Product>, StoreError>;

    /// Products whose name contains `needle` (SQLite `LIKE` semantics).
    fn search_products(&self, needle: &str) -> Result<Vec<Product>, StoreError>;

    /// Total stock per category, largest first.
    fn stock_by_category(&self) -> Result<Vec<StockTotal>, StoreError>;

    // ── Bulk ──

    /// Insert all products in one transaction; nothing is kept on failure.
    fn batch_insert_products(&self, products: &[Product]) -> Result<(), StoreError>;

    /// Delete every row and reseed the sample categories.
    fn clear_all(&self) -> Result<(), StoreError>;

    fn count(&self) -> Result<StoreCounts, StoreError>;
}
