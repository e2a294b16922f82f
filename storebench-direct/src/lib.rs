//! Direct SQLite access layer.
//!
//! Every operation is a literal SQL statement issued through rusqlite.
//! [`DirectStore`] owns one connection and implements [`CatalogStore`]
//! by delegating to the free functions in [`operations`] and [`queries`].

pub mod operations;
pub mod queries;
pub mod schema;

use std::path::Path;

use rusqlite::Connection;
use storebench_core::{
    CatalogStore, Category, Product, ProductWithCategory, StockTotal, StoreCounts, StoreError,
};

pub use rusqlite;
pub use schema::{open_database, open_memory};

/// The direct layer: one owned connection, raw SQL per call.
pub struct DirectStore {
    conn: Connection,
}

impl DirectStore {
    /// Open (creating and seeding if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = open_database(path)?;
        log::debug!("Opened direct store at {}", path.display());
        Ok(Self { conn })
    }

    /// A seeded in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_memory()?,
        })
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CatalogStore for DirectStore {
    fn layer_name(&self) -> &'static str {
        "direct"
    }

    fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, StoreError> {
        operations::create_category(&self.conn, name, description)
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        queries::list_categories(&self.conn)
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        queries::get_category(&self.conn, id)
    }

    fn update_category(&self, category: &Category) -> Result<usize, StoreError> {
        operations::update_category(&self.conn, category)
    }

    fn delete_category(&self, id: i64) -> Result<usize, StoreError> {
        operations::delete_category(&self.conn, id)
    }

    fn create_product(&self, product: &Product) -> Result<Product, StoreError> {
        operations::create_product(&self.conn, product)
    }

    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        queries::list_products(&self.conn)
    }

    fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        queries::get_product(&self.conn, id)
    }

    fn update_product(&self, product: &Product) -> Result<usize, StoreError> {
        operations::update_product(&self.conn, product)
    }

    fn delete_product(&self, id: i64) -> Result<usize, StoreError> {
        operations::delete_product(&self.conn, id)
    }

    fn delete_products_by_category(&self, category_id: i64) -> Result<usize, StoreError> {
        operations::delete_products_by_category(&self.conn, category_id)
    }

    fn list_products_with_category(&self) -> Result<Vec<ProductWithCategory>, StoreError> {
        queries::list_products_with_category(&self.conn)
    }

    fn list_products_by_category(&self, category_id: i64) -> Result<Vec<Product>, StoreError> {
        queries::list_products_by_category(&self.conn, category_id)
    }

    fn search_products(&self, needle: &str) -> Result<Vec<Product>, StoreError> {
        queries::search_products(&self.conn, needle)
    }

    fn stock_by_category(&self) -> Result<Vec<StockTotal>, StoreError> {
        queries::stock_by_category(&self.conn)
    }

    fn batch_insert_products(&self, products: &[Product]) -> Result<(), StoreError> {
        operations::batch_insert_products(&self.conn, products)
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        operations::clear_all(&self.conn)
    }

    fn count(&self) -> Result<StoreCounts, StoreError> {
        queries::count(&self.conn)
    }
}
