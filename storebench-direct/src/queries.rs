//! Read queries for the direct layer.
//!
//! Provides lookup by id, listing, filtering by category, name search,
//! the product/category join, and the stock aggregate.

use rusqlite::{params, Connection, OptionalExtension};
use storebench_core::sql::{like_pattern, timestamp_column};
use storebench_core::{
    Category, Product, ProductWithCategory, StockTotal, StoreCounts, StoreError,
};

const PRODUCT_COLUMNS: &str = "id, name, price, category_id, stock, created_at";

// ── Category Lookups ────────────────────────────────────────────────────────

/// List all categories ordered by name.
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, StoreError> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, description FROM categories ORDER BY name ASC")?;
    let rows = stmt.query_map([], row_to_category)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>, StoreError> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, description FROM categories WHERE id = ?1")?;
    stmt.query_row(params![id], row_to_category)
        .optional()
        .map_err(Into::into)
}

// ── Product Lookups ─────────────────────────────────────────────────────────

/// List all products, newest first.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>, StoreError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], row_to_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn get_product(conn: &Connection, id: i64) -> Result<Option<Product>, StoreError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], row_to_product)
        .optional()
        .map_err(Into::into)
}

/// List the products of one category ordered by name.
pub fn list_products_by_category(
    conn: &Connection,
    category_id: i64,
) -> Result<Vec<Product>, StoreError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(params![category_id], row_to_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Search products by name substring (SQLite LIKE, ASCII case-insensitive).
pub fn search_products(conn: &Connection, needle: &str) -> Result<Vec<Product>, StoreError> {
    let pattern = like_pattern(needle);
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE name LIKE ?1 ESCAPE '\\'"
    ))?;
    let rows = stmt.query_map(params![pattern], row_to_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Joins and Aggregates ────────────────────────────────────────────────────

/// Products joined with their category's name, newest first.
pub fn list_products_with_category(
    conn: &Connection,
) -> Result<Vec<ProductWithCategory>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.id, p.name, p.price, p.category_id, p.stock, p.created_at, c.name
         FROM products p
         INNER JOIN categories c ON c.id = p.category_id
         ORDER BY p.created_at DESC, p.id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ProductWithCategory {
            product: row_to_product(row)?,
            category_name: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Total stock per category, largest first.
pub fn stock_by_category(conn: &Connection) -> Result<Vec<StockTotal>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.name, SUM(p.stock) AS total_stock
         FROM products p
         INNER JOIN categories c ON c.id = p.category_id
         GROUP BY c.id, c.name
         ORDER BY total_stock DESC, c.name ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(StockTotal {
            category_name: row.get(0)?,
            total_stock: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Row counts for both tables.
pub fn count(conn: &Connection) -> Result<StoreCounts, StoreError> {
    let products: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
    let categories: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    Ok(StoreCounts {
        products,
        categories,
    })
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        category_id: row.get(3)?,
        stock: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}
