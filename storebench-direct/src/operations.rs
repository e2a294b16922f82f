//! Write operations for categories and products.

use rusqlite::{params, Connection};
use storebench_core::sql::format_timestamp;
use storebench_core::{Category, Product, StoreError, SEED_CATEGORIES};

// ── Category Operations ─────────────────────────────────────────────────────

/// Insert a category. Returns it with the generated id.
pub fn create_category(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<Category, StoreError> {
    conn.execute(
        "INSERT INTO categories (name, description) VALUES (?1, ?2)",
        params![name, description],
    )?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        description: description.map(str::to_string),
    })
}

/// Replace a category's name and description.
pub fn update_category(conn: &Connection, category: &Category) -> Result<usize, StoreError> {
    let changed = conn.execute(
        "UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1",
        params![category.id, category.name, category.description],
    )?;
    Ok(changed)
}

/// Delete a category. Its products go with it (ON DELETE CASCADE).
pub fn delete_category(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changed = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
    Ok(changed)
}

/// Insert the sample categories, skipping any that already exist.
pub fn seed_categories(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO categories (name, description) VALUES (?1, ?2)")?;
    for (name, description) in SEED_CATEGORIES {
        stmt.execute(params![name, description])?;
    }
    Ok(())
}

// ── Product Operations ──────────────────────────────────────────────────────

const INSERT_PRODUCT_SQL: &str =
    "INSERT INTO products (name, price, category_id, stock, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)";

/// Insert a product. The input `id` is ignored; the returned copy carries
/// the generated one.
pub fn create_product(conn: &Connection, product: &Product) -> Result<Product, StoreError> {
    conn.execute(
        INSERT_PRODUCT_SQL,
        params![
            product.name,
            product.price,
            product.category_id,
            product.stock,
            format_timestamp(&product.created_at),
        ],
    )?;
    Ok(Product {
        id: conn.last_insert_rowid(),
        ..product.clone()
    })
}

/// Replace every column of a product by id.
pub fn update_product(conn: &Connection, product: &Product) -> Result<usize, StoreError> {
    let changed = conn.execute(
        "UPDATE products
         SET name = ?2, price = ?3, category_id = ?4, stock = ?5, created_at = ?6
         WHERE id = ?1",
        params![
            product.id,
            product.name,
            product.price,
            product.category_id,
            product.stock,
            format_timestamp(&product.created_at),
        ],
    )?;
    Ok(changed)
}

pub fn delete_product(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(changed)
}

pub fn delete_products_by_category(
    conn: &Connection,
    category_id: i64,
) -> Result<usize, StoreError> {
    let changed = conn.execute(
        "DELETE FROM products WHERE category_id = ?1",
        params![category_id],
    )?;
    Ok(changed)
}

// ── Bulk Operations ─────────────────────────────────────────────────────────

/// Insert many products in a single transaction.
///
/// If any row fails, the transaction is dropped without committing and no
/// row from the batch is kept.
pub fn batch_insert_products(conn: &Connection, products: &[Product]) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(INSERT_PRODUCT_SQL)?;
        for product in products {
            stmt.execute(params![
                product.name,
                product.price,
                product.category_id,
                product.stock,
                format_timestamp(&product.created_at),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Delete every product and category, then reseed the sample categories.
pub fn clear_all(conn: &Connection) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("DELETE FROM products; DELETE FROM categories;")?;
    seed_categories(&tx)?;
    tx.commit()?;
    Ok(())
}
