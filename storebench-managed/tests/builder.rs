use rusqlite::types::Value;
use storebench_core::{Category, Product, ProductWithCategory, StockTotal};
use storebench_managed::query::*;
use storebench_managed::table::{categories, products, TableId};

#[test]
fn select_renders_filters_order_and_limit() {
    let (sql, params) = Select::<Product>::new()
        .filter(Filter::eq(products::CATEGORY_ID, 3_i64))
        .order_by(products::NAME, Order::Asc)
        .limit(10)
        .to_sql();

    assert_eq!(
        sql,
        "SELECT products.id, products.name, products.price, products.category_id, \
         products.stock, products.created_at FROM products \
         WHERE products.category_id = ? ORDER BY products.name ASC LIMIT 10"
    );
    assert_eq!(params, vec![Value::Integer(3)]);
}

#[test]
fn contains_filter_escapes_wildcards() {
    let (sql, params) = Select::<Product>::new()
        .filter(Filter::contains(products::NAME, "50%_off"))
        .to_sql();

    assert!(sql.ends_with("WHERE products.name LIKE ? ESCAPE '\\'"), "{sql}");
    assert_eq!(params, vec![Value::Text("%50\\%\\_off%".to_string())]);
}

#[test]
fn joined_entity_brings_its_join() {
    let select = Select::<ProductWithCategory>::new();
    let (sql, _) = select.to_sql();
    assert!(sql.contains(
        "FROM products INNER JOIN categories ON products.category_id = categories.id"
    ));
    assert!(sql.contains("products.created_at, categories.name FROM"));
    assert_eq!(select.tables(), vec![TableId::Products, TableId::Categories]);
}

#[test]
fn aggregate_renders_group_by_and_sum_order() {
    let (sql, _) = Select::<StockTotal>::new()
        .group_by(categories::ID)
        .group_by(categories::NAME)
        .order_by(Expr::Sum(products::STOCK), Order::Desc)
        .to_sql();

    assert!(sql.starts_with("SELECT categories.name, SUM(products.stock) FROM products"));
    assert!(sql.ends_with(
        "GROUP BY categories.id, categories.name ORDER BY SUM(products.stock) DESC"
    ));
}

#[test]
fn insert_skips_primary_key() {
    let category = Category {
        id: 77,
        name: "Toys".to_string(),
        description: None,
    };
    let (sql, params) = Insert::record(&category).to_sql();
    assert_eq!(sql, "INSERT INTO categories (name, description) VALUES (?, ?)");
    assert_eq!(params, vec![Value::Text("Toys".to_string()), Value::Null]);
}

#[test]
fn update_filters_by_primary_key() {
    let category = Category {
        id: 5,
        name: "Toys".to_string(),
        description: Some("Games".to_string()),
    };
    let (sql, params) = Update::record(&category).to_sql();
    assert_eq!(
        sql,
        "UPDATE categories SET name = ?, description = ? WHERE categories.id = ?"
    );
    assert_eq!(params.last(), Some(&Value::Integer(5)));
}

#[test]
fn update_set_appends_assignment_before_where() {
    let product = Product::new("Lamp", 20.0, 1, 3);
    let (sql, params) = Update::record(&product)
        .set(products::STOCK, 0_i64)
        .filter(Filter::eq(products::CATEGORY_ID, 1_i64))
        .to_sql();

    assert!(sql.contains("created_at = ?, stock = ? WHERE"), "{sql}");
    assert!(sql.ends_with("WHERE products.id = ? AND products.category_id = ?"));
    assert_eq!(params.len(), 8);
}

#[test]
fn delete_without_filter_is_unconditional() {
    let (sql, params) = Delete::<Product>::new().to_sql();
    assert_eq!(sql, "DELETE FROM products");
    assert!(params.is_empty());
}

#[test]
fn category_delete_touches_both_tables() {
    let delete = Delete::<Category>::by_id(1);
    assert_eq!(delete.tables(), vec![TableId::Categories, TableId::Products]);
    assert_eq!(
        delete.to_sql(),
        ("DELETE FROM categories WHERE categories.id = ?".to_string(), vec![Value::Integer(1)])
    );
}
