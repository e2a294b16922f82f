use chrono::{Duration, TimeZone, Utc};
use storebench_core::Product;
use storebench_direct::operations::*;
use storebench_direct::queries::*;
use storebench_direct::*;

fn category_id(conn: &rusqlite::Connection, name: &str) -> i64 {
    conn.query_row(
        "SELECT id FROM categories WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

fn product_at(name: &str, category_id: i64, stock: i64, minutes: i64) -> Product {
    let mut product = Product::new(name, 9.99, category_id, stock);
    product.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
    product
}

#[test]
fn categories_are_listed_by_name() {
    let conn = open_memory().unwrap();
    create_category(&conn, "Appliances", None).unwrap();
    let names: Vec<String> = list_categories(&conn)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Appliances", "Books", "Clothing", "Electronics"]);
}

#[test]
fn products_are_listed_newest_first() {
    let conn = open_memory().unwrap();
    let books = category_id(&conn, "Books");
    create_product(&conn, &product_at("Old", books, 1, 0)).unwrap();
    create_product(&conn, &product_at("New", books, 1, 30)).unwrap();
    create_product(&conn, &product_at("Middle", books, 1, 10)).unwrap();

    let names: Vec<String> = list_products(&conn)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["New", "Middle", "Old"]);
}

#[test]
fn products_by_category_are_sorted_by_name() {
    let conn = open_memory().unwrap();
    let books = category_id(&conn, "Books");
    let clothing = category_id(&conn, "Clothing");
    create_product(&conn, &product_at("Zine", books, 1, 0)).unwrap();
    create_product(&conn, &product_at("Atlas", books, 1, 1)).unwrap();
    create_product(&conn, &product_at("Scarf", clothing, 1, 2)).unwrap();

    let names: Vec<String> = list_products_by_category(&conn, books)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Atlas", "Zine"]);
}

#[test]
fn join_carries_category_name() {
    let conn = open_memory().unwrap();
    let books = category_id(&conn, "Books");
    let clothing = category_id(&conn, "Clothing");
    create_product(&conn, &product_at("Novel", books, 1, 0)).unwrap();
    create_product(&conn, &product_at("Scarf", clothing, 1, 5)).unwrap();

    let joined = list_products_with_category(&conn).unwrap();
    let pairs: Vec<(&str, &str)> = joined
        .iter()
        .map(|j| (j.product.name.as_str(), j.category_name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Scarf", "Clothing"), ("Novel", "Books")]);
}

#[test]
fn search_matches_substring_and_escapes_wildcards() {
    let conn = open_memory().unwrap();
    let books = category_id(&conn, "Books");
    for name in ["Product 1", "Product 2", "100% Cotton", "Widget"] {
        create_product(&conn, &product_at(name, books, 1, 0)).unwrap();
    }

    assert_eq!(search_products(&conn, "Product").unwrap().len(), 2);
    assert_eq!(search_products(&conn, "product").unwrap().len(), 2);
    let literal = search_products(&conn, "0%").unwrap();
    assert_eq!(literal.len(), 1);
    assert_eq!(literal[0].name, "100% Cotton");
    assert!(search_products(&conn, "_").unwrap().is_empty());
}

#[test]
fn stock_totals_are_grouped_and_ordered() {
    let conn = open_memory().unwrap();
    let books = category_id(&conn, "Books");
    let clothing = category_id(&conn, "Clothing");
    create_product(&conn, &product_at("A", books, 5, 0)).unwrap();
    create_product(&conn, &product_at("B", clothing, 20, 1)).unwrap();
    create_product(&conn, &product_at("C", books, 7, 2)).unwrap();

    let totals = stock_by_category(&conn).unwrap();
    let pairs: Vec<(&str, i64)> = totals
        .iter()
        .map(|t| (t.category_name.as_str(), t.total_stock))
        .collect();
    assert_eq!(pairs, vec![("Clothing", 20), ("Books", 12)]);
}

#[test]
fn missing_ids_read_as_none() {
    let conn = open_memory().unwrap();
    assert!(get_product(&conn, 77).unwrap().is_none());
    assert!(get_category(&conn, 77).unwrap().is_none());
}
