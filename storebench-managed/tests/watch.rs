use storebench_core::{CatalogStore, Product};
use storebench_managed::ManagedStore;

fn category_id(store: &ManagedStore, name: &str) -> i64 {
    store
        .list_categories()
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap()
        .id
}

#[test]
fn initial_snapshot_is_delivered() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_categories().unwrap();

    let first = sub.try_recv().unwrap();
    assert_eq!(first, store.list_categories().unwrap());
    assert!(sub.try_recv().is_none());
}

#[test]
fn each_changing_write_pushes_a_snapshot() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    let mut sub = store.watch_products().unwrap();
    assert!(sub.try_recv().unwrap().is_empty());

    let created = store
        .create_product(&Product::new("Novel", 10.0, books, 2))
        .unwrap();
    let after_insert = sub.try_recv().unwrap();
    assert_eq!(after_insert, vec![created.clone()]);

    let mut changed = created.clone();
    changed.stock = 9;
    store.update_product(&changed).unwrap();
    assert_eq!(sub.try_recv().unwrap()[0].stock, 9);

    store.delete_product(created.id).unwrap();
    assert!(sub.try_recv().unwrap().is_empty());
    assert!(sub.try_recv().is_none());
}

#[test]
fn unrelated_and_noop_writes_are_silent() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_products().unwrap();
    sub.try_recv().unwrap();

    store.create_category("Toys", None).unwrap();
    assert_eq!(store.delete_product(9_999).unwrap(), 0);
    let mut ghost = Product::new("Ghost", 1.0, 1, 0);
    ghost.id = 9_999;
    assert_eq!(store.update_product(&ghost).unwrap(), 0);
    store.batch_insert_products(&[]).unwrap();

    assert_eq!(sub.pending(), 0);
}

#[test]
fn failed_write_pushes_nothing() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_categories().unwrap();
    sub.try_recv().unwrap();

    assert!(store.create_category("Books", None).is_err());
    assert!(sub.try_recv().is_none());
}

#[test]
fn category_delete_refreshes_product_watchers() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    store
        .create_product(&Product::new("Novel", 10.0, books, 2))
        .unwrap();

    let mut products = store.watch_products().unwrap();
    assert_eq!(products.try_recv().unwrap().len(), 1);

    store.delete_category(books).unwrap();
    assert!(products.try_recv().unwrap().is_empty());
}

#[test]
fn joined_watch_follows_category_renames() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    store
        .create_product(&Product::new("Novel", 10.0, books, 2))
        .unwrap();

    let mut joined = store.watch_products_with_category().unwrap();
    assert_eq!(joined.try_recv().unwrap()[0].category_name, "Books");

    let mut category = store.get_category(books).unwrap().unwrap();
    category.name = "Literature".to_string();
    store.update_category(&category).unwrap();
    assert_eq!(joined.try_recv().unwrap()[0].category_name, "Literature");
}

#[test]
fn batch_insert_pushes_one_snapshot() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    let mut stock = store.watch_stock_by_category().unwrap();
    assert!(stock.try_recv().unwrap().is_empty());

    let batch: Vec<Product> = (0..5)
        .map(|i| Product::new(format!("Product {i}"), 1.0, books, 4))
        .collect();
    store.batch_insert_products(&batch).unwrap();

    let totals = stock.try_recv().unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total_stock, 20);
    assert!(stock.try_recv().is_none());
}

#[test]
fn watch_count_tracks_both_tables() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut counts = store.watch_count().unwrap();
    assert_eq!(counts.try_recv().unwrap().categories, 3);

    let toys = store.create_category("Toys", None).unwrap();
    store
        .create_product(&Product::new("Kite", 5.0, toys.id, 1))
        .unwrap();

    let latest = counts.latest().unwrap();
    assert_eq!(latest.categories, 4);
    assert_eq!(latest.products, 1);
}

#[test]
fn clear_all_notifies_with_reseeded_state() {
    let store = ManagedStore::open_in_memory().unwrap();
    store.create_category("Toys", None).unwrap();
    let mut sub = store.watch_categories().unwrap();
    assert_eq!(sub.try_recv().unwrap().len(), 4);

    store.clear_all().unwrap();
    assert_eq!(sub.try_recv().unwrap().len(), 3);
}

#[test]
fn unsubscribe_stops_delivery() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_categories().unwrap();
    sub.try_recv().unwrap();

    assert!(store.unsubscribe(sub.id()));
    assert!(!store.unsubscribe(sub.id()));
    store.create_category("Toys", None).unwrap();
    assert!(sub.try_recv().is_none());
    assert_eq!(store.subscription_count(), 0);
}

#[test]
fn dropped_subscriptions_are_pruned_on_next_write() {
    let store = ManagedStore::open_in_memory().unwrap();
    let kept = store.watch_categories().unwrap();
    drop(store.watch_categories().unwrap());
    assert_eq!(store.subscription_count(), 2);

    store.create_category("Toys", None).unwrap();
    assert_eq!(store.subscription_count(), 1);
    drop(kept);
}

#[test]
fn dropped_subscriptions_are_pruned_by_unrelated_writes() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    drop(store.watch_categories().unwrap());
    assert_eq!(store.subscription_count(), 1);

    // Only the products table changes
    store
        .create_product(&Product::new("Novel", 10.0, books, 2))
        .unwrap();
    assert_eq!(store.subscription_count(), 0);
}

#[test]
fn category_watch_is_filtered_and_name_ordered() {
    let store = ManagedStore::open_in_memory().unwrap();
    let books = category_id(&store, "Books");
    let clothing = category_id(&store, "Clothing");
    for name in ["Zen Garden", "Atlas", "Moby Dick"] {
        store
            .create_product(&Product::new(name, 12.5, books, 1))
            .unwrap();
    }
    store
        .create_product(&Product::new("Anorak", 40.0, clothing, 3))
        .unwrap();

    let mut sub = store.watch_products_by_category(books).unwrap();
    let names: Vec<String> = sub.try_recv().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Atlas", "Moby Dick", "Zen Garden"]);

    store
        .create_product(&Product::new("Beowulf", 8.0, books, 4))
        .unwrap();
    let names: Vec<String> = sub.try_recv().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Atlas", "Beowulf", "Moby Dick", "Zen Garden"]);

    store.delete_category(books).unwrap();
    assert!(sub.latest().unwrap().is_empty());
    assert!(sub.try_recv().is_none());
}

#[test]
fn snapshots_can_be_received_blocking() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_count().unwrap();
    assert_eq!(sub.blocking_recv().unwrap().categories, 3);

    store.create_category("Toys", None).unwrap();
    let counts = sub.blocking_recv().unwrap();
    assert_eq!(counts.categories, 4);
    assert_eq!(counts.products, 0);
}

#[tokio::test]
async fn snapshots_can_be_awaited() {
    let store = ManagedStore::open_in_memory().unwrap();
    let mut sub = store.watch_categories().unwrap();
    assert_eq!(sub.recv().await.unwrap().len(), 3);

    store.create_category("Toys", None).unwrap();
    assert_eq!(sub.recv().await.unwrap().len(), 4);
}
