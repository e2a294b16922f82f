//! Managed SQLite access layer.
//!
//! Operations go through the typed query builder in [`query`] over the
//! table definitions in [`table`]; no statement text is written by hand.
//! On top of the call-and-wait [`CatalogStore`] API, [`ManagedStore`] can
//! subscribe to any read query and push a fresh snapshot after every write
//! that changes a table the query reads.

pub mod entities;
pub mod query;
pub mod schema;
pub mod table;
pub mod watch;

use std::cell::RefCell;
use std::path::Path;

use rusqlite::Connection;
use storebench_core::{
    CatalogStore, Category, Product, ProductWithCategory, StockTotal, StoreCounts, StoreError,
};

use query::{Delete, Entity, Filter, Insert, Order, Select, Update};
use table::{categories, products, TableId};
use watch::WatchRegistry;

pub use schema::{open_database, open_memory};
pub use watch::Subscription;

/// The managed layer: one owned connection plus its subscription registry.
pub struct ManagedStore {
    conn: Connection,
    watchers: RefCell<WatchRegistry>,
}

impl ManagedStore {
    /// Open (creating and seeding if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = open_database(path)?;
        log::debug!("Opened managed store at {}", path.display());
        Ok(Self::with_connection(conn))
    }

    /// A seeded in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::with_connection(open_memory()?))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn,
            watchers: RefCell::new(WatchRegistry::default()),
        }
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ── Queries ──

    fn categories_query() -> Select<Category> {
        Select::new().order_by(categories::NAME, Order::Asc)
    }

    fn products_query() -> Select<Product> {
        Select::new()
            .order_by(products::CREATED_AT, Order::Desc)
            .order_by(products::ID, Order::Desc)
    }

    fn products_by_category_query(category_id: i64) -> Select<Product> {
        Select::new()
            .filter(Filter::eq(products::CATEGORY_ID, category_id))
            .order_by(products::NAME, Order::Asc)
    }

    fn joined_query() -> Select<ProductWithCategory> {
        Select::new()
            .order_by(products::CREATED_AT, Order::Desc)
            .order_by(products::ID, Order::Desc)
    }

    fn stock_query() -> Select<StockTotal> {
        Select::new()
            .group_by(categories::ID)
            .group_by(categories::NAME)
            .order_by(query::Expr::Sum(products::STOCK), Order::Desc)
            .order_by(categories::NAME, Order::Asc)
    }

    fn counts(conn: &Connection) -> Result<StoreCounts, StoreError> {
        Ok(StoreCounts {
            products: Select::<Product>::new().count(conn)?,
            categories: Select::<Category>::new().count(conn)?,
        })
    }

    // ── Subscriptions ──

    /// Subscribe to an arbitrary select. The first snapshot is queued
    /// before this returns.
    pub fn watch_query<E>(&self, select: Select<E>) -> Result<Subscription<Vec<E>>, StoreError>
    where
        E: Entity + Send + 'static,
    {
        let tables = select.tables();
        let (sink, rx) = watch::subscribe(&self.conn, move |conn| select.fetch_all(conn))?;
        let id = self.watchers.borrow_mut().register(tables, sink);
        log::debug!("Subscription {} registered", id);
        Ok(Subscription::new(id, rx))
    }

    pub fn watch_categories(&self) -> Result<Subscription<Vec<Category>>, StoreError> {
        self.watch_query(Self::categories_query())
    }

    pub fn watch_products(&self) -> Result<Subscription<Vec<Product>>, StoreError> {
        self.watch_query(Self::products_query())
    }

    pub fn watch_products_by_category(
        &self,
        category_id: i64,
    ) -> Result<Subscription<Vec<Product>>, StoreError> {
        self.watch_query(Self::products_by_category_query(category_id))
    }

    pub fn watch_products_with_category(
        &self,
    ) -> Result<Subscription<Vec<ProductWithCategory>>, StoreError> {
        self.watch_query(Self::joined_query())
    }

    pub fn watch_stock_by_category(&self) -> Result<Subscription<Vec<StockTotal>>, StoreError> {
        self.watch_query(Self::stock_query())
    }

    pub fn watch_count(&self) -> Result<Subscription<StoreCounts>, StoreError> {
        let (sink, rx) = watch::subscribe(&self.conn, Self::counts)?;
        let id = self
            .watchers
            .borrow_mut()
            .register(vec![TableId::Categories, TableId::Products], sink);
        Ok(Subscription::new(id, rx))
    }

    /// Remove a subscription immediately. Returns false for unknown ids.
    pub fn unsubscribe(&self, id: u64) -> bool {
        self.watchers.borrow_mut().remove(id)
    }

    /// Registered subscriptions. A dropped one is pruned on the next write
    /// that changes any row.
    pub fn subscription_count(&self) -> usize {
        self.watchers.borrow().len()
    }

    fn notify(&self, changed: &[TableId]) {
        let mut watchers = self.watchers.borrow_mut();
        if !watchers.is_empty() {
            watchers.notify(&self.conn, changed);
        }
    }

    /// Run a write and notify watchers of `touched` if it changed any row.
    fn write<F>(&self, touched: &[TableId], op: F) -> Result<usize, StoreError>
    where
        F: FnOnce(&Connection) -> Result<usize, StoreError>,
    {
        let changed = op(&self.conn)?;
        if changed > 0 {
            self.notify(touched);
        }
        Ok(changed)
    }
}

impl CatalogStore for ManagedStore {
    fn layer_name(&self) -> &'static str {
        "managed"
    }

    fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, StoreError> {
        let mut category = Category {
            id: 0,
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        category.id = Insert::record(&category).exec(&self.conn)?;
        self.notify(&[TableId::Categories]);
        Ok(category)
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Self::categories_query().fetch_all(&self.conn)
    }

    fn get_category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Select::<Category>::new()
            .filter(Filter::eq(categories::ID, id))
            .fetch_optional(&self.conn)
    }

    fn update_category(&self, category: &Category) -> Result<usize, StoreError> {
        self.write(&[TableId::Categories], |conn| {
            Update::record(category).exec(conn)
        })
    }

    fn delete_category(&self, id: i64) -> Result<usize, StoreError> {
        let delete = Delete::<Category>::by_id(id);
        self.write(&delete.tables(), |conn| delete.exec(conn))
    }

    fn create_product(&self, product: &Product) -> Result<Product, StoreError> {
        let id = Insert::record(product).exec(&self.conn)?;
        self.notify(&[TableId::Products]);
        Ok(Product {
            id,
            ..product.clone()
        })
    }

    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Self::products_query().fetch_all(&self.conn)
    }

    fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Select::<Product>::new()
            .filter(Filter::eq(products::ID, id))
            .fetch_optional(&self.conn)
    }

    fn update_product(&self, product: &Product) -> Result<usize, StoreError> {
        self.write(&[TableId::Products], |conn| {
            Update::record(product).exec(conn)
        })
    }

    fn delete_product(&self, id: i64) -> Result<usize, StoreError> {
        let delete = Delete::<Product>::by_id(id);
        self.write(&delete.tables(), |conn| delete.exec(conn))
    }

    fn delete_products_by_category(&self, category_id: i64) -> Result<usize, StoreError> {
        let delete = Delete::<Product>::new().filter(Filter::eq(products::CATEGORY_ID, category_id));
        self.write(&delete.tables(), |conn| delete.exec(conn))
    }

    fn list_products_with_category(&self) -> Result<Vec<ProductWithCategory>, StoreError> {
        Self::joined_query().fetch_all(&self.conn)
    }

    fn list_products_by_category(&self, category_id: i64) -> Result<Vec<Product>, StoreError> {
        Self::products_by_category_query(category_id).fetch_all(&self.conn)
    }

    fn search_products(&self, needle: &str) -> Result<Vec<Product>, StoreError> {
        Select::<Product>::new()
            .filter(Filter::contains(products::NAME, needle))
            .fetch_all(&self.conn)
    }

    fn stock_by_category(&self) -> Result<Vec<StockTotal>, StoreError> {
        Self::stock_query().fetch_all(&self.conn)
    }

    fn batch_insert_products(&self, batch: &[Product]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for product in batch {
            Insert::record(product).exec(&tx)?;
        }
        tx.commit()?;
        if !batch.is_empty() {
            self.notify(&[TableId::Products]);
        }
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        Delete::<Product>::new().exec(&tx)?;
        Delete::<Category>::new().exec(&tx)?;
        schema::seed_categories(&tx)?;
        tx.commit()?;
        self.notify(&[TableId::Categories, TableId::Products]);
        Ok(())
    }

    fn count(&self) -> Result<StoreCounts, StoreError> {
        Self::counts(&self.conn)
    }
}
