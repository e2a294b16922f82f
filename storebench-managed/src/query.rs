//! Typed query builder.
//!
//! Builders collect typed columns, filters and ordering, then render a SQL
//! string with `?` placeholders plus the flattened parameter list. Rows are
//! decoded through the [`Entity`] trait, writes take their values from
//! [`Record`].

use std::marker::PhantomData;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use storebench_core::sql::like_pattern;
use storebench_core::StoreError;

use crate::table::{Column, TableDef, TableId};

// ── Expressions ─────────────────────────────────────────────────────────────

/// A select-list or ordering expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr {
    Column(Column),
    Sum(Column),
}

impl Expr {
    fn to_sql(self) -> String {
        match self {
            Expr::Column(c) => c.to_string(),
            Expr::Sum(c) => format!("SUM({c})"),
        }
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::Column(column)
    }
}

/// A `WHERE` predicate. Predicates in one builder are joined with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(Column, Value),
    /// Substring match on a text column; wildcards in the needle are literal.
    Contains(Column, String),
}

impl Filter {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Filter::Eq(column, value.into())
    }

    pub fn contains(column: Column, needle: &str) -> Self {
        Filter::Contains(column, needle.to_string())
    }

    fn to_sql(&self) -> String {
        match self {
            Filter::Eq(c, _) => format!("{c} = ?"),
            Filter::Contains(c, _) => format!("{c} LIKE ? ESCAPE '\\'"),
        }
    }

    fn param(&self) -> Value {
        match self {
            Filter::Eq(_, v) => v.clone(),
            Filter::Contains(_, needle) => Value::Text(like_pattern(needle)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// `INNER JOIN <table> ON <left> = <right>`
#[derive(Debug, Clone, Copy)]
pub struct Join {
    pub table: &'static TableDef,
    pub left: Column,
    pub right: Column,
}

impl Join {
    pub fn inner(table: &'static TableDef, left: Column, right: Column) -> Self {
        Self { table, left, right }
    }
}

fn where_clause(filters: &[Filter], sql: &mut String, params: &mut Vec<Value>) {
    if filters.is_empty() {
        return;
    }
    let parts: Vec<String> = filters.iter().map(Filter::to_sql).collect();
    sql.push_str(&format!(" WHERE {}", parts.join(" AND ")));
    params.extend(filters.iter().map(Filter::param));
}

// ── Row mapping traits ──────────────────────────────────────────────────────

/// A type decoded from a select over [`Entity::TABLE`].
pub trait Entity: Sized {
    /// Table the rows are selected from.
    const TABLE: &'static TableDef;

    /// Select-list, in the order [`Entity::from_row`] reads it.
    fn projection() -> Vec<Expr>;

    /// Joins every select of this entity needs.
    fn joins() -> Vec<Join> {
        Vec::new()
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// A persisted entity with an integer primary key.
pub trait Record: Entity {
    const PRIMARY_KEY: Column;

    fn id(&self) -> i64;

    /// Every column except the primary key, with its value.
    fn values(&self) -> Vec<(Column, Value)>;
}

// ── SELECT ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Select<E> {
    joins: Vec<Join>,
    filters: Vec<Filter>,
    group_by: Vec<Column>,
    order_by: Vec<(Expr, Order)>,
    limit: Option<usize>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for Select<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Select<E> {
    pub fn new() -> Self {
        Self {
            joins: E::joins(),
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            _marker: PhantomData,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn order_by(mut self, expr: impl Into<Expr>, order: Order) -> Self {
        self.order_by.push((expr.into(), order));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Tables this query reads; writes to any of them invalidate its result.
    pub fn tables(&self) -> Vec<TableId> {
        let mut tables = vec![E::TABLE.id];
        for join in &self.joins {
            if !tables.contains(&join.table.id) {
                tables.push(join.table.id);
            }
        }
        tables
    }

    fn from_clause(&self) -> String {
        let mut sql = format!(" FROM {}", E::TABLE.name);
        for join in &self.joins {
            sql.push_str(&format!(
                " INNER JOIN {} ON {} = {}",
                join.table.name, join.left, join.right
            ));
        }
        sql
    }

    /// Render SQL with `?` placeholders and the flattened params.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let projection: Vec<String> = E::projection().into_iter().map(Expr::to_sql).collect();
        let mut sql = format!("SELECT {}{}", projection.join(", "), self.from_clause());
        let mut params = Vec::new();

        where_clause(&self.filters, &mut sql, &mut params);

        if !self.group_by.is_empty() {
            let cols: Vec<String> = self.group_by.iter().map(Column::to_string).collect();
            sql.push_str(&format!(" GROUP BY {}", cols.join(", ")));
        }

        if !self.order_by.is_empty() {
            let parts: Vec<String> = self
                .order_by
                .iter()
                .map(|(e, o)| format!("{} {}", e.to_sql(), o.as_str()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", parts.join(", ")));
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        (sql, params)
    }

    /// Execute and decode all rows.
    pub fn fetch_all(&self, conn: &Connection) -> Result<Vec<E>, StoreError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), E::from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Execute and decode at most one row.
    pub fn fetch_optional(&self, conn: &Connection) -> Result<Option<E>, StoreError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        match rows.next()? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// `SELECT COUNT(*)` over the same FROM and WHERE.
    pub fn count(&self, conn: &Connection) -> Result<i64, StoreError> {
        let mut sql = format!("SELECT COUNT(*){}", self.from_clause());
        let mut params = Vec::new();
        where_clause(&self.filters, &mut sql, &mut params);
        let n: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(n)
    }
}

// ── INSERT ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Insert<E> {
    values: Vec<(Column, Value)>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Record> Insert<E> {
    /// Insert every non-key column of `record`.
    pub fn record(record: &E) -> Self {
        Self {
            values: record.values(),
            _marker: PhantomData,
        }
    }

    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let cols: Vec<&str> = self.values.iter().map(|(c, _)| c.name).collect();
        let placeholders = vec!["?"; cols.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE.name,
            cols.join(", "),
            placeholders
        );
        let params = self.values.iter().map(|(_, v)| v.clone()).collect();
        (sql, params)
    }

    /// Execute and return the generated row id.
    pub fn exec(&self, conn: &Connection) -> Result<i64, StoreError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(params.iter()))?;
        Ok(conn.last_insert_rowid())
    }
}

// ── UPDATE ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Update<E> {
    sets: Vec<(Column, Value)>,
    filters: Vec<Filter>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Record> Update<E> {
    /// Replace every non-key column of the row with `record`'s id.
    pub fn record(record: &E) -> Self {
        Self {
            sets: record.values(),
            filters: vec![Filter::eq(E::PRIMARY_KEY, record.id())],
            _marker: PhantomData,
        }
    }

    pub fn set(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let sets: Vec<String> = self
            .sets
            .iter()
            .map(|(c, _)| format!("{} = ?", c.name))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", E::TABLE.name, sets.join(", "));
        let mut params: Vec<Value> = self.sets.iter().map(|(_, v)| v.clone()).collect();
        where_clause(&self.filters, &mut sql, &mut params);
        (sql, params)
    }

    /// Execute and return the number of rows changed.
    pub fn exec(&self, conn: &Connection) -> Result<usize, StoreError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(params_from_iter(params.iter()))?)
    }
}

// ── DELETE ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Delete<E> {
    filters: Vec<Filter>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Record> Default for Delete<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Record> Delete<E> {
    /// Without filters this deletes every row.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self::new().filter(Filter::eq(E::PRIMARY_KEY, id))
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Tables whose rows this delete can remove, cascades included.
    pub fn tables(&self) -> Vec<TableId> {
        E::TABLE.delete_touches()
    }

    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", E::TABLE.name);
        let mut params = Vec::new();
        where_clause(&self.filters, &mut sql, &mut params);
        (sql, params)
    }

    /// Execute and return the number of rows deleted from this table.
    pub fn exec(&self, conn: &Connection) -> Result<usize, StoreError> {
        let (sql, params) = self.to_sql();
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(params_from_iter(params.iter()))?)
    }
}
