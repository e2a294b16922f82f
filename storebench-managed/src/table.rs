//! Typed table and column definitions.
//!
//! The managed layer never embeds table or column names in ad-hoc SQL:
//! everything is addressed through the [`Column`] constants below, and the
//! DDL is rendered from the [`TableDef`]s.

use std::fmt;

/// Identity of a table, used to route change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    Categories,
    Products,
}

/// A column qualified by its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// SQLite storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    fn as_str(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

/// Column definition with its constraints, built with const combinators.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub column: Column,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
    pub check: Option<&'static str>,
    /// Referenced column; rows are deleted along with the referenced row.
    pub references: Option<Column>,
}

impl ColumnDef {
    pub const fn new(column: Column, sql_type: SqlType) -> Self {
        Self {
            column,
            sql_type,
            primary_key: false,
            not_null: false,
            unique: false,
            default: None,
            check: None,
            references: None,
        }
    }

    /// `INTEGER PRIMARY KEY AUTOINCREMENT`
    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }

    pub const fn not_null(self) -> Self {
        Self {
            not_null: true,
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn default_expr(self, expr: &'static str) -> Self {
        Self {
            default: Some(expr),
            ..self
        }
    }

    pub const fn check(self, expr: &'static str) -> Self {
        Self {
            check: Some(expr),
            ..self
        }
    }

    pub const fn references_cascade(self, target: Column) -> Self {
        Self {
            references: Some(target),
            ..self
        }
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.column.name, self.sql_type.as_str());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(expr) = self.default {
            sql.push_str(&format!(" DEFAULT {expr}"));
        }
        if let Some(expr) = self.check {
            sql.push_str(&format!(" CHECK ({expr})"));
        }
        if let Some(target) = self.references {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE CASCADE",
                target.table, target.name
            ));
        }
        sql
    }
}

/// A secondary index over one column.
#[derive(Debug, Clone, Copy)]
pub struct IndexDef {
    pub name: &'static str,
    pub column: Column,
}

/// A table definition.
#[derive(Debug)]
pub struct TableDef {
    pub id: TableId,
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub indexes: &'static [IndexDef],
    /// Tables losing rows when a row of this table is deleted.
    pub cascades_to: &'static [TableId],
}

impl TableDef {
    /// `CREATE TABLE` plus `CREATE INDEX` statements, all `IF NOT EXISTS`.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDef::to_sql).collect();
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);\n",
            self.name,
            columns.join(",\n    ")
        );
        for index in self.indexes {
            sql.push_str(&format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({});\n",
                index.name, self.name, index.column.name
            ));
        }
        sql
    }

    /// This table plus every table a delete cascades into.
    pub fn delete_touches(&self) -> Vec<TableId> {
        let mut tables = vec![self.id];
        tables.extend_from_slice(self.cascades_to);
        tables
    }
}

// ── Schema ──────────────────────────────────────────────────────────────────

pub mod categories {
    use super::Column;

    pub const TABLE: &str = "categories";
    pub const ID: Column = Column::new(TABLE, "id");
    pub const NAME: Column = Column::new(TABLE, "name");
    pub const DESCRIPTION: Column = Column::new(TABLE, "description");
}

pub mod products {
    use super::Column;

    pub const TABLE: &str = "products";
    pub const ID: Column = Column::new(TABLE, "id");
    pub const NAME: Column = Column::new(TABLE, "name");
    pub const PRICE: Column = Column::new(TABLE, "price");
    pub const CATEGORY_ID: Column = Column::new(TABLE, "category_id");
    pub const STOCK: Column = Column::new(TABLE, "stock");
    pub const CREATED_AT: Column = Column::new(TABLE, "created_at");
}

pub static CATEGORIES: TableDef = TableDef {
    id: TableId::Categories,
    name: categories::TABLE,
    columns: &[
        ColumnDef::new(categories::ID, SqlType::Integer).primary_key(),
        ColumnDef::new(categories::NAME, SqlType::Text)
            .not_null()
            .unique(),
        ColumnDef::new(categories::DESCRIPTION, SqlType::Text),
    ],
    indexes: &[],
    cascades_to: &[TableId::Products],
};

pub static PRODUCTS: TableDef = TableDef {
    id: TableId::Products,
    name: products::TABLE,
    columns: &[
        ColumnDef::new(products::ID, SqlType::Integer).primary_key(),
        ColumnDef::new(products::NAME, SqlType::Text).not_null(),
        ColumnDef::new(products::PRICE, SqlType::Real)
            .not_null()
            .check("price >= 0"),
        ColumnDef::new(products::CATEGORY_ID, SqlType::Integer)
            .not_null()
            .references_cascade(categories::ID),
        ColumnDef::new(products::STOCK, SqlType::Integer)
            .not_null()
            .default_expr("0"),
        ColumnDef::new(products::CREATED_AT, SqlType::Text).not_null(),
    ],
    indexes: &[
        IndexDef {
            name: "idx_products_category_id",
            column: products::CATEGORY_ID,
        },
        IndexDef {
            name: "idx_products_name",
            column: products::NAME,
        },
    ],
    cascades_to: &[],
};

/// All tables in creation order (referenced tables first).
pub static ALL_TABLES: [&TableDef; 2] = [&CATEGORIES, &PRODUCTS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_ddl_has_constraints() {
        let sql = PRODUCTS.create_sql();
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("price REAL NOT NULL CHECK (price >= 0)"));
        assert!(sql.contains(
            "category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE"
        ));
        assert!(sql.contains("stock INTEGER NOT NULL DEFAULT 0"));
        assert!(sql.contains("CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);"));
    }

    #[test]
    fn category_delete_touches_products() {
        assert_eq!(
            CATEGORIES.delete_touches(),
            vec![TableId::Categories, TableId::Products]
        );
        assert_eq!(PRODUCTS.delete_touches(), vec![TableId::Products]);
    }
}
