//! [`Entity`]/[`Record`] mappings for the shared model types.

use rusqlite::types::Value;
use storebench_core::sql::{format_timestamp, timestamp_column};
use storebench_core::{Category, Product, ProductWithCategory, StockTotal};

use crate::query::{Entity, Expr, Join, Record};
use crate::table::{categories, products, Column, TableDef, CATEGORIES, PRODUCTS};

const PRODUCT_PROJECTION: [Column; 6] = [
    products::ID,
    products::NAME,
    products::PRICE,
    products::CATEGORY_ID,
    products::STOCK,
    products::CREATED_AT,
];

fn products_to_categories() -> Join {
    Join::inner(&CATEGORIES, products::CATEGORY_ID, categories::ID)
}

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        category_id: row.get(3)?,
        stock: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

impl Entity for Category {
    const TABLE: &'static TableDef = &CATEGORIES;

    fn projection() -> Vec<Expr> {
        vec![
            categories::ID.into(),
            categories::NAME.into(),
            categories::DESCRIPTION.into(),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }
}

impl Record for Category {
    const PRIMARY_KEY: Column = categories::ID;

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(Column, Value)> {
        vec![
            (categories::NAME, Value::Text(self.name.clone())),
            (categories::DESCRIPTION, self.description.clone().into()),
        ]
    }
}

impl Entity for Product {
    const TABLE: &'static TableDef = &PRODUCTS;

    fn projection() -> Vec<Expr> {
        PRODUCT_PROJECTION.into_iter().map(Expr::from).collect()
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        product_from_row(row)
    }
}

impl Record for Product {
    const PRIMARY_KEY: Column = products::ID;

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(Column, Value)> {
        vec![
            (products::NAME, Value::Text(self.name.clone())),
            (products::PRICE, Value::Real(self.price)),
            (products::CATEGORY_ID, Value::Integer(self.category_id)),
            (products::STOCK, Value::Integer(self.stock)),
            (
                products::CREATED_AT,
                Value::Text(format_timestamp(&self.created_at)),
            ),
        ]
    }
}

impl Entity for ProductWithCategory {
    const TABLE: &'static TableDef = &PRODUCTS;

    fn projection() -> Vec<Expr> {
        let mut exprs: Vec<Expr> = PRODUCT_PROJECTION.into_iter().map(Expr::from).collect();
        exprs.push(categories::NAME.into());
        exprs
    }

    fn joins() -> Vec<Join> {
        vec![products_to_categories()]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(ProductWithCategory {
            product: product_from_row(row)?,
            category_name: row.get(6)?,
        })
    }
}

impl Entity for StockTotal {
    const TABLE: &'static TableDef = &PRODUCTS;

    fn projection() -> Vec<Expr> {
        vec![categories::NAME.into(), Expr::Sum(products::STOCK)]
    }

    fn joins() -> Vec<Join> {
        vec![products_to_categories()]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(StockTotal {
            category_name: row.get(0)?,
            total_stock: row.get(1)?,
        })
    }
}
