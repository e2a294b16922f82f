//! Per-store data commands. Each runs once for every store selected by
//! `--layer`.

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storebench_bench::DatasetGenerator;
use storebench_core::{CatalogStore, Product, StoreError};

use crate::CliError;
use crate::cli_types::LayerArg;

use super::{open_selected, truncate_str};

/// Which product listing to show.
pub(crate) enum ProductFilter {
    All,
    Category(i64),
    Search(String),
    Joined,
}

fn db_err(what: &str, layer: &str) -> impl Fn(StoreError) -> CliError {
    let context = format!("{} failed on {}", what, layer);
    move |e| CliError::database(format!("{}: {}", context, e))
}

fn layer_header(store: &dyn CatalogStore) {
    log::info!(
        "{}",
        format!("[{}]", store.layer_name()).if_supports_color(Stdout, |t| t.bold()),
    );
}

pub(crate) fn run_stats(data_dir: &Path, layer: LayerArg) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let counts = store
            .count()
            .map_err(db_err("Counting rows", store.layer_name()))?;
        layer_header(&*store);
        log::info!("  Categories: {:>8}", counts.categories);
        log::info!("  Products:   {:>8}", counts.products);
    }
    Ok(())
}

pub(crate) fn run_reset(data_dir: &Path, layer: LayerArg) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        store
            .clear_all()
            .map_err(db_err("Reset", store.layer_name()))?;
        log::info!(
            "{} store reset to the sample categories.",
            store.layer_name().if_supports_color(Stdout, |t| t.bold()),
        );
    }
    Ok(())
}

pub(crate) fn run_seed(
    data_dir: &Path,
    layer: LayerArg,
    count: usize,
    seed: Option<u64>,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let name = store.layer_name();
        let category = store
            .list_categories()
            .map_err(db_err("Listing categories", name))?
            .into_iter()
            .next()
            .ok_or_else(|| CliError::other(format!("No category to seed into on {}", name)))?;

        let batch = DatasetGenerator::new(seed).products(count, category.id);
        store
            .batch_insert_products(&batch)
            .map_err(db_err("Seeding", name))?;
        log::info!(
            "Inserted {} products into {} on {}",
            count.if_supports_color(Stdout, |t| t.green()),
            category.name,
            name,
        );
    }
    Ok(())
}

pub(crate) fn run_categories(data_dir: &Path, layer: LayerArg) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let categories = store
            .list_categories()
            .map_err(db_err("Listing categories", store.layer_name()))?;
        layer_header(&*store);
        for c in &categories {
            log::info!(
                "  {:>5}  {:<20} {}",
                c.id,
                truncate_str(&c.name, 20),
                c.description
                    .as_deref()
                    .unwrap_or("")
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}

pub(crate) fn run_add_category(
    data_dir: &Path,
    layer: LayerArg,
    name: &str,
    description: Option<&str>,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let category = store
            .create_category(name, description)
            .map_err(db_err("Creating category", store.layer_name()))?;
        log::info!(
            "Created category {} ({}) on {}",
            category.id.if_supports_color(Stdout, |t| t.green()),
            category.name,
            store.layer_name(),
        );
    }
    Ok(())
}

pub(crate) fn run_delete_category(
    data_dir: &Path,
    layer: LayerArg,
    id: i64,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let deleted = store
            .delete_category(id)
            .map_err(db_err("Deleting category", store.layer_name()))?;
        report_delete(&*store, "category", id, deleted);
    }
    Ok(())
}

fn report_delete(store: &dyn CatalogStore, what: &str, id: i64, deleted: usize) {
    if deleted == 0 {
        log::warn!("No {} with id {} on {}", what, id, store.layer_name());
    } else {
        log::info!("Deleted {} {} on {}", what, id, store.layer_name());
    }
}

fn log_product(p: &Product, category: Option<&str>) {
    let category = match category {
        Some(name) => truncate_str(name, 14),
        None => p.category_id.to_string(),
    };
    log::info!(
        "  {:>6}  {:<24} {:>10.2} {:>6}  {:<14} {}",
        p.id,
        truncate_str(&p.name, 24),
        p.price,
        p.stock,
        category,
        p.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
}

pub(crate) fn run_products(
    data_dir: &Path,
    layer: LayerArg,
    filter: &ProductFilter,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let name = store.layer_name();
        layer_header(&*store);
        let shown = match filter {
            ProductFilter::Joined => {
                let rows = store
                    .list_products_with_category()
                    .map_err(db_err("Listing products", name))?;
                for row in &rows {
                    log_product(&row.product, Some(&row.category_name));
                }
                rows.len()
            }
            ProductFilter::All | ProductFilter::Category(_) | ProductFilter::Search(_) => {
                let products = match filter {
                    ProductFilter::Category(id) => store.list_products_by_category(*id),
                    ProductFilter::Search(needle) => store.search_products(needle),
                    _ => store.list_products(),
                }
                .map_err(db_err("Listing products", name))?;
                for p in &products {
                    log_product(p, None);
                }
                products.len()
            }
        };
        log::info!(
            "  {}",
            format!("{} products", shown).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

pub(crate) fn run_add_product(
    data_dir: &Path,
    layer: LayerArg,
    name: &str,
    price: f64,
    category_id: i64,
    stock: i64,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let product = store
            .create_product(&Product::new(name, price, category_id, stock))
            .map_err(db_err("Creating product", store.layer_name()))?;
        log::info!(
            "Created product {} ({}) on {}",
            product.id.if_supports_color(Stdout, |t| t.green()),
            product.name,
            store.layer_name(),
        );
    }
    Ok(())
}

pub(crate) fn run_delete_product(
    data_dir: &Path,
    layer: LayerArg,
    id: i64,
) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let deleted = store
            .delete_product(id)
            .map_err(db_err("Deleting product", store.layer_name()))?;
        report_delete(&*store, "product", id, deleted);
    }
    Ok(())
}

pub(crate) fn run_stock(data_dir: &Path, layer: LayerArg) -> Result<(), CliError> {
    for store in open_selected(data_dir, layer)? {
        let totals = store
            .stock_by_category()
            .map_err(db_err("Aggregating stock", store.layer_name()))?;
        layer_header(&*store);
        if totals.is_empty() {
            log::info!("  No products.");
        }
        for t in &totals {
            log::info!("  {:<20} {:>10}", truncate_str(&t.category_name, 20), t.total_stock);
        }
    }
    Ok(())
}
