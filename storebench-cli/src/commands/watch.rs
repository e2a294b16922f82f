use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storebench_bench::DatasetGenerator;
use storebench_core::{CatalogStore, Product};
use storebench_managed::Subscription;

use crate::CliError;

use super::open_managed;

/// Subscribe to the managed product list, insert `inserts` products one at
/// a time, and print every snapshot the subscription receives.
pub(crate) fn run_watch(data_dir: &Path, inserts: usize) -> Result<(), CliError> {
    let store = open_managed(data_dir)?;
    let category = store
        .list_categories()
        .map_err(|e| CliError::database(format!("Failed to list categories: {}", e)))?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::other("No category to insert into"))?;

    let mut sub = store
        .watch_products()
        .map_err(|e| CliError::database(format!("Failed to subscribe: {}", e)))?;

    log::info!(
        "{}",
        format!("Watching products on managed (subscription {})", sub.id())
            .if_supports_color(Stdout, |t| t.bold()),
    );
    let initial = sub
        .blocking_recv()
        .ok_or_else(|| CliError::other("Subscription closed before its first snapshot"))?;
    print_snapshot(&initial, "initial");

    let offset = store
        .count()
        .map_err(|e| CliError::database(format!("Failed to count products: {}", e)))?
        .products;
    let mut generator = DatasetGenerator::new(None);
    for (i, mut product) in generator
        .products(inserts, category.id)
        .into_iter()
        .enumerate()
    {
        product.name = format!("Watched {}", offset as usize + i);
        store
            .create_product(&product)
            .map_err(|e| CliError::database(format!("Insert failed: {}", e)))?;
        print_pending(&mut sub, &format!("insert {}", i + 1));
    }

    store.unsubscribe(sub.id());
    Ok(())
}

fn print_pending(sub: &mut Subscription<Vec<Product>>, label: &str) {
    while let Some(snapshot) = sub.try_recv() {
        print_snapshot(&snapshot, label);
    }
}

fn print_snapshot(snapshot: &[Product], label: &str) {
    let newest = snapshot.first().map_or("-", |p| p.name.as_str());
    log::info!(
        "  {:<12} {:>6} products, newest: {}",
        label.if_supports_color(Stdout, |t| t.cyan()),
        snapshot.len(),
        newest,
    );
}
