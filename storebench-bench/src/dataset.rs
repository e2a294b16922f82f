//! Synthetic product datasets.

use storebench_core::Product;

/// Products generated per insert benchmark unless configured otherwise.
pub const DEFAULT_DATASET_SIZE: usize = 1000;

/// Prices are uniform in `[0, MAX_PRICE)`.
pub const MAX_PRICE: f64 = 1000.0;

/// Stock levels are uniform in `[0, MAX_STOCK)`.
pub const MAX_STOCK: i64 = 100;

/// Name of the `i`-th generated product.
pub fn product_name(i: usize) -> String {
    format!("Product {i}")
}

/// Random source for datasets. Seeded generators produce the same
/// sequence of datasets on every run.
pub struct DatasetGenerator {
    rng: fastrand::Rng,
}

impl DatasetGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }

    /// `size` products in `category_id`, named by position from 0.
    pub fn products(&mut self, size: usize, category_id: i64) -> Vec<Product> {
        (0..size)
            .map(|i| {
                let price = self.rng.f64() * MAX_PRICE;
                let stock = self.rng.i64(0..MAX_STOCK);
                Product::new(product_name(i), price, category_id, stock)
            })
            .collect()
    }
}
