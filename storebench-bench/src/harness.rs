//! The timed benchmark sequence.
//!
//! A run walks `Idle -> Running -> (GenerateData -> Invoke -> Record per
//! layer) for every operation -> Idle`. Each store is reset and its first
//! category resolved before the clock starts; those steps are not timed.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use storebench_core::{CatalogStore, Product, StoreError};

use crate::dataset::{DEFAULT_DATASET_SIZE, DatasetGenerator};
use crate::error::BenchError;
use crate::progress::BenchProgress;
use crate::report::BenchmarkReport;

/// Substring searched for by the search benchmark. Matches every
/// generated product name.
pub const SEARCH_NEEDLE: &str = "Product";

/// Which access layer a store or result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Direct,
    Managed,
}

impl Layer {
    /// Run order within each operation.
    pub const ALL: [Layer; 2] = [Layer::Direct, Layer::Managed];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Direct => "direct",
            Layer::Managed => "managed",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One timed benchmark operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `batch_insert_products` of a freshly generated dataset.
    Insert,
    /// `list_products` full scan.
    List,
    /// `list_products_with_category`.
    Join,
    /// `search_products(SEARCH_NEEDLE)`.
    Search,
    /// `stock_by_category`.
    Aggregate,
}

impl Operation {
    /// Run order of a full sequence.
    pub const ALL: [Operation; 5] = [
        Operation::Insert,
        Operation::List,
        Operation::Join,
        Operation::Search,
        Operation::Aggregate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::List => "list",
            Operation::Join => "join",
            Operation::Search => "search",
            Operation::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Where the harness is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    Running,
    GenerateData { operation: Operation },
    Invoke { operation: Operation, layer: Layer },
    Record { operation: Operation, layer: Layer },
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessState::Idle => write!(f, "idle"),
            HarnessState::Running => write!(f, "running"),
            HarnessState::GenerateData { operation } => {
                write!(f, "generating data for {operation}")
            }
            HarnessState::Invoke { operation, layer } => write!(f, "{operation} on {layer}"),
            HarnessState::Record { operation, layer } => {
                write!(f, "recording {operation} on {layer}")
            }
        }
    }
}

/// Elapsed time of one call on one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub operation: Operation,
    pub layer: Layer,
    /// Items inserted or rows returned.
    pub count: usize,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub dataset_size: usize,
    /// Fixes the generated datasets when set.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            dataset_size: DEFAULT_DATASET_SIZE,
            seed: None,
        }
    }
}

/// Drives the benchmark sequence over a direct and a managed store.
pub struct BenchmarkHarness<'a> {
    direct: &'a dyn CatalogStore,
    managed: &'a dyn CatalogStore,
    config: HarnessConfig,
    generator: DatasetGenerator,
    state: HarnessState,
}

impl<'a> BenchmarkHarness<'a> {
    pub fn new(
        direct: &'a dyn CatalogStore,
        managed: &'a dyn CatalogStore,
        config: HarnessConfig,
    ) -> Self {
        Self {
            direct,
            managed,
            config,
            generator: DatasetGenerator::new(config.seed),
            state: HarnessState::Idle,
        }
    }

    pub fn config(&self) -> HarnessConfig {
        self.config
    }

    /// Current state; `Idle` between runs.
    pub fn state(&self) -> HarnessState {
        self.state
    }

    fn store(&self, layer: Layer) -> &'a dyn CatalogStore {
        match layer {
            Layer::Direct => self.direct,
            Layer::Managed => self.managed,
        }
    }

    fn transition(&mut self, state: HarnessState, progress: Option<&dyn BenchProgress>) {
        self.state = state;
        if let Some(p) = progress {
            p.on_state(&state);
        }
    }

    /// Run the full sequence once.
    ///
    /// A failing call stops the sequence; the report then holds the results
    /// recorded before the failure together with the error.
    pub fn run(&mut self, progress: Option<&dyn BenchProgress>) -> BenchmarkReport {
        self.run_rounds(1, progress)
    }

    /// Run the full sequence `rounds` times, stopping at the first failure.
    pub fn run_rounds(
        &mut self,
        rounds: usize,
        progress: Option<&dyn BenchProgress>,
    ) -> BenchmarkReport {
        let mut results = Vec::with_capacity(rounds * Operation::ALL.len() * Layer::ALL.len());
        let mut error = None;

        self.transition(HarnessState::Running, progress);
        for round in 1..=rounds {
            log::debug!("Benchmark round {}/{}", round, rounds);
            if let Err(e) = self.run_sequence(&mut results, progress) {
                log::warn!("{}", e);
                error = Some(e);
                break;
            }
        }
        self.transition(HarnessState::Idle, progress);

        let report = BenchmarkReport::new(results, error);
        if let Some(p) = progress {
            let message = match &report.error {
                Some(e) => format!("Benchmark aborted: {e}"),
                None => format!("Benchmark complete: {} timed calls", report.results.len()),
            };
            p.on_complete(&message);
        }
        report
    }

    fn run_sequence(
        &mut self,
        results: &mut Vec<BenchmarkResult>,
        progress: Option<&dyn BenchProgress>,
    ) -> Result<(), BenchError> {
        let direct_category = self.prepare(Layer::Direct)?;
        let managed_category = self.prepare(Layer::Managed)?;

        for operation in Operation::ALL {
            self.transition(HarnessState::GenerateData { operation }, progress);
            let datasets = match operation {
                Operation::Insert => Some((
                    self.generator
                        .products(self.config.dataset_size, direct_category),
                    self.generator
                        .products(self.config.dataset_size, managed_category),
                )),
                _ => None,
            };

            for layer in Layer::ALL {
                self.transition(HarnessState::Invoke { operation, layer }, progress);
                let batch = datasets.as_ref().map(|(direct, managed)| match layer {
                    Layer::Direct => direct.as_slice(),
                    Layer::Managed => managed.as_slice(),
                });
                let store = self.store(layer);

                let start = Instant::now();
                let outcome = invoke(store, operation, batch);
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

                let count = outcome.map_err(|source| BenchError::Aborted {
                    operation,
                    layer,
                    source,
                })?;

                self.transition(HarnessState::Record { operation, layer }, progress);
                let result = BenchmarkResult {
                    operation,
                    layer,
                    count,
                    duration_ms,
                };
                log::debug!("{} on {}: {:.3} ms", operation, layer, duration_ms);
                if let Some(p) = progress {
                    p.on_result(&result);
                }
                results.push(result);
            }
        }
        Ok(())
    }

    /// Reset `layer`'s store and return the id products are attached to.
    fn prepare(&self, layer: Layer) -> Result<i64, BenchError> {
        let store = self.store(layer);
        let setup = |source| BenchError::Setup { layer, source };
        store.clear_all().map_err(setup)?;
        let categories = store.list_categories().map_err(setup)?;
        categories
            .first()
            .map(|c| c.id)
            .ok_or(BenchError::NoCategory { layer })
    }
}

/// Execute one operation and return the number of items it processed.
fn invoke(
    store: &dyn CatalogStore,
    operation: Operation,
    batch: Option<&[Product]>,
) -> Result<usize, StoreError> {
    match operation {
        Operation::Insert => {
            let batch = batch.unwrap_or_default();
            store.batch_insert_products(batch)?;
            Ok(batch.len())
        }
        Operation::List => Ok(store.list_products()?.len()),
        Operation::Join => Ok(store.list_products_with_category()?.len()),
        Operation::Search => Ok(store.search_products(SEARCH_NEEDLE)?.len()),
        Operation::Aggregate => Ok(store.stock_by_category()?.len()),
    }
}
