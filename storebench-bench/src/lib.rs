//! Benchmark harness comparing the direct and managed access layers.
//!
//! The harness only sees [`storebench_core::CatalogStore`]: it resets both
//! stores, generates a synthetic dataset per layer, times each operation on
//! one layer and then the other, and aggregates the durations into a
//! [`BenchmarkReport`].

pub mod dataset;
pub mod error;
pub mod harness;
pub mod progress;
pub mod report;

pub use dataset::{DEFAULT_DATASET_SIZE, DatasetGenerator};
pub use error::BenchError;
pub use harness::{
    BenchmarkHarness, BenchmarkResult, HarnessConfig, HarnessState, Layer, Operation,
    SEARCH_NEEDLE,
};
pub use progress::{BenchProgress, LogProgress, SilentProgress};
pub use report::{BenchmarkReport, LayerSummary, OperationComparison};
