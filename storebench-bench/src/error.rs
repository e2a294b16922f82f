use storebench_core::StoreError;
use thiserror::Error;

use crate::harness::{Layer, Operation};

#[derive(Debug, Error)]
pub enum BenchError {
    /// A timed call failed; the rest of the sequence was skipped.
    #[error("Benchmark aborted during {operation} on {layer}: {source}")]
    Aborted {
        operation: Operation,
        layer: Layer,
        #[source]
        source: StoreError,
    },
    /// Resetting or inspecting a store before the timed sequence failed.
    #[error("Setup failed on {layer}: {source}")]
    Setup {
        layer: Layer,
        #[source]
        source: StoreError,
    },
    #[error("No category available on {layer}")]
    NoCategory { layer: Layer },
}
