//! Aggregation of benchmark results.

use serde::Serialize;

use crate::error::BenchError;
use crate::harness::{BenchmarkResult, Layer, Operation};

/// Mean duration of one layer's calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub layer: Layer,
    pub calls: usize,
    pub mean_ms: f64,
}

/// Mean durations of one operation on both layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationComparison {
    pub operation: Operation,
    pub direct_mean_ms: f64,
    pub managed_mean_ms: f64,
    /// `None` when both means are equal.
    pub faster: Option<Layer>,
}

/// Everything a run produced, including the error that stopped it.
#[derive(Debug, Serialize)]
pub struct BenchmarkReport {
    /// Timed calls in run order.
    pub results: Vec<BenchmarkResult>,
    pub layers: Vec<LayerSummary>,
    pub operations: Vec<OperationComparison>,
    /// Lower mean over all calls; `None` on a tie or without results for
    /// both layers.
    pub winner: Option<Layer>,
    /// `|high - low| / low * 100`; `None` when the lower mean is 0.
    pub percent_diff: Option<f64>,
    #[serde(skip)]
    pub error: Option<BenchError>,
}

impl BenchmarkReport {
    pub fn new(results: Vec<BenchmarkResult>, error: Option<BenchError>) -> Self {
        let layers: Vec<LayerSummary> = Layer::ALL
            .into_iter()
            .filter_map(|layer| summarize_layer(&results, layer))
            .collect();

        let operations = Operation::ALL
            .into_iter()
            .filter_map(|operation| compare_operation(&results, operation))
            .collect();

        let (winner, percent_diff) = match layers.as_slice() {
            [a, b] => (faster(a.mean_ms, b.mean_ms), percent_diff(a.mean_ms, b.mean_ms)),
            _ => (None, None),
        };

        Self {
            results,
            layers,
            operations,
            winner,
            percent_diff,
            error,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn summary(&self, layer: Layer) -> Option<&LayerSummary> {
        self.layers.iter().find(|s| s.layer == layer)
    }
}

fn mean(durations: impl Iterator<Item = f64>) -> Option<(usize, f64)> {
    let (n, total) = durations.fold((0usize, 0.0), |(n, total), d| (n + 1, total + d));
    (n > 0).then(|| (n, total / n as f64))
}

fn summarize_layer(results: &[BenchmarkResult], layer: Layer) -> Option<LayerSummary> {
    let durations = results
        .iter()
        .filter(|r| r.layer == layer)
        .map(|r| r.duration_ms);
    mean(durations).map(|(calls, mean_ms)| LayerSummary {
        layer,
        calls,
        mean_ms,
    })
}

fn compare_operation(
    results: &[BenchmarkResult],
    operation: Operation,
) -> Option<OperationComparison> {
    let layer_mean = |layer: Layer| {
        mean(
            results
                .iter()
                .filter(|r| r.operation == operation && r.layer == layer)
                .map(|r| r.duration_ms),
        )
        .map(|(_, m)| m)
    };
    let direct_mean_ms = layer_mean(Layer::Direct)?;
    let managed_mean_ms = layer_mean(Layer::Managed)?;
    Some(OperationComparison {
        operation,
        direct_mean_ms,
        managed_mean_ms,
        faster: faster(direct_mean_ms, managed_mean_ms),
    })
}

/// The layer with the lower mean, direct first.
fn faster(direct_ms: f64, managed_ms: f64) -> Option<Layer> {
    if direct_ms < managed_ms {
        Some(Layer::Direct)
    } else if managed_ms < direct_ms {
        Some(Layer::Managed)
    } else {
        None
    }
}

fn percent_diff(a: f64, b: f64) -> Option<f64> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    (low > 0.0).then(|| (high - low) / low * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(operation: Operation, layer: Layer, duration_ms: f64) -> BenchmarkResult {
        BenchmarkResult {
            operation,
            layer,
            count: 0,
            duration_ms,
        }
    }

    #[test]
    fn winner_and_percent_diff() {
        let report = BenchmarkReport::new(
            vec![
                result(Operation::Insert, Layer::Direct, 10.0),
                result(Operation::Insert, Layer::Managed, 20.0),
                result(Operation::List, Layer::Direct, 30.0),
                result(Operation::List, Layer::Managed, 20.0),
            ],
            None,
        );
        assert_eq!(report.summary(Layer::Direct).unwrap().mean_ms, 20.0);
        assert_eq!(report.summary(Layer::Managed).unwrap().mean_ms, 20.0);
        assert_eq!(report.winner, None);
        assert_eq!(report.percent_diff, Some(0.0));

        assert_eq!(report.operations.len(), 2);
        assert_eq!(report.operations[0].faster, Some(Layer::Direct));
        assert_eq!(report.operations[1].faster, Some(Layer::Managed));
    }

    #[test]
    fn percent_diff_is_relative_to_lower_mean() {
        assert_eq!(percent_diff(4.0, 5.0), Some(25.0));
        assert_eq!(percent_diff(5.0, 4.0), Some(25.0));
        assert_eq!(percent_diff(0.0, 3.0), None);
    }

    #[test]
    fn partial_results_only_compare_complete_operations() {
        let report = BenchmarkReport::new(
            vec![
                result(Operation::Insert, Layer::Direct, 1.0),
                result(Operation::Insert, Layer::Managed, 2.0),
                result(Operation::List, Layer::Direct, 1.0),
            ],
            None,
        );
        assert_eq!(report.operations.len(), 1);
        assert_eq!(report.winner, Some(Layer::Direct));
        assert_eq!(report.summary(Layer::Direct).unwrap().calls, 2);
    }

    #[test]
    fn empty_run_has_no_winner() {
        let report = BenchmarkReport::new(Vec::new(), None);
        assert!(report.layers.is_empty());
        assert_eq!(report.winner, None);
        assert_eq!(report.percent_diff, None);
    }
}
