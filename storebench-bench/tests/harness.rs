use storebench_bench::*;
use storebench_core::CatalogStore;
use storebench_direct::DirectStore;
use storebench_managed::ManagedStore;

fn stores() -> (DirectStore, ManagedStore) {
    (
        DirectStore::open_in_memory().unwrap(),
        ManagedStore::open_in_memory().unwrap(),
    )
}

fn config(dataset_size: usize) -> HarnessConfig {
    HarnessConfig {
        dataset_size,
        seed: Some(42),
    }
}

fn labels(report: &BenchmarkReport) -> Vec<(Operation, Layer)> {
    report.results.iter().map(|r| (r.operation, r.layer)).collect()
}

#[test]
fn full_run_records_every_operation_on_both_layers() {
    let (direct, managed) = stores();
    let mut harness = BenchmarkHarness::new(&direct, &managed, config(1000));
    let report = harness.run(None);

    assert!(report.is_complete(), "{:?}", report.error);
    assert_eq!(harness.state(), HarnessState::Idle);
    assert_eq!(report.results.len(), Operation::ALL.len() * Layer::ALL.len());

    for result in &report.results {
        assert!(result.duration_ms >= 0.0);
        let expected = match result.operation {
            Operation::Insert | Operation::List | Operation::Join | Operation::Search => 1000,
            Operation::Aggregate => 1,
        };
        assert_eq!(result.count, expected, "{:?}", result);
    }

    assert_eq!(direct.list_products().unwrap().len(), 1000);
    assert_eq!(managed.list_products().unwrap().len(), 1000);
    assert_eq!(report.layers.len(), 2);
    assert_eq!(report.operations.len(), Operation::ALL.len());
}

#[test]
fn repeated_runs_have_identical_label_order() {
    let (direct, managed) = stores();
    let mut harness = BenchmarkHarness::new(&direct, &managed, config(50));
    let first = harness.run(None);
    let second = harness.run(None);

    assert_eq!(first.results.len(), second.results.len());
    assert_eq!(labels(&first), labels(&second));
    assert_eq!(
        labels(&first)[..2],
        [(Operation::Insert, Layer::Direct), (Operation::Insert, Layer::Managed)]
    );
    // Each run starts from a reset store.
    assert_eq!(direct.count().unwrap().products, 50);
}

#[test]
fn rounds_multiply_results() {
    let (direct, managed) = stores();
    let mut harness = BenchmarkHarness::new(&direct, &managed, config(10));
    let report = harness.run_rounds(3, Some(&SilentProgress));

    assert!(report.is_complete());
    assert_eq!(report.results.len(), 3 * 10);
    assert_eq!(report.summary(Layer::Direct).unwrap().calls, 15);
}

#[test]
fn failing_call_aborts_and_keeps_partial_results() {
    let (direct, managed) = stores();
    managed
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_products BEFORE INSERT ON products
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let mut harness = BenchmarkHarness::new(&direct, &managed, config(100));
    let report = harness.run(None);

    assert_eq!(
        labels(&report),
        vec![(Operation::Insert, Layer::Direct)]
    );
    match &report.error {
        Some(BenchError::Aborted {
            operation, layer, ..
        }) => {
            assert_eq!(*operation, Operation::Insert);
            assert_eq!(*layer, Layer::Managed);
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
    assert_eq!(harness.state(), HarnessState::Idle);
    assert_eq!(direct.count().unwrap().products, 100);
    assert_eq!(managed.count().unwrap().products, 0);
    assert_eq!(report.winner, None);
}

#[test]
fn setup_failure_records_nothing() {
    let (direct, managed) = stores();
    managed
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_categories BEFORE INSERT ON categories
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let mut harness = BenchmarkHarness::new(&direct, &managed, config(10));
    let report = harness.run(None);

    assert!(report.results.is_empty());
    assert!(matches!(
        report.error,
        Some(BenchError::Setup {
            layer: Layer::Managed,
            ..
        })
    ));
}

#[test]
fn seeded_runs_insert_identical_datasets() {
    let prices = |seed| {
        let (direct, managed) = stores();
        let mut harness = BenchmarkHarness::new(
            &direct,
            &managed,
            HarnessConfig {
                dataset_size: 20,
                seed: Some(seed),
            },
        );
        harness.run(None);
        let mut prices: Vec<f64> = direct
            .list_products()
            .unwrap()
            .into_iter()
            .map(|p| p.price)
            .collect();
        prices.sort_by(f64::total_cmp);
        prices
    };
    assert_eq!(prices(7), prices(7));
}
