use std::io::IsTerminal;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use storebench_bench::{
    BenchProgress, BenchmarkHarness, BenchmarkReport, HarnessConfig, Layer, LogProgress,
    SilentProgress,
};

use crate::CliError;
use crate::settings::Settings;
use crate::spinner::SpinnerProgress;

use super::{open_direct, open_managed};

pub(crate) struct BenchArgs {
    pub size: Option<usize>,
    pub rounds: Option<usize>,
    pub seed: Option<u64>,
    pub json: bool,
    pub quiet: bool,
}

/// Run the harness over both stores in `data_dir` and print the report.
///
/// A run that aborts still prints what it recorded before failing.
pub(crate) fn run_bench(
    data_dir: &Path,
    settings: &Settings,
    args: BenchArgs,
) -> Result<(), CliError> {
    let config = HarnessConfig {
        dataset_size: args.size.unwrap_or(settings.bench.dataset_size),
        seed: args.seed.or(settings.bench.seed),
    };
    let rounds = args.rounds.unwrap_or(settings.bench.rounds).max(1);

    let direct = open_direct(data_dir)?;
    let managed = open_managed(data_dir)?;

    if !args.json {
        log::info!(
            "{}",
            "Benchmark".if_supports_color(Stdout, |t| t.bold()),
        );
        log::info!("  Data dir:     {}", data_dir.display());
        log::info!("  Dataset size: {}", config.dataset_size);
        log::info!("  Rounds:       {}", rounds);
        if let Some(seed) = config.seed {
            log::info!("  Seed:         {}", seed);
        }
        crate::log_blank();
    }

    let progress = select_progress(args.json, args.quiet);
    let mut harness = BenchmarkHarness::new(&direct, &managed, config);
    let report = harness.run_rounds(rounds, Some(progress.as_ref()));

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        print_report(&report);
    }

    match report.error {
        Some(e) => Err(CliError::bench(e.to_string())),
        None => Ok(()),
    }
}

/// JSON mode reports nothing while running; a piped run logs one line per
/// call instead of drawing a spinner.
fn select_progress(json: bool, quiet: bool) -> Box<dyn BenchProgress> {
    if json {
        Box::new(SilentProgress)
    } else if std::io::stdout().is_terminal() {
        Box::new(SpinnerProgress::new(quiet))
    } else {
        Box::new(LogProgress)
    }
}

/// The report as a single pretty-printed JSON document.
fn render_json(report: &BenchmarkReport) -> Result<String, CliError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| CliError::other(format!("Failed to serialize report: {}", e)))
}

fn print_report(report: &BenchmarkReport) {
    if report.results.is_empty() {
        log::warn!("No benchmark results recorded.");
        return;
    }

    log::info!(
        "  {:<10} {:>12} {:>12}  {}",
        "Operation".if_supports_color(Stdout, |t| t.bold()),
        "direct ms",
        "managed ms",
        "faster",
    );
    for cmp in &report.operations {
        let faster = cmp.faster.map_or("tie", Layer::as_str);
        log::info!(
            "  {:<10} {:>12.3} {:>12.3}  {}",
            cmp.operation,
            cmp.direct_mean_ms,
            cmp.managed_mean_ms,
            faster.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    crate::log_blank();

    for summary in &report.layers {
        log::info!(
            "  {:<8} mean {:>10.3} ms over {} calls",
            summary.layer,
            summary.mean_ms,
            summary.calls,
        );
    }

    match (report.winner, report.percent_diff) {
        (Some(winner), Some(pct)) => log::info!(
            "  {} is faster by {:.1}%",
            winner.as_str().if_supports_color(Stdout, |t| t.green()),
            pct,
        ),
        (Some(winner), None) => log::info!(
            "  {} is faster",
            winner.as_str().if_supports_color(Stdout, |t| t.green()),
        ),
        (None, _) if report.layers.len() == 2 => log::info!("  Both layers tied."),
        (None, _) => log::warn!("  Not enough results to compare layers."),
    }
}

#[cfg(test)]
mod tests {
    use storebench_bench::Operation;
    use storebench_direct::DirectStore;
    use storebench_managed::ManagedStore;

    use super::*;

    #[test]
    fn json_report_is_one_parseable_document() {
        let direct = DirectStore::open_in_memory().unwrap();
        let managed = ManagedStore::open_in_memory().unwrap();
        let config = HarnessConfig {
            dataset_size: 5,
            seed: Some(7),
        };
        let report = BenchmarkHarness::new(&direct, &managed, config).run(None);

        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), Operation::ALL.len() * Layer::ALL.len());
        assert!(results.iter().all(|r| r["duration_ms"].is_number()));
        assert_eq!(value["layers"].as_array().unwrap().len(), 2);
        assert!(value.get("error").is_none());
    }
}
