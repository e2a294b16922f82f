//! storebench CLI
//!
//! Command-line front end for the direct and managed SQLite layers and the
//! benchmark harness that compares them.

mod cli_types;
mod commands;
mod error;
mod settings;
mod spinner;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;
use settings::Settings;

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Commands whose stdout is a machine-readable document.
fn writes_data_to_stdout(command: &Commands) -> bool {
    matches!(command, Commands::Bench { json: true, .. })
}

fn init_logging(quiet: bool, verbose: bool, target: env_logger::Target) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(target)
        .parse_default_env();

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let data_dir = settings.resolve_data_dir(cli.data_dir.clone());
    let layer = cli.layer;

    match cli.command {
        Commands::Bench {
            size,
            rounds,
            seed,
            json,
        } => commands::bench::run_bench(
            &data_dir,
            &settings,
            commands::bench::BenchArgs {
                size,
                rounds,
                seed,
                json,
                quiet: cli.quiet,
            },
        ),
        Commands::Stats => commands::data::run_stats(&data_dir, layer),
        Commands::Reset => commands::data::run_reset(&data_dir, layer),
        Commands::Seed { count, seed } => commands::data::run_seed(&data_dir, layer, count, seed),
        Commands::Categories => commands::data::run_categories(&data_dir, layer),
        Commands::AddCategory { name, description } => {
            commands::data::run_add_category(&data_dir, layer, &name, description.as_deref())
        }
        Commands::DeleteCategory { id } => {
            commands::data::run_delete_category(&data_dir, layer, id)
        }
        Commands::Products {
            category,
            search,
            joined,
        } => {
            let filter = match (category, search) {
                (Some(id), _) => commands::data::ProductFilter::Category(id),
                (None, Some(needle)) => commands::data::ProductFilter::Search(needle),
                (None, None) if joined => commands::data::ProductFilter::Joined,
                (None, None) => commands::data::ProductFilter::All,
            };
            commands::data::run_products(&data_dir, layer, &filter)
        }
        Commands::AddProduct {
            name,
            price,
            category,
            stock,
        } => commands::data::run_add_product(&data_dir, layer, &name, price, category, stock),
        Commands::DeleteProduct { id } => commands::data::run_delete_product(&data_dir, layer, id),
        Commands::Stock => commands::data::run_stock(&data_dir, layer),
        Commands::Watch { inserts } => commands::watch::run_watch(&data_dir, inserts),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings, &data_dir),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Init { force } => commands::config::run_config_init(force),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    let target = if writes_data_to_stdout(&cli.command) {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    };
    init_logging(cli.quiet, cli.verbose, target);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
