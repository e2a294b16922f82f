use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{DIRECT_DB_FILE, MANAGED_DB_FILE, Settings, settings_path};

/// Show the effective settings.
pub(crate) fn run_config_show(settings: &Settings, data_dir: &Path) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "storebench Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    log::info!("  Data dir:     {}", data_dir.display());
    log::info!("    direct:     {}", data_dir.join(DIRECT_DB_FILE).display());
    log::info!("    managed:    {}", data_dir.join(MANAGED_DB_FILE).display());
    log::info!("  Dataset size: {}", settings.bench.dataset_size);
    log::info!("  Rounds:       {}", settings.bench.rounds);
    match settings.bench.seed {
        Some(seed) => log::info!("  Seed:         {}", seed),
        None => log::info!(
            "  Seed:         {}",
            "random".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

/// Write a default settings file, refusing to clobber one unless `force`.
pub(crate) fn run_config_init(force: bool) -> Result<(), CliError> {
    let path = settings_path();
    if path.exists() && !force {
        log::warn!("Settings file already exists at {}", path.display());
        log::info!("Re-run with --force to overwrite it.");
        return Ok(());
    }

    Settings::default()
        .save_to(&path)
        .map_err(|e| CliError::config(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!(
        "Wrote default settings to {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
