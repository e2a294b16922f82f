//! Persistent settings (`~/.config/storebench/settings.toml`).
//!
//! Every value resolves through the same priority chain: CLI flag, then
//! the settings file, then the built-in default.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storebench_bench::DEFAULT_DATASET_SIZE;

use crate::CliError;

pub(crate) const DIRECT_DB_FILE: &str = "direct.db";
pub(crate) const MANAGED_DB_FILE: &str = "managed.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub storage: StorageSettings,
    pub bench: BenchSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorageSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BenchSettings {
    pub dataset_size: usize,
    pub rounds: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            dataset_size: DEFAULT_DATASET_SIZE,
            rounds: 1,
            seed: None,
        }
    }
}

/// Canonical path to the settings file: `~/.config/storebench/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("storebench").join("settings.toml")
}

/// Default location of the two database files.
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storebench")
}

impl Settings {
    /// Load from [`settings_path`]. A missing file yields the defaults.
    pub(crate) fn load() -> Result<Self, CliError> {
        Self::load_from(&settings_path())
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self, CliError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .map_err(|e| CliError::config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Data directory: CLI override, then `storage.data_dir`, then default.
    pub(crate) fn resolve_data_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.storage.data_dir.clone())
            .unwrap_or_else(default_data_dir)
    }

    /// Write atomically (temp file + rename), creating parent directories.
    pub(crate) fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::parse("[bench]\nrounds = 3\n").unwrap();
        assert_eq!(settings.bench.rounds, 3);
        assert_eq!(settings.bench.dataset_size, DEFAULT_DATASET_SIZE);
        assert_eq!(settings.bench.seed, None);
        assert_eq!(settings.storage.data_dir, None);
    }

    #[test]
    fn data_dir_priority() {
        let mut settings = Settings::default();
        assert_eq!(settings.resolve_data_dir(None), default_data_dir());

        settings.storage.data_dir = Some(PathBuf::from("/from/file"));
        assert_eq!(settings.resolve_data_dir(None), PathBuf::from("/from/file"));
        assert_eq!(
            settings.resolve_data_dir(Some(PathBuf::from("/from/cli"))),
            PathBuf::from("/from/cli")
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.bench.seed = Some(42);
        settings.storage.data_dir = Some(dir.path().join("data"));

        settings.save_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn missing_file_is_default_and_garbage_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());

        std::fs::write(&path, "[bench\n").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(CliError::Config(_))
        ));
    }
}
