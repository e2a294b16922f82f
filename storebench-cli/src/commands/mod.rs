pub(crate) mod bench;
pub(crate) mod config;
pub(crate) mod data;
pub(crate) mod watch;

use std::path::Path;

use storebench_core::CatalogStore;
use storebench_direct::DirectStore;
use storebench_managed::ManagedStore;

use crate::CliError;
use crate::cli_types::LayerArg;
use crate::settings::{DIRECT_DB_FILE, MANAGED_DB_FILE};

fn ensure_data_dir(data_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(data_dir).map_err(|e| {
        CliError::other(format!(
            "Failed to create data directory {}: {}",
            data_dir.display(),
            e
        ))
    })
}

pub(crate) fn open_direct(data_dir: &Path) -> Result<DirectStore, CliError> {
    ensure_data_dir(data_dir)?;
    let path = data_dir.join(DIRECT_DB_FILE);
    DirectStore::open(&path)
        .map_err(|e| CliError::database(format!("Failed to open direct store: {}", e)))
}

pub(crate) fn open_managed(data_dir: &Path) -> Result<ManagedStore, CliError> {
    ensure_data_dir(data_dir)?;
    let path = data_dir.join(MANAGED_DB_FILE);
    ManagedStore::open(&path)
        .map_err(|e| CliError::database(format!("Failed to open managed store: {}", e)))
}

/// Open every store selected by `--layer`, direct first.
pub(crate) fn open_selected(
    data_dir: &Path,
    layer: LayerArg,
) -> Result<Vec<Box<dyn CatalogStore>>, CliError> {
    let mut stores: Vec<Box<dyn CatalogStore>> = Vec::new();
    if layer.includes_direct() {
        stores.push(Box::new(open_direct(data_dir)?));
    }
    if layer.includes_managed() {
        stores.push(Box::new(open_managed(data_dir)?));
    }
    Ok(stores)
}

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("Books", 10), "Books");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn truncate_fits_long_strings_to_width() {
        let cut = truncate_str("Electronics and more", 10);
        assert_eq!(cut, "Electro...");
        assert_eq!(cut.chars().count(), 10);
        assert_eq!(truncate_str("Électronique", 8), "Élect...");
    }

    #[test]
    fn selected_layers_open_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let stores = open_selected(&data_dir, LayerArg::Both).unwrap();
        let names: Vec<&str> = stores.iter().map(|s| s.layer_name()).collect();
        assert_eq!(names, vec!["direct", "managed"]);
        assert!(data_dir.join(DIRECT_DB_FILE).exists());
        assert!(data_dir.join(MANAGED_DB_FILE).exists());

        let managed_only = open_selected(&data_dir, LayerArg::Managed).unwrap();
        assert_eq!(managed_only.len(), 1);
        assert_eq!(managed_only[0].layer_name(), "managed");
    }
}
