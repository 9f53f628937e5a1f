use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use toml::Table;
use tracing::{debug, warn};

use super::file::load_file;
use super::format::ConfigFormat;
use super::options::ConfigOptions;
use super::source::{deep_merge, key_path, lookup, merge_at_path, normalize_value};
use super::ConfigError;

/// Runs the merge procedure: files in list order, then raw data on top.
///
/// The last successfully parsed table of each file is remembered, so a file
/// that turns malformed after startup keeps contributing its previous
/// contents until it parses again.
#[derive(Debug)]
pub(crate) struct Loader {
    options: ConfigOptions,
    last_good: Mutex<HashMap<PathBuf, Table>>,
}

impl Loader {
    pub fn new(options: ConfigOptions) -> Self {
        Self {
            options,
            last_good: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Builds a fresh merged table. Problems are logged, never returned.
    pub fn load(&self) -> Table {
        let mut merged = Table::new();

        for path in &self.options.config_file_paths {
            if let Some(table) = self.load_one(path) {
                deep_merge(&mut merged, table);
            }
        }

        self.apply_raw_data(&mut merged);
        merged
    }

    fn load_one(&self, path: &Path) -> Option<Table> {
        if !path.is_file() {
            warn!(path = %path.display(), "config file not found");
            self.last_good.lock().remove(path);
            return None;
        }

        let (format, recognised) = ConfigFormat::from_path(path);
        if !recognised {
            warn!(
                path = %path.display(),
                extension = %ConfigFormat::extension_of(path),
                "unsupported config file extension, assuming env"
            );
        }

        match load_file(path, format) {
            Ok(table) => {
                debug!(path = %path.display(), %format, keys = table.len(), "loaded config file");
                self.last_good.lock().insert(path.to_path_buf(), table.clone());
                Some(table)
            }
            Err(ConfigError::FileNotFound(_)) => {
                // Removed between the existence check and the read.
                warn!(path = %path.display(), "config file not found");
                self.last_good.lock().remove(path);
                None
            }
            Err(e) => {
                let previous = self.last_good.lock().get(path).cloned();
                if previous.is_some() {
                    warn!(path = %path.display(), error = %e, "failed to load config file, keeping previous contents");
                } else {
                    warn!(path = %path.display(), error = %e, "failed to load config file");
                }
                previous
            }
        }
    }

    fn apply_raw_data(&self, merged: &mut Table) {
        for (key, value) in &self.options.raw_config_data {
            if lookup(merged, key).is_some() {
                warn!(key = %key, "key already exists, overwriting");
            }
            merge_at_path(merged, &key_path(key), normalize_value(value.clone()));
        }
    }
}
