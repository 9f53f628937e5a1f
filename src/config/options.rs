use std::path::{Path, PathBuf};

use toml::{Table, Value};

/// Inputs of a [`ConfigService`](super::ConfigService).
///
/// Precedence, lowest to highest: files in the order they were added, then
/// raw data. Raw data is re-applied on every reload, so it always shadows
/// file-provided values of the same key.
///
/// ## Example
///
/// ```no_run
/// use dragon_config::{ConfigOptions, ConfigService};
///
/// let config = ConfigService::new(
///     ConfigOptions::new()
///         .with_file("config/.env")
///         .with_file("config/app.yaml")
///         .with_value("server.port", 8080)
///         .watch(true),
/// );
///
/// let port = config.get_int("server.port");
/// # let _ = port;
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "options do nothing until passed to ConfigService::new"]
pub struct ConfigOptions {
    /// Config files, merged in order; later files override earlier ones.
    pub config_file_paths: Vec<PathBuf>,

    /// Values applied after all files. Keys may be dot-paths.
    pub raw_config_data: Table,

    /// Reload when any of the config files changes.
    pub watch_enabled: bool,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a config file. Missing files are skipped with a warning.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets one raw override.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw_config_data.insert(key.into(), value.into());
        self
    }

    /// Merges a table of raw overrides into the existing ones.
    pub fn with_raw_data(mut self, data: Table) -> Self {
        self.raw_config_data.extend(data);
        self
    }

    pub fn watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }
}
