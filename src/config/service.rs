use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::{info, warn};

use super::loader::Loader;
use super::options::ConfigOptions;
use super::snapshot::Snapshot;
use super::watch::{spawn_watcher, Watch};
use super::ConfigError;

/// Merged configuration from files and raw overrides, optionally kept in
/// sync with the files on disk.
///
/// Construction never fails: missing or malformed files are logged and
/// skipped, and reads of absent keys return zero values. Each instance owns
/// its own store, so independent services do not share state.
///
/// When watching is enabled, every change to a config file rebuilds the
/// whole configuration on a background thread and publishes it as a new
/// [`Snapshot`]. A single accessor call always reads one complete snapshot;
/// use [`snapshot`](Self::snapshot) to read several keys from the same one.
#[derive(Debug)]
pub struct ConfigService {
    loader: Arc<Loader>,
    store: Arc<ArcSwap<Snapshot>>,
    watch: Option<Watch>,
}

impl ConfigService {
    /// Loads the configuration synchronously and starts the watcher if enabled.
    pub fn new(options: ConfigOptions) -> Self {
        let watch_enabled = options.watch_enabled;
        let loader = Arc::new(Loader::new(options));
        let store = Arc::new(ArcSwap::from_pointee(Snapshot::new(loader.load())));

        let mut service = Self {
            loader,
            store,
            watch: None,
        };

        if watch_enabled {
            service.watch = service.start_watch();
        }

        service
    }

    fn start_watch(&self) -> Option<Watch> {
        let loader = Arc::clone(&self.loader);
        let store = Arc::clone(&self.store);

        let result = spawn_watcher(&self.loader.options().config_file_paths, move |_| {
            store.store(Arc::new(Snapshot::new(loader.load())));
            info!("configuration reloaded");
        });

        match result {
            Ok(watch) => Some(watch),
            Err(e) => {
                warn!(error = %e, "failed to watch config files, changes will not be reloaded");
                None
            }
        }
    }

    /// Whether a file watcher is running for this service.
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Number of config files covered by the watcher, zero when not watching.
    pub fn watched_file_count(&self) -> usize {
        self.watch.as_ref().map_or(0, Watch::targets)
    }

    /// The options this service was built from.
    pub fn options(&self) -> &ConfigOptions {
        self.loader.options()
    }

    /// The current snapshot. It does not change when a reload happens.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.load_full()
    }

    /// Returns the raw value at `key`, or `None` when it is not set.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.load().get(key)
    }

    /// Whether `key` resolves to a value.
    pub fn is_set(&self, key: &str) -> bool {
        self.store.load().is_set(key)
    }

    /// Reads `key` as a string, or `""` when missing or not a scalar.
    pub fn get_string(&self, key: &str) -> String {
        self.store.load().get_string(key)
    }

    /// Reads `key` as an integer, or `0` when missing or not coercible.
    pub fn get_int(&self, key: &str) -> i64 {
        self.store.load().get_int(key)
    }

    /// Reads `key` as an `i32`, or `0` when missing, not coercible, or out of range.
    pub fn get_int32(&self, key: &str) -> i32 {
        self.store.load().get_int32(key)
    }

    /// Same as [`get_int`](Self::get_int).
    pub fn get_int64(&self, key: &str) -> i64 {
        self.store.load().get_int64(key)
    }

    /// Reads `key` as a float, or `0.0` when missing or not coercible.
    pub fn get_float64(&self, key: &str) -> f64 {
        self.store.load().get_float64(key)
    }

    /// Reads `key` as a bool, or `false` when missing or not coercible.
    pub fn get_bool(&self, key: &str) -> bool {
        self.store.load().get_bool(key)
    }

    /// Reads `key` as a list of strings, or an empty list when missing or not coercible.
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.store.load().get_string_slice(key)
    }

    /// Reads the table at `key`, or an empty table when missing or not a table.
    pub fn get_string_map(&self, key: &str) -> Table {
        self.store.load().get_string_map(key)
    }

    /// Reads `key` as a duration, or zero when missing or not coercible.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.store.load().get_duration(key)
    }

    /// Like [`get_string`](Self::get_string), but `None` when missing or not a scalar.
    pub fn try_get_string(&self, key: &str) -> Option<String> {
        self.store.load().try_get_string(key)
    }

    /// Like [`get_int`](Self::get_int), but `None` when missing or not coercible.
    pub fn try_get_int(&self, key: &str) -> Option<i64> {
        self.store.load().try_get_int(key)
    }

    /// Like [`get_int32`](Self::get_int32), but `None` when missing, not coercible, or out of range.
    pub fn try_get_int32(&self, key: &str) -> Option<i32> {
        self.store.load().try_get_int32(key)
    }

    /// Same as [`try_get_int`](Self::try_get_int).
    pub fn try_get_int64(&self, key: &str) -> Option<i64> {
        self.store.load().try_get_int64(key)
    }

    /// Like [`get_float64`](Self::get_float64), but `None` when missing or not coercible.
    pub fn try_get_float64(&self, key: &str) -> Option<f64> {
        self.store.load().try_get_float64(key)
    }

    /// Like [`get_bool`](Self::get_bool), but `None` when missing or not coercible.
    pub fn try_get_bool(&self, key: &str) -> Option<bool> {
        self.store.load().try_get_bool(key)
    }

    /// Like [`get_string_slice`](Self::get_string_slice), but `None` when missing or not coercible.
    pub fn try_get_string_slice(&self, key: &str) -> Option<Vec<String>> {
        self.store.load().try_get_string_slice(key)
    }

    /// Like [`get_string_map`](Self::get_string_map), but `None` when missing or not a table.
    pub fn try_get_string_map(&self, key: &str) -> Option<Table> {
        self.store.load().try_get_string_map(key)
    }

    /// Like [`get_duration`](Self::get_duration), but `None` when missing or not coercible.
    pub fn try_get_duration(&self, key: &str) -> Option<Duration> {
        self.store.load().try_get_duration(key)
    }

    /// Dot-paths of every leaf value, sorted.
    pub fn all_keys(&self) -> Vec<String> {
        self.store.load().all_keys()
    }

    /// The whole merged configuration.
    pub fn all_settings(&self) -> Table {
        self.store.load().all_settings().clone()
    }

    /// Deserializes the whole configuration.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        self.store.load().unmarshal()
    }

    /// Deserializes the subtree (or scalar) at `key`.
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        self.store.load().unmarshal_key(key)
    }
}
