use std::time::Duration;

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use super::cast;
use super::source::{leaf_keys, lookup};
use super::ConfigError;

/// An immutable, fully merged view of the configuration.
///
/// Keys are case-insensitive and addressed by dot-path (`server.port`).
/// The plain accessors return the type's zero value when a key is missing or
/// cannot be coerced, which makes "absent" and "legitimately zero"
/// indistinguishable; the `try_get_*` variants return `None` in both of those
/// cases instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    table: Table,
}

impl Snapshot {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// Returns the raw value at `key`, or `None` when it is not set.
    pub fn get(&self, key: &str) -> Option<Value> {
        lookup(&self.table, key).cloned()
    }

    /// Whether `key` resolves to a value.
    pub fn is_set(&self, key: &str) -> bool {
        lookup(&self.table, key).is_some()
    }

    /// Reads `key` as a string, or `""` when missing or not a scalar.
    pub fn get_string(&self, key: &str) -> String {
        self.try_get_string(key).unwrap_or_default()
    }

    /// Reads `key` as an integer, or `0` when missing or not coercible.
    pub fn get_int(&self, key: &str) -> i64 {
        self.try_get_int(key).unwrap_or_default()
    }

    /// Reads `key` as an `i32`, or `0` when missing, not coercible, or out of range.
    pub fn get_int32(&self, key: &str) -> i32 {
        self.try_get_int32(key).unwrap_or_default()
    }

    /// Same as [`get_int`](Self::get_int).
    pub fn get_int64(&self, key: &str) -> i64 {
        self.try_get_int64(key).unwrap_or_default()
    }

    /// Reads `key` as a float, or `0.0` when missing or not coercible.
    pub fn get_float64(&self, key: &str) -> f64 {
        self.try_get_float64(key).unwrap_or_default()
    }

    /// Reads `key` as a bool, or `false` when missing or not coercible.
    pub fn get_bool(&self, key: &str) -> bool {
        self.try_get_bool(key).unwrap_or_default()
    }

    /// Reads `key` as a list of strings, or an empty list when missing or not coercible.
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.try_get_string_slice(key).unwrap_or_default()
    }

    /// Reads the table at `key`, or an empty table when missing or not a table.
    pub fn get_string_map(&self, key: &str) -> Table {
        self.try_get_string_map(key).unwrap_or_default()
    }

    /// Reads `key` as a duration, or zero when missing or not coercible.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.try_get_duration(key).unwrap_or_default()
    }

    /// Like [`get_string`](Self::get_string), but `None` when missing or not a scalar.
    pub fn try_get_string(&self, key: &str) -> Option<String> {
        lookup(&self.table, key).and_then(cast::to_string)
    }

    /// Like [`get_int`](Self::get_int), but `None` when missing or not coercible.
    pub fn try_get_int(&self, key: &str) -> Option<i64> {
        lookup(&self.table, key).and_then(cast::to_i64)
    }

    /// Like [`get_int32`](Self::get_int32), but `None` when missing or not coercible.
    /// Values outside the `i32` range count as not coercible.
    pub fn try_get_int32(&self, key: &str) -> Option<i32> {
        lookup(&self.table, key).and_then(cast::to_i32)
    }

    /// Same as [`try_get_int`](Self::try_get_int).
    pub fn try_get_int64(&self, key: &str) -> Option<i64> {
        self.try_get_int(key)
    }

    /// Like [`get_float64`](Self::get_float64), but `None` when missing or not coercible.
    pub fn try_get_float64(&self, key: &str) -> Option<f64> {
        lookup(&self.table, key).and_then(cast::to_f64)
    }

    /// Like [`get_bool`](Self::get_bool), but `None` when missing or not coercible.
    pub fn try_get_bool(&self, key: &str) -> Option<bool> {
        lookup(&self.table, key).and_then(cast::to_bool)
    }

    /// Like [`get_string_slice`](Self::get_string_slice), but `None` when missing or not coercible.
    pub fn try_get_string_slice(&self, key: &str) -> Option<Vec<String>> {
        lookup(&self.table, key).and_then(cast::to_string_slice)
    }

    /// Like [`get_string_map`](Self::get_string_map), but `None` when missing or not a table.
    pub fn try_get_string_map(&self, key: &str) -> Option<Table> {
        lookup(&self.table, key).and_then(cast::to_string_map)
    }

    /// Like [`get_duration`](Self::get_duration), but `None` when missing or not coercible.
    pub fn try_get_duration(&self, key: &str) -> Option<Duration> {
        lookup(&self.table, key).and_then(cast::to_duration)
    }

    /// Dot-paths of every leaf value, sorted.
    pub fn all_keys(&self) -> Vec<String> {
        leaf_keys(&self.table)
    }

    /// The whole merged configuration.
    pub fn all_settings(&self) -> &Table {
        &self.table
    }

    /// Deserializes the whole configuration.
    ///
    /// Values from env files are strings, so fields read from them should be
    /// `String` or use a deserializer that accepts strings.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Value::Table(self.table.clone())
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }

    /// Deserializes the subtree (or scalar) at `key`.
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;
        value.try_into().map_err(ConfigError::DeserializeError)
    }
}
