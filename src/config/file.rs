//! File-based configuration sources.

use std::path::Path;

use toml::{Table, Value};
use tracing::debug;

use super::env::parse_env;
use super::format::ConfigFormat;
use super::source::normalize_keys;
use super::ConfigError;

/// Reads and parses one config file into a table with lowercased keys.
pub fn load_file(path: &Path, format: ConfigFormat) -> Result<Table, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    match format {
        ConfigFormat::Env => parse_env(&contents).map_err(|e| ConfigError::EnvParseError {
            path: path.to_path_buf(),
            source: e,
        }),
        ConfigFormat::Yaml => parse_yaml(&contents, path),
    }
}

fn parse_yaml(contents: &str, path: &Path) -> Result<Table, ConfigError> {
    let raw: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|e| ConfigError::YamlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    match yaml_to_value(raw, path) {
        None => Ok(Table::new()),
        Some(Value::Table(table)) => Ok(normalize_keys(table)),
        Some(_) => Err(ConfigError::NotAMapping(path.to_path_buf())),
    }
}

/// Converts a YAML node into the store's value model. `null` has no
/// counterpart and yields `None`, which drops the entry.
fn yaml_to_value(value: serde_yaml::Value, path: &Path) -> Option<Value> {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => None,
        Yaml::Bool(b) => Some(Value::Boolean(b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Integer(i))
            } else {
                n.as_f64().map(Value::Float)
            }
        }
        Yaml::String(s) => Some(Value::String(s)),
        Yaml::Sequence(items) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(|item| yaml_to_value(item, path))
                .collect(),
        )),
        Yaml::Mapping(mapping) => {
            let mut table = Table::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Number(n) => n.to_string(),
                    other => {
                        debug!(path = %path.display(), key = ?other, "skipping non-scalar yaml key");
                        continue;
                    }
                };
                if let Some(value) = yaml_to_value(value, path) {
                    table.insert(key, value);
                }
            }
            Some(Value::Table(table))
        }
        Yaml::Tagged(tagged) => yaml_to_value(tagged.value, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_load_yaml_types() {
        let file = temp_with(
            "yaml_str: string\nyaml_int: 3120\nyaml_float: 3.14\nYaml_Bool: true\nnested:\n  Inner: v\nlist: [a, b]\nempty: ~\n",
        );
        let table = load_file(file.path(), ConfigFormat::Yaml).unwrap();

        assert_eq!(table["yaml_str"].as_str(), Some("string"));
        assert_eq!(table["yaml_int"].as_integer(), Some(3120));
        assert_eq!(table["yaml_float"].as_float(), Some(3.14));
        assert_eq!(table["yaml_bool"].as_bool(), Some(true));
        assert_eq!(table["nested"]["inner"].as_str(), Some("v"));
        assert_eq!(table["list"].as_array().unwrap().len(), 2);
        assert!(!table.contains_key("empty"));
    }

    #[test]
    fn test_yaml_dotted_keys_are_nested() {
        let file = temp_with("DB.Host: localhost\ndb:\n  port: 5432\n");
        let table = load_file(file.path(), ConfigFormat::Yaml).unwrap();

        assert_eq!(table["db"]["host"].as_str(), Some("localhost"));
        assert_eq!(table["db"]["port"].as_integer(), Some(5432));
    }

    #[test]
    fn test_load_empty_yaml_is_empty_table() {
        let file = temp_with("");
        assert!(load_file(file.path(), ConfigFormat::Yaml).unwrap().is_empty());
    }

    #[test]
    fn test_yaml_scalar_document_is_rejected() {
        let file = temp_with("just a string\n");
        let result = load_file(file.path(), ConfigFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::NotAMapping(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let file = temp_with("key: [unclosed\n");
        let result = load_file(file.path(), ConfigFormat::Yaml);
        assert!(matches!(result, Err(ConfigError::YamlParseError { .. })));
    }

    #[test]
    fn test_load_env_file() {
        let file = temp_with("ENV_STRING=test\n");
        let table = load_file(file.path(), ConfigFormat::Env).unwrap();
        assert_eq!(table["env_string"].as_str(), Some("test"));
    }

    #[test]
    fn test_malformed_env() {
        let file = temp_with("no separator here\n");
        let result = load_file(file.path(), ConfigFormat::Env);
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = load_file(Path::new("/nonexistent/path/config.env"), ConfigFormat::Env);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
