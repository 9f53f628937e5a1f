use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse env file '{path}': {source}")]
    EnvParseError {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("failed to parse yaml file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("top level of '{0}' is not a mapping")]
    NotAMapping(PathBuf),

    #[error("failed to watch config files: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("config key not set: {0}")]
    KeyNotFound(String),
}
