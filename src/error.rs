use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the dragon-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("application context requires config options")]
    MissingConfig,

    #[error("module '{0}' has no provider for the config service")]
    MissingProvider(&'static str),
}
