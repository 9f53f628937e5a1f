pub mod config;
pub mod context;
mod error;

pub use config::{ConfigError, ConfigOptions, ConfigService, Snapshot};
pub use context::{AppContext, Module, Provider, CONFIG_MODULE, CONFIG_SERVICE_PROVIDER};
pub use error::Error;
pub use toml::{Table, Value};
