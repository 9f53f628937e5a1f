//! Configuration loading, merging, and reloading.

mod cast;
mod env;
mod error;
mod file;
mod format;
mod loader;
mod options;
mod service;
mod snapshot;
mod source;
mod watch;

pub use env::parse_env;
pub use error::ConfigError;
pub use format::ConfigFormat;
pub use options::ConfigOptions;
pub use service::ConfigService;
pub use snapshot::Snapshot;
