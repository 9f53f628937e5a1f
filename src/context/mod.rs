//! Registration surface for dependency-injection hosts.
//!
//! A [`Provider`] names a factory for the [`ConfigService`]; a [`Module`]
//! bundles providers under a name. Hosts with their own container register
//! [`CONFIG_MODULE`]; applications without one use [`AppContext`].

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::{ConfigOptions, ConfigService};
use crate::Error;

/// A named factory for the config service.
#[derive(Debug, Clone, Copy)]
pub struct Provider {
    pub name: &'static str,
    pub instantiator: fn(ConfigOptions) -> ConfigService,
}

impl Provider {
    pub fn instantiate(&self, options: ConfigOptions) -> ConfigService {
        (self.instantiator)(options)
    }
}

/// A named group of providers.
#[derive(Debug, Clone, Copy)]
pub struct Module {
    pub name: &'static str,
    pub providers: &'static [Provider],
}

pub const CONFIG_SERVICE_PROVIDER: Provider = Provider {
    name: "ConfigServiceProvider",
    instantiator: ConfigService::new,
};

pub const CONFIG_MODULE: Module = Module {
    name: "ConfigModule",
    providers: &[CONFIG_SERVICE_PROVIDER],
};

/// Central application context holding the shared config service.
///
/// ## Example
///
/// ```no_run
/// use dragon_config::{AppContext, ConfigOptions};
///
/// let ctx = AppContext::builder()
///     .with_options(ConfigOptions::new().with_file("config/app.yaml"))
///     .build()?;
///
/// let name = ctx.config().get_string("app.name");
/// # let _ = name;
/// # Ok::<(), dragon_config::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    module: &'static str,
    config: Arc<ConfigService>,
}

impl AppContext {
    /// Creates a new builder using [`CONFIG_MODULE`].
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder {
            module: CONFIG_MODULE,
            options: None,
        }
    }

    pub fn config(&self) -> &Arc<ConfigService> {
        &self.config
    }

    /// Name of the module the config service was resolved from.
    pub fn module_name(&self) -> &'static str {
        self.module
    }

    /// Deserializes the current configuration into `T`.
    pub fn settings<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(self.config.unmarshal()?)
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    module: Module,
    options: Option<ConfigOptions>,
}

impl AppContextBuilder {
    /// Resolves the config service from `module` instead of [`CONFIG_MODULE`].
    pub fn with_module(mut self, module: Module) -> Self {
        self.module = module;
        self
    }

    pub fn with_options(mut self, options: ConfigOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds the `AppContext` with the module's first provider.
    ///
    /// Returns an error if no options were provided or the module is empty.
    pub fn build(self) -> Result<AppContext, Error> {
        let options = self.options.ok_or(Error::MissingConfig)?;
        let provider = self
            .module
            .providers
            .first()
            .ok_or(Error::MissingProvider(self.module.name))?;

        Ok(AppContext {
            module: self.module.name,
            config: Arc::new(provider.instantiate(options)),
        })
    }
}
