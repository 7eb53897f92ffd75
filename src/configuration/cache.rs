use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use parking_lot::Mutex;
use tracing::debug;

use super::{
    traits::ResolveConfiguration,
    validate_configuration,
    CandidateResolver,
    ConfigError,
    Configuration,
    ConfigurationExportError,
    ConfigurationLoadError,
};


/// Shared, immutable handle to the loaded configuration.
/// This is what components receive when they are constructed.
pub type ConfigurationHandle = Arc<Configuration>;


/// Lazily resolves the configuration exactly once and keeps it for
/// the lifetime of the cache (in practice, the process).
///
/// Only the first successful [`get`][Self::get] runs the resolver. A failed
/// resolution is not cached, so the next call tries again.
pub struct ConfigurationCache<R = CandidateResolver>
where
    R: ResolveConfiguration,
{
    resolver: R,

    initialization_lock: Mutex<()>,

    configuration: OnceLock<ConfigurationHandle>,
}

impl<R> ConfigurationCache<R>
where
    R: ResolveConfiguration,
{
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            initialization_lock: Mutex::new(()),
            configuration: OnceLock::new(),
        }
    }

    /// Returns the configuration, resolving it on first access.
    pub fn get(&self) -> Result<ConfigurationHandle, ConfigurationLoadError> {
        if let Some(configuration) = self.configuration.get() {
            return Ok(Arc::clone(configuration));
        }

        let _initialization_guard = self.initialization_lock.lock();

        // Another thread may have finished initializing while we were waiting.
        if let Some(configuration) = self.configuration.get() {
            return Ok(Arc::clone(configuration));
        }

        debug!("Configuration not cached yet, resolving.");
        let configuration = Arc::new(self.resolver.resolve_configuration()?);

        // We hold the initialization lock, so nobody else can have set it.
        let _ = self.configuration.set(Arc::clone(&configuration));

        Ok(configuration)
    }

    pub fn is_initialized(&self) -> bool {
        self.configuration.get().is_some()
    }

    /// Validates the cached configuration, resolving it first if needed.
    ///
    /// Loading errors are returned as `Err`, validation problems
    /// are returned (all of them) as `Ok`.
    pub fn validate(&self) -> Result<Vec<ConfigError>, ConfigurationLoadError> {
        let configuration = self.get()?;
        Ok(validate_configuration(&configuration))
    }

    /// Exports the cached configuration as JSON to `export_file_path`.
    /// The cache itself is left untouched.
    pub fn store<P: AsRef<Path>>(
        &self,
        export_file_path: P,
    ) -> Result<(), ConfigurationExportError> {
        let configuration = self.get()?;
        configuration.store_to_path(export_file_path)
    }
}
