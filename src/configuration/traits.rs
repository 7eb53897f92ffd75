use super::{ConfigError, Configuration, ConfigurationLoadError};

/// Represents a configuration that can be validated or resolved.
pub trait ResolvableConfiguration {
    type Resolved;

    /// Resolve the configuration into its `Resolved` type.
    /// If the resolution fails, you may return `Err` to indicate
    /// that the configuration could not be loaded.
    fn resolve(self) -> Result<Self::Resolved, ConfigurationLoadError>;
}


/// Represents a configuration that can be validated or resolved,
/// but where that process requires some additional context.
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Resolve the configuration into its `Resolved` type.
    /// If the resolution fails, you may return `Err` to indicate
    /// that the configuration could not be loaded.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved, ConfigurationLoadError>;
}


/// Something that can produce exactly one [`Configuration`],
/// e.g. by trying a list of candidate files.
pub trait ResolveConfiguration {
    fn resolve_configuration(&self) -> Result<Configuration, ConfigurationLoadError>;
}


/// A single, independent validation check.
///
/// Returns `None` if the check passed, or exactly one error otherwise.
pub trait ConfigurationCheck {
    fn check(&self, configuration: &Configuration) -> Option<ConfigError>;
}
