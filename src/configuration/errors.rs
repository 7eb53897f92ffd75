use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;


/// A single, non-fatal problem found while validating a loaded configuration.
///
/// The `key` identifies the offending setting (e.g. `PATH` or `STATIONS`),
/// it is not necessarily a literal key path into the configuration file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration Error (key: {key}): {message}")]
pub struct ConfigError {
    pub key: String,
    pub message: String,
}

impl ConfigError {
    pub fn new<K, M>(key: K, message: M) -> Self
    where
        K: Into<String>,
        M: Into<String>,
    {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}


/// Errors that can happen while loading a configuration source.
///
/// Only [`ConfigurationLoadError::NoUsableConfiguration`] is produced by the
/// candidate resolver itself; the rest come from individual loaders.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigurationLoadError {
    #[error("no usable config found! please make sure you have a valid configuration file!")]
    #[diagnostic(
        code(digiskr::configuration::not_found),
        help("Create ./settings.toml or ./settings.json, or pass a path with --configuration-file-path.")
    )]
    NoUsableConfiguration { candidates: Vec<PathBuf> },

    #[error("configuration file {} does not exist", .path.display())]
    #[diagnostic(code(digiskr::configuration::missing_file))]
    NotFound { path: PathBuf },

    #[error("unsupported configuration file type: {}", .path.display())]
    #[diagnostic(
        code(digiskr::configuration::unsupported_format),
        help("Supported configuration file extensions are .toml and .json.")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read configuration file {}", .path.display())]
    #[diagnostic(code(digiskr::configuration::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML configuration file {}", .path.display())]
    #[diagnostic(code(digiskr::configuration::toml))]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON configuration file {}", .path.display())]
    #[diagnostic(code(digiskr::configuration::json))]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to canonicalize configuration file path {}", .path.display())]
    #[diagnostic(code(digiskr::configuration::io))]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigurationLoadError {
    /// Whether this error only means "the candidate does not exist",
    /// which the resolver treats as a reason to try the next candidate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}


/// Errors that can happen while exporting the configuration to disk.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigurationExportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] ConfigurationLoadError),

    #[error("failed to serialize configuration")]
    #[diagnostic(code(digiskr::configuration::export))]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write configuration to {}", .path.display())]
    #[diagnostic(code(digiskr::configuration::export))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
