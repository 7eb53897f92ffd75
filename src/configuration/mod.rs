//! This module contains all configuration-relevant code, including
//! the full configuration structure as well as methods needed to load,
//! cache and validate it.
//!
//! Your starting point should probably be [`ConfigurationCache`], constructed over a
//! [`CandidateResolver`] (see [`CandidateResolver::with_default_candidates`]).
//!
//! # Internals
//! Loading is based on the concept of unresolved and resolved configuration structures.
//!
//! Each supported format ([`SourceFormat`]) is deserialized into the same
//! [`UnresolvedConfiguration`][structure::UnresolvedConfiguration] structure,
//! which is then resolved (see [`traits::ResolvableConfigurationWithContext`])
//! into a [`Configuration`], together with the information about where it came from.
//!
//! Resolution never rejects a configuration for being semantically incomplete.
//! That is the job of the [`validation`] checks, which report every
//! problem as a [`ConfigError`] instead of failing on the first one.

#![allow(rustdoc::private_intra_doc_links)]

mod cache;
mod errors;
mod loaders;
mod resolver;
mod structure;
mod traits;
mod utilities;
pub mod validation;

pub use cache::{ConfigurationCache, ConfigurationHandle};
pub use errors::{ConfigError, ConfigurationExportError, ConfigurationLoadError};
pub use loaders::SourceFormat;
pub use resolver::CandidateResolver;
pub use structure::*;
pub use traits::{ConfigurationCheck, ResolveConfiguration};
pub use utilities::DEFAULT_EXPORT_FILE_NAME;
pub use validation::{validate_configuration, StationsCheck, TemporaryDirectoryCheck};
