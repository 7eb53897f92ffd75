use std::path::PathBuf;

use miette::Result;
use tracing::{debug, info, warn};

use super::{
    loaders::SourceFormat,
    traits::ResolveConfiguration,
    utilities::get_default_candidate_file_paths,
    Configuration,
    ConfigurationLoadError,
};


/// Resolves a configuration by trying a fixed, ordered list of candidate files.
///
/// The first candidate that exists wins. Missing candidates and candidates
/// with an unsupported file type are skipped; a candidate that exists
/// but can't be parsed aborts the resolution.
#[derive(Debug, Clone)]
pub struct CandidateResolver {
    candidates: Vec<PathBuf>,
}

impl CandidateResolver {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// A resolver over `./settings.toml` and then `./settings.json`.
    pub fn with_default_candidates() -> Result<Self> {
        Ok(Self::new(get_default_candidate_file_paths()?))
    }

    /// A resolver that only ever looks at a single file.
    pub fn with_single_candidate<P: Into<PathBuf>>(path: P) -> Self {
        Self::new([path])
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl ResolveConfiguration for CandidateResolver {
    fn resolve_configuration(&self) -> Result<Configuration, ConfigurationLoadError> {
        for candidate in &self.candidates {
            if SourceFormat::from_path(candidate).is_none() {
                warn!("unsupported file type: {}", candidate.display());
                continue;
            }

            match Configuration::load_from_path(candidate) {
                Ok(configuration) => {
                    info!(
                        "Configuration loaded: {}.",
                        configuration.source.file_path.display()
                    );
                    return Ok(configuration);
                }
                Err(error) if error.is_not_found() => {
                    debug!(
                        "Configuration candidate {} does not exist, skipping.",
                        candidate.display()
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Err(ConfigurationLoadError::NoUsableConfiguration {
            candidates: self.candidates.clone(),
        })
    }
}
