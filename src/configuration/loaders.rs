//! Format-specific loaders.
//!
//! Every supported format parses into the same [`UnresolvedConfiguration`],
//! so nothing past this module knows (or cares) which format a
//! configuration was loaded from.

use std::{
    fmt::{self, Display, Formatter},
    fs,
    io::ErrorKind,
    path::Path,
};

use tracing::trace;

use super::{structure::UnresolvedConfiguration, ConfigurationLoadError};


/// The closed set of configuration formats we know how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// The primary settings document. Top-level keys act as settings,
    /// except for reserved (`__`-prefixed) ones, which are skipped.
    Toml,

    /// Plain structured data. Every top-level key is copied as-is.
    Json,
}

impl SourceFormat {
    /// Picks a format based on the file extension (case-insensitive).
    /// Returns `None` for unsupported extensions.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;

        if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Toml => "TOML",
            SourceFormat::Json => "JSON",
        }
    }

    pub(crate) fn excludes_reserved_keys(self) -> bool {
        matches!(self, SourceFormat::Toml)
    }

    pub(crate) fn parse(
        self,
        path: &Path,
        contents: &str,
    ) -> Result<UnresolvedConfiguration, ConfigurationLoadError> {
        trace!(
            "Parsing {} bytes of {} from {}.",
            contents.len(),
            self.name(),
            path.display()
        );

        match self {
            SourceFormat::Toml => toml::from_str::<UnresolvedConfiguration>(contents).map_err(
                |source| ConfigurationLoadError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                },
            ),
            SourceFormat::Json => serde_json::from_str::<UnresolvedConfiguration>(contents)
                .map_err(|source| ConfigurationLoadError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                }),
        }
    }
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// Reads the entire configuration source into memory, mapping a missing
/// file to [`ConfigurationLoadError::NotFound`].
pub(crate) fn read_source(path: &Path) -> Result<String, ConfigurationLoadError> {
    fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => ConfigurationLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigurationLoadError::Read {
            path: path.to_path_buf(),
            source: error,
        },
    })
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn format_is_selected_by_extension() {
        assert_eq!(
            SourceFormat::from_path("settings.toml"),
            Some(SourceFormat::Toml)
        );
        assert_eq!(
            SourceFormat::from_path("./conf/settings.JSON"),
            Some(SourceFormat::Json)
        );
        assert_eq!(SourceFormat::from_path("settings.py"), None);
        assert_eq!(SourceFormat::from_path("settings"), None);
    }

    #[test]
    fn reading_missing_file_is_not_found() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("settings.json");

        let error = read_source(&missing).unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = SourceFormat::Json
            .parse(&PathBuf::from("settings.json"), "{ \"PATH\": ")
            .unwrap_err();

        assert!(matches!(error, ConfigurationLoadError::JsonParse { .. }));
    }

    #[test]
    fn json_top_level_must_be_a_mapping() {
        let error = SourceFormat::Json
            .parse(&PathBuf::from("settings.json"), "[1, 2, 3]")
            .unwrap_err();

        assert!(matches!(error, ConfigurationLoadError::JsonParse { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = SourceFormat::Toml
            .parse(&PathBuf::from("settings.toml"), "PATH = ")
            .unwrap_err();

        assert!(matches!(error, ConfigurationLoadError::TomlParse { .. }));
    }
}
