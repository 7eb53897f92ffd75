use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use tracing::debug;

pub use self::stations::{Station, Stations, CALLSIGN_KEY};
use self::stations::UnresolvedStations;
use super::loaders::{read_source, SourceFormat};
use super::traits::{ResolvableConfiguration, ResolvableConfigurationWithContext};
use super::utilities::{is_reserved_key, normalize_toml_datetimes};
use super::{ConfigurationExportError, ConfigurationLoadError};

mod stations;


/// Value type for every setting that has no dedicated field.
pub type ConfigValue = serde_json::Value;

/// Key of the temporary directory setting.
pub const TEMPORARY_DIRECTORY_KEY: &str = "PATH";

/// Key of the station table.
pub const STATIONS_KEY: &str = "STATIONS";



/// The whole document, top-level keys in document order.
///
/// Nothing about the shape of individual settings is enforced here, so a
/// wrongly shaped setting reaches validation instead of failing the load.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct UnresolvedConfiguration {
    entries: IndexMap<String, ConfigValue>,
}


/// A setting with a known expected shape.
///
/// Values that don't have that shape are kept as `Malformed`
/// so validation can report them (and the export can write them back).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Setting<T> {
    Valid(T),
    Malformed(ConfigValue),
}

impl<T> Setting<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Setting::Valid(value) => Some(value),
            Setting::Malformed(_) => None,
        }
    }
}


/// Where a [`Configuration`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSource {
    /// Canonical path of the loaded file.
    pub file_path: PathBuf,

    pub format: SourceFormat,
}


/// The entire configuration.
///
/// Absent keys and keys explicitly set to `null` are both `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// This is the source this `Configuration` instance was loaded from.
    pub source: ConfigurationSource,

    /// Temporary directory (`PATH`).
    pub temporary_directory: Option<Setting<PathBuf>>,

    /// Receiving stations (`STATIONS`), in document order.
    pub stations: Option<Setting<Stations>>,

    /// Every other top-level setting, preserved as-is and in document order.
    pub extra: IndexMap<String, ConfigValue>,

    /// Top-level keys in the order they appeared in the source.
    pub(crate) key_order: Vec<String>,
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = ConfigurationSource;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved, ConfigurationLoadError> {
        let is_toml = context.format == SourceFormat::Toml;

        let mut temporary_directory = None;
        let mut stations = None;
        let mut extra = IndexMap::new();
        let mut key_order = Vec::with_capacity(self.entries.len());

        for (key, value) in self.entries {
            if is_toml && is_reserved_key(&key) {
                continue;
            }

            let value = if is_toml {
                normalize_toml_datetimes(value)
            } else {
                value
            };

            match key.as_str() {
                TEMPORARY_DIRECTORY_KEY => {
                    temporary_directory = match value {
                        ConfigValue::Null => None,
                        ConfigValue::String(path) => Some(Setting::Valid(PathBuf::from(path))),
                        other => Some(Setting::Malformed(other)),
                    };
                }
                STATIONS_KEY => {
                    stations = match value {
                        ConfigValue::Null => None,
                        other => Some(UnresolvedStations(other).resolve()?),
                    };
                }
                _ => {
                    extra.insert(key.clone(), value);
                }
            }

            key_order.push(key);
        }


        Ok(Configuration {
            source: context,
            temporary_directory,
            stations,
            extra,
            key_order,
        })
    }
}


impl Serialize for Configuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        for key in self.ordered_keys() {
            match key {
                TEMPORARY_DIRECTORY_KEY => {
                    if let Some(temporary_directory) = &self.temporary_directory {
                        map.serialize_entry(key, temporary_directory)?;
                    }
                }
                STATIONS_KEY => {
                    if let Some(stations) = &self.stations {
                        map.serialize_entry(key, stations)?;
                    }
                }
                _ => {
                    if let Some(value) = self.extra.get(key) {
                        map.serialize_entry(key, value)?;
                    }
                }
            }
        }

        map.end()
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    /// The format is picked based on the file extension.
    pub fn load_from_path<S: AsRef<Path>>(
        configuration_file_path: S,
    ) -> Result<Self, ConfigurationLoadError> {
        let configuration_file_path = configuration_file_path.as_ref();

        let format = SourceFormat::from_path(configuration_file_path).ok_or_else(|| {
            ConfigurationLoadError::UnsupportedFormat {
                path: configuration_file_path.to_path_buf(),
            }
        })?;

        // Read the configuration file into memory.
        let configuration_string = read_source(configuration_file_path)?;


        // Parse the string into the `UnresolvedConfiguration` structure and then resolve it.
        let unresolved_configuration = format.parse(configuration_file_path, &configuration_string)?;

        let file_path = dunce::canonicalize(configuration_file_path).map_err(|source| {
            ConfigurationLoadError::Canonicalize {
                path: configuration_file_path.to_path_buf(),
                source,
            }
        })?;

        debug!("Loaded {} configuration from {}.", format, file_path.display());

        unresolved_configuration.resolve(ConfigurationSource { file_path, format })
    }

    /// Top-level keys in source order, followed by any keys
    /// that were set without coming from a source.
    fn ordered_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.key_order.len() + 2);

        let all_keys = self
            .key_order
            .iter()
            .map(String::as_str)
            .chain([TEMPORARY_DIRECTORY_KEY, STATIONS_KEY])
            .chain(self.extra.keys().map(String::as_str));

        for key in all_keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        keys
    }

    /// Looks up any top-level setting by key.
    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            TEMPORARY_DIRECTORY_KEY => self.temporary_directory.is_some(),
            STATIONS_KEY => self.stations.is_some(),
            _ => self.extra.contains_key(key),
        }
    }

    /// Returns a setting that has no dedicated field.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.extra.get(key)
    }

    /// Returns the temporary directory if it is set to a path.
    pub fn temporary_directory_path(&self) -> Option<&Path> {
        self.temporary_directory
            .as_ref()?
            .valid()
            .map(PathBuf::as_path)
    }

    /// Returns the station table if it is a mapping.
    pub fn stations_table(&self) -> Option<&Stations> {
        self.stations.as_ref()?.valid()
    }

    pub fn station(&self, identifier: &str) -> Option<&Station> {
        self.stations_table()?.get(identifier)?.valid()
    }

    pub fn station_count(&self) -> usize {
        self.stations_table().map_or(0, IndexMap::len)
    }

    /// Returns the whole configuration as a flat key-value mapping,
    /// exactly as it would be exported.
    pub fn to_value_map(&self) -> Result<IndexMap<String, ConfigValue>, serde_json::Error> {
        match serde_json::to_value(self)? {
            ConfigValue::Object(map) => Ok(map.into_iter().collect()),
            _ => Ok(IndexMap::new()),
        }
    }

    /// Serializes the configuration into pretty-printed JSON
    /// (four-space indentation), keeping the source key order.
    pub fn to_json_string(&self) -> Result<String, ConfigurationExportError> {
        let mut output = Vec::new();

        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
        self.serialize(&mut serializer)?;

        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Exports the configuration as JSON to the given file path.
    /// This is a one-way export: nothing is reloaded.
    pub fn store_to_path<S: AsRef<Path>>(
        &self,
        export_file_path: S,
    ) -> Result<(), ConfigurationExportError> {
        let export_file_path = export_file_path.as_ref();
        let contents = self.to_json_string()?;

        fs::write(export_file_path, contents).map_err(|source| {
            ConfigurationExportError::Write {
                path: export_file_path.to_path_buf(),
                source,
            }
        })?;

        debug!("Configuration exported to {}.", export_file_path.display());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    const SETTINGS_TOML: &str = r#"
__builtins__ = "reserved"
__doc__ = "reserved"
PATH = "/tmp/digiskr"
LOG_TO_FILE = true
DECODER_QUEUE_LENGTH = 10

[STATIONS.kiwi_0]
server_host = "kiwisdr.local"
server_port = 8073
callsign = "N0CALL"
grid = "JN76"

[STATIONS.kiwi_1]
server_host = "10.0.0.2"
server_port = 8073
callsign = "N1CALL"
"#;

    const SETTINGS_JSON: &str = r#"{
    "PATH": "/tmp/digiskr",
    "LOG_TO_FILE": true,
    "DECODER_QUEUE_LENGTH": 10,
    "__comment__": "kept, structured data has no reserved keys",
    "STATIONS": {
        "kiwi_0": {
            "server_host": "kiwisdr.local",
            "server_port": 8073,
            "callsign": "N0CALL",
            "grid": "JN76"
        },
        "kiwi_1": {
            "server_host": "10.0.0.2",
            "server_port": 8073,
            "callsign": "N1CALL"
        }
    }
}"#;

    fn write_file(directory: &Path, file_name: &str, contents: &str) -> PathBuf {
        let path = directory.join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn load_json(contents: &str) -> Configuration {
        let directory = tempfile::tempdir().unwrap();
        let path = write_file(directory.path(), "settings.json", contents);

        Configuration::load_from_path(path).unwrap()
    }

    #[test]
    fn toml_loads_all_non_reserved_keys() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_file(directory.path(), "settings.toml", SETTINGS_TOML);

        let configuration = Configuration::load_from_path(&path).unwrap();
        let values = configuration.to_value_map().unwrap();

        let keys = values.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["PATH", "LOG_TO_FILE", "DECODER_QUEUE_LENGTH", "STATIONS"]
        );

        assert_eq!(
            configuration.temporary_directory_path(),
            Some(Path::new("/tmp/digiskr"))
        );
        assert_eq!(configuration.value("LOG_TO_FILE"), Some(&json!(true)));
        assert_eq!(configuration.value("DECODER_QUEUE_LENGTH"), Some(&json!(10)));
        assert!(!configuration.contains_key("__builtins__"));
        assert_eq!(configuration.source.format, SourceFormat::Toml);
    }

    #[test]
    fn json_loads_every_top_level_key_in_order() {
        let configuration = load_json(SETTINGS_JSON);

        let document: IndexMap<String, ConfigValue> = serde_json::from_str(SETTINGS_JSON).unwrap();
        let values = configuration.to_value_map().unwrap();

        assert_eq!(values, document);
        assert_eq!(
            values.keys().collect::<Vec<_>>(),
            document.keys().collect::<Vec<_>>()
        );
        assert!(configuration.contains_key("__comment__"));
        assert_eq!(configuration.source.format, SourceFormat::Json);
    }

    #[test]
    fn both_formats_produce_the_same_stations() {
        let directory = tempfile::tempdir().unwrap();
        let toml_path = write_file(directory.path(), "settings.toml", SETTINGS_TOML);
        let json_path = write_file(directory.path(), "settings.json", SETTINGS_JSON);

        let from_toml = Configuration::load_from_path(toml_path).unwrap();
        let from_json = Configuration::load_from_path(json_path).unwrap();

        assert_eq!(from_toml.stations, from_json.stations);
        assert_eq!(from_toml.temporary_directory, from_json.temporary_directory);
        assert_eq!(from_toml.station_count(), 2);

        let station = from_toml.station("kiwi_0").unwrap();
        assert_eq!(station.callsign(), Some("N0CALL"));
        assert_eq!(station.attribute("server_port"), Some(&json!(8073)));
        assert_eq!(station.attribute("grid"), Some(&json!("JN76")));
    }

    #[test]
    fn stations_keep_document_order() {
        let configuration = load_json(r#"{ "STATIONS": { "zulu": {}, "alpha": {} } }"#);

        let identifiers = configuration
            .stations_table()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        assert_eq!(identifiers, vec!["zulu", "alpha"]);

        let exported = configuration.to_json_string().unwrap();
        assert!(exported.find("zulu").unwrap() < exported.find("alpha").unwrap());
    }

    #[test]
    fn null_values_count_as_missing() {
        let configuration = load_json(r#"{ "PATH": null, "STATIONS": null }"#);

        assert!(configuration.temporary_directory.is_none());
        assert!(configuration.stations.is_none());
        assert!(!configuration.contains_key(TEMPORARY_DIRECTORY_KEY));
        assert!(!configuration.contains_key(STATIONS_KEY));
    }

    #[test]
    fn wrongly_shaped_settings_still_load() {
        let configuration = load_json(
            r#"{
                "PATH": 42,
                "STATIONS": ["kiwi_0"]
            }"#,
        );

        assert_eq!(
            configuration.temporary_directory,
            Some(Setting::Malformed(json!(42)))
        );
        assert_eq!(
            configuration.stations,
            Some(Setting::Malformed(json!(["kiwi_0"])))
        );
        assert_eq!(configuration.station_count(), 0);
    }

    #[test]
    fn wrongly_shaped_station_still_loads() {
        let configuration = load_json(
            r#"{
                "STATIONS": {
                    "kiwi_0": "kiwisdr.local",
                    "kiwi_1": { "callsign": 42 }
                }
            }"#,
        );

        let stations = configuration.stations_table().unwrap();
        assert_eq!(
            stations.get("kiwi_0"),
            Some(&Setting::Malformed(json!("kiwisdr.local")))
        );

        let station = configuration.station("kiwi_1").unwrap();
        assert_eq!(station.callsign_value(), Some(&json!(42)));
        assert_eq!(station.callsign(), None);
    }

    #[test]
    fn null_callsign_is_still_declared() {
        let configuration = load_json(r#"{ "STATIONS": { "a": { "callsign": null } } }"#);

        let station = configuration.station("a").unwrap();
        assert_eq!(station.callsign_value(), Some(&ConfigValue::Null));
    }

    #[test]
    fn loading_missing_file_is_not_found() {
        let directory = tempfile::tempdir().unwrap();

        let error = Configuration::load_from_path(directory.path().join("settings.toml"))
            .unwrap_err();

        assert!(error.is_not_found());
    }

    #[test]
    fn loading_unsupported_format_fails() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_file(directory.path(), "settings.py", "PATH = '/tmp'");

        let error = Configuration::load_from_path(path).unwrap_err();

        assert!(matches!(
            error,
            ConfigurationLoadError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn toml_datetimes_export_as_strings() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_file(
            directory.path(),
            "settings.toml",
            "PATH = \"/tmp/digiskr\"\nWHEN = 1979-05-27T07:32:00Z\n",
        );

        let configuration = Configuration::load_from_path(path).unwrap();

        assert_eq!(
            configuration.value("WHEN"),
            Some(&json!("1979-05-27T07:32:00Z"))
        );
        assert!(!configuration
            .to_json_string()
            .unwrap()
            .contains("toml_private_datetime"));
    }

    #[test]
    fn export_is_indented_and_reloads() {
        let directory = tempfile::tempdir().unwrap();
        let toml_path = write_file(directory.path(), "settings.toml", SETTINGS_TOML);
        let export_path = directory.path().join("exported.json");

        let configuration = Configuration::load_from_path(toml_path).unwrap();
        configuration.store_to_path(&export_path).unwrap();

        let exported = fs::read_to_string(&export_path).unwrap();
        assert!(exported.starts_with("{\n    \"PATH\""));

        let reloaded = Configuration::load_from_path(&export_path).unwrap();
        assert_eq!(
            reloaded.to_value_map().unwrap(),
            configuration.to_value_map().unwrap()
        );
        assert_eq!(reloaded.source.format, SourceFormat::Json);
    }
}
