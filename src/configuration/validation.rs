//! Semantic checks on a loaded [`Configuration`].
//!
//! Each check is independent and reports at most one [`ConfigError`].
//! [`validate_configuration`] runs all of them and collects every failure,
//! so a single pass reports problems from all checks at once.
//!
//! Settings with the wrong shape (e.g. `STATIONS` given as a list) load
//! fine and are reported here like any other problem.

use super::{
    traits::ConfigurationCheck,
    ConfigError,
    ConfigValue,
    Configuration,
    Setting,
    CALLSIGN_KEY,
    STATIONS_KEY,
    TEMPORARY_DIRECTORY_KEY,
};


/// Human-readable name of a value's type, used in shape errors.
fn value_kind(value: &ConfigValue) -> &'static str {
    match value {
        ConfigValue::Null => "null",
        ConfigValue::Bool(_) => "a boolean",
        ConfigValue::Number(_) => "a number",
        ConfigValue::String(_) => "a string",
        ConfigValue::Array(_) => "a list",
        ConfigValue::Object(_) => "a mapping",
    }
}


/// Fails if the temporary directory (`PATH`) is missing, empty or not a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporaryDirectoryCheck;

impl ConfigurationCheck for TemporaryDirectoryCheck {
    fn check(&self, configuration: &Configuration) -> Option<ConfigError> {
        match configuration.temporary_directory.as_ref() {
            Some(Setting::Valid(path)) if !path.as_os_str().is_empty() => None,
            Some(Setting::Malformed(value)) => Some(ConfigError::new(
                TEMPORARY_DIRECTORY_KEY,
                format!("temporary directory must be a path, found {}", value_kind(value)),
            )),
            _ => Some(ConfigError::new(
                TEMPORARY_DIRECTORY_KEY,
                "temporary directory is not set",
            )),
        }
    }
}


/// Fails if the station table (`STATIONS`) is missing, empty or not a mapping,
/// or if any station is not a mapping or declares no callsign.
///
/// Stations are checked in document order and only the first failing one
/// is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationsCheck;

impl ConfigurationCheck for StationsCheck {
    fn check(&self, configuration: &Configuration) -> Option<ConfigError> {
        let stations = match configuration.stations.as_ref() {
            Some(Setting::Valid(stations)) if !stations.is_empty() => stations,
            Some(Setting::Malformed(value)) => {
                return Some(ConfigError::new(
                    STATIONS_KEY,
                    format!(
                        "{STATIONS_KEY} must be a mapping of station identifiers \
                         to station settings, found {}",
                        value_kind(value)
                    ),
                ))
            }
            _ => {
                return Some(ConfigError::new(
                    STATIONS_KEY,
                    format!("{STATIONS_KEY} is not set"),
                ))
            }
        };

        stations.iter().find_map(|(identifier, station)| {
            let station = match station {
                Setting::Valid(station) => station,
                Setting::Malformed(value) => {
                    return Some(ConfigError::new(
                        STATIONS_KEY,
                        format!(
                            "{identifier} must be a mapping of station settings, found {}",
                            value_kind(value)
                        ),
                    ))
                }
            };

            // A declared callsign passes even when it is null or empty.
            match station.callsign_value() {
                None => Some(ConfigError::new(
                    STATIONS_KEY,
                    format!("{identifier}->{CALLSIGN_KEY} is not set"),
                )),
                Some(ConfigValue::String(_) | ConfigValue::Null) => None,
                Some(other) => Some(ConfigError::new(
                    STATIONS_KEY,
                    format!(
                        "{identifier}->{CALLSIGN_KEY} must be a string, found {}",
                        value_kind(other)
                    ),
                )),
            }
        })
    }
}


/// All checks, in the order they are run and reported.
pub fn default_checks() -> Vec<Box<dyn ConfigurationCheck>> {
    vec![Box::new(TemporaryDirectoryCheck), Box::new(StationsCheck)]
}

/// Runs every check against `configuration` and returns all failures,
/// in check order. An empty list means the configuration is valid.
pub fn validate_configuration(configuration: &Configuration) -> Vec<ConfigError> {
    validate_with_checks(configuration, &default_checks())
}

pub fn validate_with_checks(
    configuration: &Configuration,
    checks: &[Box<dyn ConfigurationCheck>],
) -> Vec<ConfigError> {
    checks
        .iter()
        .filter_map(|check| check.check(configuration))
        .collect()
}
