use indexmap::IndexMap;
use serde::Serialize;

use super::{ConfigValue, Setting};
use crate::configuration::{traits::ResolvableConfiguration, ConfigurationLoadError};


/// Key of the callsign inside a station table.
pub const CALLSIGN_KEY: &str = "callsign";

/// Receiving stations, keyed by station identifier, in document order.
pub type Stations = IndexMap<String, Setting<Station>>;


/// Raw `STATIONS` value, before its shape is known.
pub(super) struct UnresolvedStations(pub(super) ConfigValue);

/// Raw value of a single `STATIONS` entry.
pub(super) struct UnresolvedStation(ConfigValue);


/// A single receiving station from the `STATIONS` table.
///
/// All fields (server host and port, grid locator, antenna, callsign, ...)
/// are kept as-is and in document order.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Station {
    pub attributes: IndexMap<String, ConfigValue>,
}

impl ResolvableConfiguration for UnresolvedStations {
    type Resolved = Setting<Stations>;

    fn resolve(self) -> Result<Self::Resolved, ConfigurationLoadError> {
        let entries = match self.0 {
            ConfigValue::Object(entries) => entries,
            other => return Ok(Setting::Malformed(other)),
        };

        let mut stations = Stations::with_capacity(entries.len());
        for (identifier, station) in entries {
            stations.insert(identifier, UnresolvedStation(station).resolve()?);
        }

        Ok(Setting::Valid(stations))
    }
}

impl ResolvableConfiguration for UnresolvedStation {
    type Resolved = Setting<Station>;

    fn resolve(self) -> Result<Self::Resolved, ConfigurationLoadError> {
        match self.0 {
            ConfigValue::Object(attributes) => Ok(Setting::Valid(Station {
                attributes: attributes.into_iter().collect(),
            })),
            other => Ok(Setting::Malformed(other)),
        }
    }
}

impl Station {
    /// Returns the raw callsign value if the station declares one.
    /// A declared `null` callsign is still `Some`.
    pub fn callsign_value(&self) -> Option<&ConfigValue> {
        self.attributes.get(CALLSIGN_KEY)
    }

    /// Returns the callsign, if it is declared as a string.
    pub fn callsign(&self) -> Option<&str> {
        self.callsign_value()?.as_str()
    }

    pub fn attribute(&self, name: &str) -> Option<&ConfigValue> {
        self.attributes.get(name)
    }
}
