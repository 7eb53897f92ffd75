//! Configuration core of DigiSkimmer.
//!
//! Loads the station configuration from the first usable candidate file,
//! caches it for the lifetime of the process and validates it.
//! Decoding components receive the loaded configuration as a
//! [`ConfigurationHandle`][configuration::ConfigurationHandle] and read
//! the mode/band tables from [`modes`].

pub mod configuration;
pub mod logging;
pub mod modes;


/***
 * Compile-time configuration values
 */

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User name we identify ourselves with when connecting to KiwiSDR stations.
pub const KIWI_USER: &str = concat!("digiskr_", env!("CARGO_PKG_VERSION"));

/// Decoding software name reported along with spots.
pub const DECODING_SOFTWARE: &str = concat!("DigiSkimmer ", env!("CARGO_PKG_VERSION"));


/***
 * END OF compile-time configuration values
 */
