use clap::Parser;
use miette::{miette, Context, Result};
use tracing::{debug, error, info, warn};

use digiskr::{
    configuration::{CandidateResolver, ConfigurationCache, ConfigurationHandle},
    logging::{initialize_tracing, parse_level_filter},
    modes::DecodingMode,
    DECODING_SOFTWARE,
    KIWI_USER,
};

use crate::cli::CLIArgs;

mod cli;


/// File log level filter, used only if file logging is enabled.
const LOG_FILE_LEVEL_FILTER: &str = "debug";

const LOG_FILE_NAME: &str = "digiskr.log";


fn print_band_plans() {
    for mode in DecodingMode::ALL {
        println!("{} ({})", mode, mode.symbol());

        if mode.bands().is_empty() {
            println!("    no band plan");
            continue;
        }

        for (band, frequency) in mode.bands() {
            println!("    {:>5} m: {:>10.6} MHz", band, frequency);
        }
    }
}

fn log_stations(configuration: &ConfigurationHandle) {
    let Some(stations) = configuration.stations_table() else {
        return;
    };

    for (identifier, station) in stations {
        let callsign = station
            .valid()
            .and_then(|station| station.callsign())
            .unwrap_or("-");

        info!("Station {}: callsign {}.", identifier, callsign);
    }
}


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    let tracing_guard = initialize_tracing(
        parse_level_filter(&cli_args.log_level)?,
        parse_level_filter(LOG_FILE_LEVEL_FILTER)?,
        cli_args.log_file_directory.as_deref(),
        LOG_FILE_NAME,
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!("{} starting.", DECODING_SOFTWARE);

    if cli_args.print_bands {
        print_band_plans();
    }


    // Load configuration.
    let resolver = match cli_args.configuration_file_path.as_ref() {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            CandidateResolver::with_single_candidate(path)
        }
        None => {
            info!("Loading configuration at default paths.");
            CandidateResolver::with_default_candidates()?
        }
    };

    let configuration_cache = ConfigurationCache::new(resolver);

    let configuration = configuration_cache
        .get()
        .wrap_err("Failed to load configuration file.")?;

    debug!(
        "Configuration loaded from {} ({}).",
        configuration.source.file_path.display(),
        configuration.source.format
    );


    let configuration_errors = configuration_cache
        .validate()
        .wrap_err("Failed to validate configuration.")?;

    if !configuration_errors.is_empty() {
        for configuration_error in &configuration_errors {
            error!("{}", configuration_error);
        }

        return Err(miette!(
            "Configuration is invalid ({} error(s)), please fix it and try again.",
            configuration_errors.len()
        ));
    }

    info!(
        "Configuration is valid, {} station(s) configured.",
        configuration.station_count()
    );
    debug!("Stations will be accessed as {}.", KIWI_USER);
    log_stations(&configuration);


    if let Some(export_path) = cli_args.export_configuration_path.as_ref() {
        if export_path.exists() {
            warn!("Overwriting existing file {}.", export_path.display());
        }

        configuration_cache
            .store(export_path)
            .wrap_err("Failed to export configuration.")?;

        info!("Configuration exported to {}.", export_path.display());
    }


    drop(tracing_guard);
    Ok(())
}
