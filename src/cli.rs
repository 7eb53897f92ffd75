//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

use digiskr::configuration::DEFAULT_EXPORT_FILE_NAME;



/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "digiskr",
    author,
    about = "DigiSkimmer station configuration loader and validator.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, `./settings.toml` and then `./settings.json` are tried.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the configuration file to use (.toml or .json). \
                Defaults to ./settings.toml, falling back to ./settings.json."
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        long = "export-configuration",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXPORT_FILE_NAME,
        help = "After successful validation, export the loaded configuration as JSON \
                to the given path (./settings.json if no path is given)."
    )]
    pub export_configuration_path: Option<PathBuf>,

    #[arg(
        long = "print-bands",
        help = "Print the decoding modes and their band plans."
    )]
    pub print_bands: bool,

    #[arg(
        long = "log-level",
        default_value = "info",
        help = "Console log level filter (e.g. \"info\" or \"digiskr=debug\")."
    )]
    pub log_level: String,

    #[arg(
        long = "log-file-directory",
        help = "If set, logs are additionally written into a daily-rotated file \
                inside this directory."
    )]
    pub log_file_directory: Option<PathBuf>,
}
