use std::path::PathBuf;

use clap::Parser;

/// Track appliance running time, energy use, and electricity cost.
#[derive(Debug, Parser)]
#[command(name = "energy-tracker", version)]
pub struct CliOptions {
    /// Load configuration from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (empty, household)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the tariff in currency per kWh
    #[arg(long, value_name = "RATE")]
    pub rate: Option<f64>,

    /// Write the CSV report to this path
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Launch the interactive terminal UI
    #[cfg(feature = "tui")]
    #[arg(long)]
    pub tui: bool,

    /// Serve the REST API
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl CliOptions {
    /// Preset to fall back on when neither `--config` nor `--preset` is given.
    pub const DEFAULT_PRESET: &'static str = "empty";
}
