//! Energy tracker entry point: CLI wiring and config-driven registry construction.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing::info;

use energy_tracker::cli::CliOptions;
use energy_tracker::clock::{Clock, MonotonicClock};
use energy_tracker::config::TrackerConfig;
use energy_tracker::io::export::export_csv;
use energy_tracker::logging;
use energy_tracker::report::EnergyReport;

/// Loads the configuration: `--config` takes priority, then `--preset`, then
/// the default preset.
fn load_config(cli: &CliOptions) -> TrackerConfig {
    let loaded = if let Some(ref path) = cli.config {
        TrackerConfig::from_toml_file(path)
    } else {
        TrackerConfig::from_preset(
            cli.preset
                .as_deref()
                .unwrap_or(CliOptions::DEFAULT_PRESET),
        )
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

#[cfg(feature = "tui")]
fn tui_requested(cli: &CliOptions) -> bool {
    cli.tui
}

#[cfg(not(feature = "tui"))]
fn tui_requested(_cli: &CliOptions) -> bool {
    false
}

fn main() {
    let cli = CliOptions::parse();
    let mut config = load_config(&cli);

    // Apply CLI overrides
    if let Some(rate) = cli.rate {
        config.tariff.rate_per_kwh = rate;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(ref path) = cli.export {
        config.export.path.clone_from(path);
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // The TUI owns the terminal, so it only logs to a file.
    if !tui_requested(&cli) || config.logging.file.is_some() {
        if let Err(e) = logging::init_from_config(&config.logging) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    let registry = config.build_registry();
    info!(devices = registry.len(), tariff = %config.tariff(), "tracker ready");

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = energy_tracker::tui::run(&config, registry) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(energy_tracker::api::AppState::new(
            energy_tracker::registry::SharedRegistry::new(registry),
            Arc::new(MonotonicClock),
            config.tariff(),
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(energy_tracker::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
        return;
    }

    let report = EnergyReport::capture(&registry, MonotonicClock.now(), config.tariff());
    println!("{report}");

    if cli.export.is_some() {
        let path: &Path = &config.export.path;
        if let Err(e) = export_csv(&report.devices, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Report written to {}", path.display());
    }
}
