//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading and error classification
//! used by every subcommand.

use crate::app::services::ingest::TextDecoding;
use crate::cli::args::IndexArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins over the level derived from the command line.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hl7_indexer={}", log_level)));

    let initialized = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    initialized
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Pick the explicit config file, else the default location when it exists
pub fn resolve_config_file(explicit: Option<&Path>) -> Option<std::path::PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.exists()),
    }
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(args: &IndexArgs) -> Result<Config> {
    info!("Loading configuration");

    let config_file = resolve_config_file(args.config_file.as_deref());
    match &config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = Config::load_layered(config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Apply explicitly given command-line values over the loaded configuration
pub fn apply_cli_overrides(config: &mut Config, args: &IndexArgs) {
    if let Some(input_path) = &args.input_path {
        config.processing.input_path = input_path.clone();
    }
    if let Some(output_path) = &args.output_path {
        config.storage.output_path = output_path.clone();
    }
    if let Some(collection) = &args.collection {
        config.storage.collection = collection.clone();
    }
    if let Some(workers) = args.workers {
        config.performance.parallel_workers = workers;
    }

    // Flags only ever switch behavior on
    if args.recursive {
        config.processing.recursive = true;
    }
    if args.dry_run {
        config.processing.dry_run = true;
    }
    if args.skip_indexes {
        config.storage.ensure_indexes = false;
    }
    if args.lossy_utf8 {
        config.processing.decoding = TextDecoding::Lossy;
    }

    config.logging.level = args.get_log_level().to_string();
}

/// Check if an error is critical enough to stop processing
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. } | Error::ProcessingInterrupted { .. }
    )
}
