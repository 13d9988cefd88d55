//! Command-line argument definitions for the HL7 indexer
//!
//! Defines the CLI interface using the clap derive API.

use crate::constants::MAX_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the HL7 message indexer
///
/// Parses pipe-delimited HL7 v2 messages, extracts normalized documents per
/// message type and stores them for search.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hl7-indexer",
    version,
    about = "Parse HL7 v2 clinical messages and index normalized documents",
    long_about = "Reads a directory of pipe-delimited HL7 v2 message files, decomposes each \
                  message into segments and fields, extracts a normalized document keyed by \
                  message type (admissions, orders, results) and stores it in a JSON-lines \
                  collection with patient, full-text and expiry index definitions."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Index every message file in a directory
    Index(IndexArgs),
    /// Parse and extract a single message file and print the result
    Inspect(InspectArgs),
}

/// Arguments for the index command
#[derive(Debug, Clone, Default, Parser)]
pub struct IndexArgs {
    /// Directory holding message files
    ///
    /// Files matching *.hl7 or *.txt (any case) are indexed. Falls back to
    /// HL7_INPUT_PATH or the config file when omitted.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        help = "Directory holding message files"
    )]
    pub input_path: Option<PathBuf>,

    /// Directory receiving collection files and the index manifest
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for the document store"
    )]
    pub output_path: Option<PathBuf>,

    /// Collection receiving the documents
    #[arg(
        long = "collection",
        value_name = "NAME",
        help = "Collection name (default: messages)"
    )]
    pub collection: Option<String>,

    /// Number of parallel workers
    ///
    /// Defaults to the number of available CPUs.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse/extract workers"
    )]
    pub workers: Option<usize>,

    /// Path to configuration file
    ///
    /// YAML configuration file. If not specified, looks for
    /// ~/.config/hl7-indexer/config.yaml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (YAML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Descend into subdirectories of the input directory
    #[arg(long = "recursive", help = "Search subdirectories for message files")]
    pub recursive: bool,

    /// Parse and extract without writing anything
    #[arg(
        long = "dry-run",
        help = "Parse and extract every file without writing to the store"
    )]
    pub dry_run: bool,

    /// Skip the one-time index setup
    #[arg(long = "skip-indexes", help = "Do not write index definitions")]
    pub skip_indexes: bool,

    /// Decode non-UTF-8 files lossily instead of failing them
    #[arg(
        long = "lossy-utf8",
        help = "Index files with invalid UTF-8, replacing bad bytes"
    )]
    pub lossy_utf8: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Message file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the parsed segment structure instead of the document
    #[arg(long = "parsed", help = "Print parsed segments instead of the document")]
    pub parsed: bool,

    /// Path to configuration file (for separators)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (YAML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl IndexArgs {
    /// Validate argument consistency before any work starts
    pub fn validate(&self) -> Result<()> {
        if let Some(input_path) = &self.input_path {
            if !input_path.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input_path.display()
                )));
            }

            if !input_path.is_dir() {
                return Err(Error::configuration(format!(
                    "Input path is not a directory: {}",
                    input_path.display()
                )));
            }
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > MAX_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_WORKERS
                )));
            }
        }

        if let Some(collection) = &self.collection {
            if collection.trim().is_empty() {
                return Err(Error::configuration("Collection name cannot be empty"));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the log level from verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are drawn unless quiet or emitting JSON
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl InspectArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.file.is_file() {
            return Err(Error::configuration(format!(
                "Message file does not exist: {}",
                self.file.display()
            )));
        }
        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
