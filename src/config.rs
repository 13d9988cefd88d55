//! Configuration management and validation
//!
//! Settings are layered: built-in defaults, then an optional YAML file,
//! then `HL7_*` environment variables, then command-line overrides applied
//! by the CLI layer. [`Config::validate`] runs last.

use crate::app::services::ingest::{IndexerOptions, TextDecoding};
use crate::app::services::segment_parser::Separators;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CHANNEL_CAPACITY, DEFAULT_COLLECTION,
    DEFAULT_EXPIRE_AFTER_DAYS, DEFAULT_FILE_PATTERNS, DEFAULT_INSERT_TIMEOUT_SECS,
    DEFAULT_OUTPUT_DIR, MAX_EXPIRE_AFTER_DAYS, MAX_WORKERS, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub parser: ParserConfig,
    pub performance: PerformanceConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Input selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory holding message files
    pub input_path: PathBuf,
    /// File-name glob patterns, matched case-insensitively
    pub file_patterns: Vec<String>,
    pub recursive: bool,
    /// Parse and extract without writing to the store
    pub dry_run: bool,
    /// How files that are not valid UTF-8 are handled
    pub decoding: TextDecoding,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            file_patterns: DEFAULT_FILE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            recursive: false,
            dry_run: false,
            decoding: TextDecoding::Strict,
        }
    }
}

/// Message delimiters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub separators: Separators,
}

/// Worker pool sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub parallel_workers: usize,
    pub channel_capacity: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_workers: num_cpus::get(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub output_path: PathBuf,
    pub collection: String,
    pub insert_timeout_secs: u64,
    /// Expiry applied through the processing-timestamp index
    pub expire_after_days: u64,
    pub ensure_indexes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_DIR),
            collection: DEFAULT_COLLECTION.to_string(),
            insert_timeout_secs: DEFAULT_INSERT_TIMEOUT_SECS,
            expire_after_days: DEFAULT_EXPIRE_AFTER_DAYS,
            ensure_indexes: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults with explicit input and output locations
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        let mut config = Self::default();
        config.processing.input_path = input_path;
        config.storage.output_path = output_path;
        config
    }

    /// `~/.config/hl7-indexer/config.yaml` (platform config dir)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine the user config directory"))
    }

    /// Read a YAML config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Defaults, then the config file (if any), then the environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `HL7_*` variables using the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup(env_vars::INPUT_PATH) {
            self.processing.input_path = PathBuf::from(input);
        }
        if let Some(output) = lookup(env_vars::OUTPUT_PATH) {
            self.storage.output_path = PathBuf::from(output);
        }
        if let Some(collection) = lookup(env_vars::COLLECTION) {
            self.storage.collection = collection;
        }
        if let Some(workers) = lookup(env_vars::WORKERS) {
            self.performance.parallel_workers = workers.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    env_vars::WORKERS,
                    workers
                ))
            })?;
        }
        Ok(())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.parallel_workers = workers;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.storage.collection = collection.into();
        self
    }

    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.parser.separators = separators;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.processing.dry_run = dry_run;
        self
    }

    pub fn insert_timeout(&self) -> Duration {
        Duration::from_secs(self.storage.insert_timeout_secs)
    }

    /// Indexer options derived from the performance and storage sections
    pub fn indexer_options(&self, show_progress: bool) -> IndexerOptions {
        IndexerOptions::new()
            .with_collection(self.storage.collection.clone())
            .with_workers(self.performance.parallel_workers)
            .with_channel_capacity(self.performance.channel_capacity)
            .with_insert_timeout(self.insert_timeout())
            .with_ensure_indexes(self.storage.ensure_indexes)
            .with_decoding(self.processing.decoding)
            .with_progress(show_progress)
    }

    /// Create the output directory if needed
    pub fn ensure_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage.output_path).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory {}",
                    self.storage.output_path.display()
                ),
                e,
            )
        })
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let workers = self.performance.parallel_workers;
        if workers == 0 {
            return Err(Error::configuration("Worker count must be greater than 0"));
        }
        if workers > MAX_WORKERS {
            return Err(Error::configuration(format!(
                "Worker count {} exceeds the maximum of {}",
                workers, MAX_WORKERS
            )));
        }
        if self.performance.channel_capacity == 0 {
            return Err(Error::configuration(
                "Channel capacity must be greater than 0",
            ));
        }

        let separators = self.parser.separators;
        if separators.field == separators.component {
            return Err(Error::configuration(format!(
                "Field and component separators must differ (both '{}')",
                separators.field
            )));
        }
        if separators.field.is_whitespace() || separators.component.is_whitespace() {
            return Err(Error::configuration("Separators cannot be whitespace"));
        }

        if self.storage.collection.trim().is_empty() {
            return Err(Error::configuration("Collection name cannot be empty"));
        }
        if self.storage.insert_timeout_secs == 0 {
            return Err(Error::configuration(
                "Insert timeout must be greater than 0 seconds",
            ));
        }
        if self.storage.expire_after_days == 0 {
            return Err(Error::configuration(
                "Expiry must be at least one day",
            ));
        }
        if self.storage.expire_after_days > MAX_EXPIRE_AFTER_DAYS {
            return Err(Error::configuration(format!(
                "Expiry of {} days exceeds the maximum of {}",
                self.storage.expire_after_days, MAX_EXPIRE_AFTER_DAYS
            )));
        }

        if self.processing.file_patterns.is_empty() {
            return Err(Error::configuration(
                "At least one file pattern is required",
            ));
        }

        Ok(())
    }
}
