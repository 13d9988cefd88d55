//! Index command implementation
//!
//! Discovers message files, runs them through the ingestion pipeline into
//! the JSON-lines store (or a discarding sink for dry runs) and reports.

use super::report::generate_final_report;
use super::shared::{load_configuration, setup_logging};
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::document_store::{
    DiscardSink, DocumentSink, JsonLinesStore, default_indexes,
};
use crate::app::services::file_discovery::FileDiscovery;
use crate::app::services::ingest::{Indexer, IngestStats};
use crate::cli::args::IndexArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Index command runner
///
/// 1. Set up logging and configuration
/// 2. Discover message files
/// 3. Run the indexer with progress reporting
/// 4. Print the summary
///
/// An interrupted run still prints its partial summary before returning
/// [`Error::ProcessingInterrupted`].
pub async fn run_index(
    args: IndexArgs,
    cancellation_token: CancellationToken,
) -> Result<IngestStats> {
    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting HL7 indexer");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;

    let stats = index_messages(&config, args.show_progress(), cancellation_token).await?;

    generate_final_report(args.output_format, &config, &stats)?;

    if stats.interrupted {
        return Err(Error::processing_interrupted(format!(
            "Stopped after {} of {} files",
            stats.files_processed(),
            stats.files_discovered
        )));
    }

    Ok(stats)
}

/// Discover the configured input files
pub fn discover_files(config: &Config) -> Result<Vec<PathBuf>> {
    let files = FileDiscovery::new(&config.processing.input_path)
        .with_patterns(config.processing.file_patterns.as_slice())?
        .with_recursive(config.processing.recursive)
        .discover()?;

    info!(
        "Discovered {} message files in {}",
        files.len(),
        config.processing.input_path.display()
    );
    Ok(files)
}

/// Run a full indexing pass for an already validated configuration
pub async fn index_messages(
    config: &Config,
    show_progress: bool,
    cancellation_token: CancellationToken,
) -> Result<IngestStats> {
    let files = discover_files(config)?;
    let indexes = default_indexes(config.storage.expire_after_days);

    if config.processing.dry_run {
        info!("Dry run: documents are extracted but not written");
        let sink = Arc::new(DiscardSink::with_indexes(indexes));
        return run_with_sink(sink, config, files, show_progress, cancellation_token).await;
    }

    config.ensure_output_directory()?;
    info!(
        "Writing collection '{}' under {}",
        config.storage.collection,
        config.storage.output_path.display()
    );
    let store = Arc::new(JsonLinesStore::with_indexes(
        &config.storage.output_path,
        indexes,
    ));
    run_with_sink(store, config, files, show_progress, cancellation_token).await
}

async fn run_with_sink<S: DocumentSink>(
    sink: Arc<S>,
    config: &Config,
    files: Vec<PathBuf>,
    show_progress: bool,
    cancellation_token: CancellationToken,
) -> Result<IngestStats> {
    let extractor = DocumentExtractor::new(config.parser.separators);
    let indexer = Indexer::new(sink, extractor, config.indexer_options(show_progress));
    indexer.run(files, cancellation_token).await
}
