//! Inspect command implementation
//!
//! Runs a single message file through the parser and extractor and prints
//! the result as pretty JSON, without touching any store.

use super::shared::{resolve_config_file, setup_logging};
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::ingest::{TextDecoding, read_message_text};
use crate::app::services::segment_parser::{SegmentParser, Separators};
use crate::cli::args::InspectArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::Path;
use tracing::info;

/// Inspect command runner
pub async fn run_inspect(args: InspectArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let config_file = resolve_config_file(args.config_file.as_deref());
    let config = Config::load_layered(config_file.as_deref())?;
    config.validate()?;

    info!("Inspecting {}", args.file.display());
    let rendered = inspect_file(
        &args.file,
        config.parser.separators,
        config.processing.decoding,
        args.parsed,
    )
    .await?;
    println!("{}", rendered);

    Ok(())
}

/// Render one message file as JSON
///
/// With `parsed` set the output is the segment mapping, otherwise the
/// normalized document.
pub async fn inspect_file(
    path: &Path,
    separators: Separators,
    decoding: TextDecoding,
    parsed: bool,
) -> Result<String> {
    let text = read_message_text(path, decoding).await?;

    let rendered = if parsed {
        let message = SegmentParser::new(separators).parse(&text);
        serde_json::to_string_pretty(&message)
    } else {
        let document = DocumentExtractor::new(separators).process(&text);
        serde_json::to_string_pretty(&document)
    };

    rendered.map_err(|e| {
        Error::serialization(format!("Failed to render {}", path.display()), e)
    })
}
