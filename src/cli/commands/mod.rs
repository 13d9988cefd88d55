//! Command implementations for the HL7 indexer CLI
//!
//! Each subcommand lives in its own module:
//! - `index`: directory ingestion into the document store
//! - `inspect`: single-file parse and extract, printed as JSON

pub mod index;
pub mod inspect;
pub mod report;
pub mod shared;

pub use shared::is_critical_error;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Dispatch to the requested subcommand
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Index(index_args)) => {
            index::run_index(index_args, cancellation_token).await?;
            Ok(())
        }
        Some(Commands::Inspect(inspect_args)) => inspect::run_inspect(inspect_args).await,
        None => Err(Error::configuration("No command given")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_command_is_rejected() {
        let result = run(Args { command: None }, CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
