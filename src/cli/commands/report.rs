//! Run summaries for the index command

use crate::app::services::ingest::IngestStats;
use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use tracing::info;

/// Failures listed individually in the human report
const MAX_LISTED_FAILURES: usize = 10;

/// Print the final report in the requested format
pub fn generate_final_report(
    format: OutputFormat,
    config: &Config,
    stats: &IngestStats,
) -> Result<()> {
    info!("Generating final report");

    match format {
        OutputFormat::Human => {
            print!("{}", generate_human_report(config, stats));
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", generate_json_report(config, stats)?);
            Ok(())
        }
    }
}

/// Human-readable summary
pub fn generate_human_report(config: &Config, stats: &IngestStats) -> String {
    let mut out = String::new();

    let title = if stats.interrupted {
        "Indexing Interrupted".bright_yellow().bold()
    } else {
        "Indexing Complete".bright_green().bold()
    };
    out.push_str(&format!("\n{}\n", title));

    let destination = if config.processing.dry_run {
        "dry run (nothing written)".to_string()
    } else {
        format!(
            "{} / {}",
            config.storage.output_path.display(),
            config.storage.collection
        )
    };
    out.push_str(&format!(
        "  {} {}\n",
        "Destination:".bright_cyan(),
        destination.bright_white()
    ));
    out.push_str(&format!(
        "  {} {}\n",
        "Files discovered:".bright_cyan(),
        stats.files_discovered.to_string().bright_white()
    ));
    out.push_str(&format!(
        "  {} {}\n",
        "Documents indexed:".bright_cyan(),
        stats.files_indexed.to_string().bright_white().bold()
    ));
    for (kind, count) in &stats.documents_by_kind {
        out.push_str(&format!("    {} {}\n", format!("{}:", kind).cyan(), count));
    }
    out.push_str(&format!(
        "  {} {}\n",
        "Registry flagged:".bright_cyan(),
        stats.registry_flagged.to_string().bright_white()
    ));

    if stats.files_failed > 0 {
        out.push_str(&format!(
            "  {} {}\n",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        ));
        for failure in stats.failures.iter().take(MAX_LISTED_FAILURES) {
            out.push_str(&format!("    {} {}\n", failure.file, failure.error.red()));
        }
        if stats.failures.len() > MAX_LISTED_FAILURES {
            out.push_str(&format!(
                "    ... and {} more\n",
                stats.failures.len() - MAX_LISTED_FAILURES
            ));
        }
    }

    if stats.files_skipped() > 0 {
        out.push_str(&format!(
            "  {} {}\n",
            "Files skipped:".bright_yellow(),
            stats.files_skipped().to_string().bright_yellow()
        ));
    }
    if stats.worker_failures > 0 {
        out.push_str(&format!(
            "  {} {}\n",
            "Worker failures:".bright_red(),
            stats.worker_failures.to_string().bright_red()
        ));
    }

    out.push_str(&format!(
        "  {} {} ({:.1} files/sec, {:.1}% success)\n\n",
        "Time elapsed:".bright_cyan(),
        HumanDuration(stats.processing_time),
        stats.files_per_second(),
        stats.success_rate()
    ));

    out
}

/// JSON report for machine consumption
pub fn generate_json_report(config: &Config, stats: &IngestStats) -> Result<String> {
    let report = serde_json::json!({
        "collection": config.storage.collection,
        "output_path": config.storage.output_path,
        "dry_run": config.processing.dry_run,
        "stats": stats,
        "files_skipped": stats.files_skipped(),
        "success_rate": stats.success_rate(),
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
    });

    serde_json::to_string_pretty(&report)
        .map_err(|e| Error::serialization("Failed to render JSON report", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::MessageKind;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn sample_stats() -> IngestStats {
        let mut stats = IngestStats::new(4);
        stats.record_indexed(MessageKind::ResultsReport, true);
        stats.record_indexed(MessageKind::AdmitNotification, false);
        stats.record_failure(
            Path::new("inbox/bad.hl7"),
            &Error::storage("document rejected"),
        );
        stats.processing_time = Duration::from_secs(2);
        stats
    }

    #[test]
    fn test_generate_human_report() {
        colored::control::set_override(false);
        let config = Config::new(PathBuf::from("inbox"), PathBuf::from("store"));

        let report = generate_human_report(&config, &sample_stats());

        assert!(report.contains("Indexing Complete"));
        assert!(report.contains("Documents indexed: 2"));
        assert!(report.contains("ORU^R01: 1"));
        assert!(report.contains("Files failed: 1"));
        assert!(report.contains("inbox/bad.hl7 Storage error: document rejected"));
        assert!(report.contains("Files skipped: 1"));
    }

    #[test]
    fn test_human_report_marks_interruption_and_dry_run() {
        colored::control::set_override(false);
        let config = Config::default().with_dry_run(true);
        let mut stats = sample_stats();
        stats.interrupted = true;

        let report = generate_human_report(&config, &stats);

        assert!(report.contains("Indexing Interrupted"));
        assert!(report.contains("dry run"));
    }

    #[test]
    fn test_generate_json_report() {
        let config = Config::default().with_collection("hl7");

        let json = generate_json_report(&config, &sample_stats()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["collection"], "hl7");
        assert_eq!(value["stats"]["files_indexed"], 2);
        assert_eq!(value["stats"]["documents_by_kind"]["ADT^A01"], 1);
        assert_eq!(value["stats"]["failures"][0]["file"], "inbox/bad.hl7");
        assert_eq!(value["files_skipped"], 1);
        assert_eq!(value["processing_time_seconds"], 2.0);
    }
}
