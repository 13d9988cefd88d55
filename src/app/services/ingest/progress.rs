//! Progress reporting for indexing runs

use super::stats::IngestStats;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}";

/// Create a styled progress bar
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Optional progress bar driven by the indexer
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Reporter that draws nothing
    pub fn disabled() -> Self {
        Self { progress_bar: None }
    }

    /// Reporter over `total` files, drawn only when `enabled`
    pub fn new(enabled: bool, total: usize, message: &str) -> Self {
        if !enabled || total == 0 {
            return Self::disabled();
        }
        debug!("Progress bar initialized for {} files", total);
        Self {
            progress_bar: Some(create_progress_bar(total as u64, message)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.progress_bar.is_some()
    }

    /// Advance by one file and refresh the running counts
    pub fn file_done(&self, stats: &IngestStats) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(format!(
                "{} indexed, {} failed",
                stats.files_indexed, stats.files_failed
            ));
        }
    }

    pub fn finish(&self, stats: &IngestStats) {
        if let Some(pb) = &self.progress_bar {
            let message = if stats.interrupted {
                format!("Interrupted after {} files", stats.files_processed())
            } else {
                format!(
                    "Completed: {} indexed, {} failed",
                    stats.files_indexed, stats.files_failed
                )
            };
            pb.finish_with_message(message);
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = &self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
