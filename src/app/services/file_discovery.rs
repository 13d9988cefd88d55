//! Message file discovery
//!
//! Enumerates input files under a directory whose names match any of a set
//! of glob patterns. Matching is case-insensitive and applies to the file
//! name only, so `*.hl7` also picks up `ADMIT.HL7`.

use crate::constants::DEFAULT_FILE_PATTERNS;
use crate::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Finds message files under an input directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    input_path: PathBuf,
    patterns: Vec<Pattern>,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a discovery over `input_path` using the default patterns
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let patterns = DEFAULT_FILE_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();

        Self {
            input_path: input_path.into(),
            patterns,
            recursive: false,
        }
    }

    /// Replace the file-name patterns
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    Error::configuration(format!("Invalid file pattern '{}': {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// Descend into subdirectories
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Whether a file name matches any configured pattern
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                self.patterns
                    .iter()
                    .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
            })
    }

    /// Enumerate matching files in sorted order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input directory does not exist: {}",
                self.input_path.display()
            )));
        }

        debug!(
            "Searching for message files in {} (recursive: {})",
            self.input_path.display(),
            self.recursive
        );

        let walker = WalkDir::new(&self.input_path)
            .follow_links(false)
            .min_depth(1);
        let walker = if self.recursive {
            walker
        } else {
            walker.max_depth(1)
        };

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable subdirectories are skipped; the root itself must be readable
                Err(e) if e.depth() > 0 => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(Error::directory_traversal(
                        format!("Failed to read {}", self.input_path.display()),
                        e,
                    ));
                }
            };

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} message files", files.len());
        Ok(files)
    }
}

/// Discover message files with the default patterns
pub fn discover_message_files(input_path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    FileDiscovery::new(input_path)
        .with_recursive(recursive)
        .discover()
}
