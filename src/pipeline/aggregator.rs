use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::ClassifiedDocument;
use crate::storage::{list_json_files, read_document, write_document};

pub const DEFAULT_COMBINED_FILE: &str = "combined_comments.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub files_seen: usize,
    pub files_merged: usize,
    pub files_failed: usize,
    pub output: PathBuf,
}

/// Merges every classified document in a directory into one.
pub struct Aggregator {
    dir: PathBuf,
    output: PathBuf,
}

impl Aggregator {
    pub fn new(dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            output: output.into(),
        }
    }

    fn is_output(&self, path: &Path) -> bool {
        match (std::fs::canonicalize(path), std::fs::canonicalize(&self.output)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Concatenates the buckets of every readable input and writes the result,
    /// even when nothing could be read.
    pub fn run(&self) -> Result<CombineSummary> {
        let listed = list_json_files(&self.dir).unwrap_or_else(|e| {
            tracing::error!("Cannot list {}: {}", self.dir.display(), e);
            Vec::new()
        });
        let files: Vec<_> = listed
            .into_iter()
            .filter(|p| !self.is_output(p))
            .collect();

        let mut combined = ClassifiedDocument::empty();
        let mut files_merged = 0;
        let mut files_failed = 0;

        for path in &files {
            match read_document(path) {
                Ok(document) => {
                    tracing::debug!("Merging {} items from {}", document.total_items(), path.display());
                    combined.extend(document);
                    files_merged += 1;
                }
                Err(e) => {
                    tracing::error!("Error processing {}: {}", path.display(), e);
                    files_failed += 1;
                }
            }
        }

        combined.sort_by_votes_then_hearted();
        write_document(&self.output, &combined)?;

        tracing::info!(
            "Successfully combined {} of {} files into {}",
            files_merged,
            files.len(),
            self.output.display()
        );

        Ok(CombineSummary {
            files_seen: files.len(),
            files_merged,
            files_failed,
            output: self.output.clone(),
        })
    }
}
