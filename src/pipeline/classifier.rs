use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::llm::{parse_classified_response, CompletionProvider, CompletionRequest};
use crate::models::{extract_comments, ClassifiedDocument, CommentRecord};
use crate::storage::{list_json_files, processed_output_path, read_json_value, write_document};
use crate::text::normalize;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Persisted(PathBuf),
    /// Classification produced nothing, so no output was written.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct ClassifierPipeline {
    llm: Arc<dyn CompletionProvider>,
    prompt: String,
    config: ClassifierConfig,
}

impl ClassifierPipeline {
    pub fn new(llm: impl CompletionProvider + 'static, prompt: String, config: ClassifierConfig) -> Self {
        Self {
            llm: Arc::new(llm),
            prompt,
            config,
        }
    }

    /// Classifies every `*.json` file in the input directory, one at a time.
    pub async fn run(&self) -> Result<ClassifySummary> {
        let files = list_json_files(&self.config.input_dir)?;
        std::fs::create_dir_all(&self.config.output_dir)?;
        tracing::info!(
            "Found {} input files in {}",
            files.len(),
            self.config.input_dir.display()
        );

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        let mut summary = ClassifySummary::default();

        for (index, path) in files.iter().enumerate() {
            let name = display_name(path);
            tracing::info!("Processing {}...", name);

            match self.process_file(path).await {
                Ok(FileOutcome::Persisted(output)) => {
                    summary.processed += 1;
                    tracing::info!("Successfully processed {} -> {}", name, output.display());

                    let more_to_come = index + 1 < files.len();
                    if more_to_come && !self.config.file_delay.is_zero() {
                        sleep(self.config.file_delay).await;
                    }
                }
                Ok(FileOutcome::Skipped) => {
                    summary.skipped += 1;
                    tracing::info!("Skipping {} - no relevant content found", name);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Error processing file {}: {}", name, e);
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Classification complete");
        Ok(summary)
    }

    pub async fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let document = read_json_value(path)?;
        let comments = extract_comments(&document);
        tracing::debug!("Extracted {} comments from {}", comments.len(), path.display());

        let classified = self.classify(&comments).await;
        if classified.is_empty() {
            return Ok(FileOutcome::Skipped);
        }

        let output = processed_output_path(&self.config.output_dir, path);
        write_document(&output, &classified)?;
        Ok(FileOutcome::Persisted(output))
    }

    /// Runs the completion with retries and always returns a well-formed document.
    ///
    /// Transport failures and invalid responses draw on one attempt counter but
    /// wait according to their own policies. Once either policy refuses another
    /// attempt the empty sentinel document is returned.
    pub async fn classify(&self, comments: &[CommentRecord]) -> ClassifiedDocument {
        let request = CompletionRequest::new(self.prompt.as_str(), comments);
        let transport = self.config.transport_retry;
        let validation = self.config.validation_retry;
        let budget = transport.max_attempts.max(validation.max_attempts);

        for attempt in 1..=budget {
            let wait = match self.llm.complete(&request).await {
                Ok(output) => match parse_classified_response(&output) {
                    Ok(mut document) => {
                        document.for_each_item_mut(|item| item.content = normalize(&item.content));
                        document.sort_by_votes();
                        return document;
                    }
                    Err(e) => {
                        tracing::warn!("Invalid JSON structure (attempt {}): {}", attempt, e);
                        validation.next_delay(attempt)
                    }
                },
                Err(e) => {
                    tracing::warn!("{} API error (attempt {}): {}", self.llm.name(), attempt, e);
                    if e.is_retryable() {
                        transport.next_delay(attempt)
                    } else {
                        None
                    }
                }
            };

            match wait {
                Some(delay) if !delay.is_zero() => sleep(delay).await,
                Some(_) => {}
                None => break,
            }
        }

        tracing::warn!("Giving up on classification, returning empty document");
        ClassifiedDocument::empty()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
