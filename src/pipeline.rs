// WHY: Per-file orchestration: read, classify, block poetry, back up, write.
// Every failure is folded into the file's report so one bad file never aborts a run
// unless fail-fast was requested.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::output::{create_backup, generate_output_path, write_document};
use crate::processor::{DocumentProcessor, ProcessorConfig};
use crate::reader::read_document;
use crate::report::{ExitCode, FileError, FileReport, FileStatus, RunReport, ValidationRunReport};
use crate::validation::{validate, ValidationReport};

pub struct Pipeline {
    processor: DocumentProcessor,
    /// Write rewritten files here instead of in place
    output_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(config: ProcessorConfig, output_dir: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            processor: DocumentProcessor::new(config)?,
            output_dir,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        self.processor.config()
    }

    /// Read and classify one file without writing anything
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationReport> {
        let (text, _stats) = read_document(path).await?;
        Ok(self.processor.validate_text(path, &text))
    }

    /// Process one file; never fails, errors end up in the report
    pub async fn process_file(&self, path: &Path) -> FileReport {
        match self.try_process_file(path).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                FileReport::failed(path, &e)
            }
        }
    }

    async fn try_process_file(&self, path: &Path) -> Result<FileReport> {
        let config = self.processor.config();
        let (text, _stats) = read_document(path).await?;

        let analysis = self.processor.analyze(&text);
        let verdict = validate(path, &analysis.features, &analysis.classification, config);

        let mut report = FileReport::new(path, FileStatus::Unchanged);
        report.file_type = Some(analysis.classification.detected_type);
        report.confidence = Some(analysis.classification.confidence);

        if !verdict.is_processable && config.block_poetry {
            info!("Blocked {}: {}", path.display(), analysis.classification.detected_type);
            report.status = FileStatus::Skipped;
            report.outcome = ExitCode::InvalidFormat;
            report.skip_reason = Some(format!(
                "Blocked: detected pure poetry ({}, {:.0}% confidence). Use --force to process anyway",
                analysis.classification.detected_type,
                analysis.classification.confidence * 100.0
            ));
            return Ok(report);
        }

        let (output, summary) = self.processor.rewrite(&text);
        report.lines_total = summary.lines_total;
        report.lines_modified = summary.lines_modified;
        report.lines_unchanged = summary.lines_unchanged();
        report.punctuation = summary.punctuation;
        if summary.lines_modified > 0 {
            report.status = FileStatus::Processed;
        }

        if config.dry_run {
            return Ok(report);
        }

        let output_path = generate_output_path(path, self.output_dir.as_deref());
        let in_place = self.output_dir.is_none();

        // In place, an untouched file is left alone entirely
        if in_place && summary.lines_modified == 0 {
            return Ok(report);
        }

        if in_place && config.create_backup {
            let backup_path = create_backup(path).await?;
            report.backup_path = Some(backup_path.display().to_string());
        }

        if let Some(dir) = &self.output_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }

        let outcome = write_document(&output_path, &output).await?;
        report.permissions_restored = outcome.permissions_restored;
        report.output_path = Some(outcome.path.display().to_string());
        debug!("Wrote {} ({} bytes)", outcome.path.display(), outcome.bytes_written);

        Ok(report)
    }

    /// Process files in order, calling `on_file` after each. Stops after the first
    /// failure when `fail_fast` is set; skipped poetry does not count as a failure.
    pub async fn process_files<F>(&self, paths: &[PathBuf], fail_fast: bool, mut on_file: F) -> RunReport
    where
        F: FnMut(&FileReport),
    {
        let mut results = Vec::with_capacity(paths.len());

        for path in paths {
            let report = self.process_file(path).await;
            on_file(&report);
            let failed = report.status == FileStatus::Failed;
            results.push(report);

            if failed && fail_fast {
                warn!("Stopping after failure in {} (fail-fast)", path.display());
                break;
            }
        }

        RunReport::new(self.config().dry_run, results)
    }

    /// Validate files in order; unreadable files are listed separately
    pub async fn validate_files<F>(&self, paths: &[PathBuf], fail_fast: bool, mut on_file: F) -> ValidationRunReport
    where
        F: FnMut(&Path),
    {
        let mut results = Vec::with_capacity(paths.len());
        let mut errors = Vec::new();

        for path in paths {
            let result = self.validate_file(path).await;
            on_file(path);
            match result {
                Ok(report) => results.push(report),
                Err(e) => {
                    warn!("Failed to validate {}: {:#}", path.display(), e);
                    errors.push(FileError::new(path, &e));
                    if fail_fast {
                        break;
                    }
                }
            }
        }

        ValidationRunReport::new(results, errors)
    }
}

/// Resolve command-line file names: absolute paths as given, relative ones against
/// `text_dir` when that file exists there, otherwise against the current directory
pub fn resolve_file_arguments(files: &[PathBuf], text_dir: &Path) -> Vec<PathBuf> {
    files
        .iter()
        .map(|file| {
            if file.is_absolute() {
                return file.clone();
            }
            let candidate = text_dir.join(file);
            if candidate.exists() {
                candidate
            } else {
                file.clone()
            }
        })
        .collect()
}
