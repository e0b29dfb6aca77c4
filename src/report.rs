// WHY: Per-file and per-run outcomes in one serde model so the human and JSON
// renderings can never disagree, plus the mapping from outcomes to exit codes

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::classifier::DetectedType;
use crate::dialogue::PunctuationCounts;
use crate::validation::ValidationReport;

/// Process exit codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitCode {
    #[default]
    Success,
    GeneralError,
    InvalidArguments,
    FileNotFound,
    /// Document refused, e.g. pure poetry without --force
    InvalidFormat,
    ValidationFailed,
    PermissionDenied,
    /// Nothing was selected to work on
    UserCancelled,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::GeneralError => 1,
            ExitCode::InvalidArguments => 2,
            ExitCode::FileNotFound => 3,
            ExitCode::InvalidFormat => 4,
            ExitCode::ValidationFailed => 5,
            ExitCode::PermissionDenied => 6,
            ExitCode::UserCancelled => 7,
        }
    }

    /// Classify an error by the first I/O error in its chain
    pub fn from_error(error: &anyhow::Error) -> Self {
        let io_kind = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<std::io::Error>())
            .map(std::io::Error::kind);

        match io_kind {
            Some(ErrorKind::NotFound) => ExitCode::FileNotFound,
            Some(ErrorKind::PermissionDenied) => ExitCode::PermissionDenied,
            Some(ErrorKind::InvalidData) => ExitCode::InvalidFormat,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Seconds since the Unix epoch; 0 if the clock is before it
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// At least one line was rewritten
    Processed,
    Unchanged,
    /// Refused before any write
    Skipped,
    Failed,
}

/// Outcome of one file in a processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub filepath: String,
    pub status: FileStatus,
    pub file_type: Option<DetectedType>,
    pub confidence: Option<f64>,
    pub lines_total: usize,
    pub lines_modified: usize,
    pub lines_unchanged: usize,
    pub punctuation: PunctuationCounts,
    pub backup_path: Option<String>,
    pub output_path: Option<String>,
    pub permissions_restored: bool,
    pub error: Option<String>,
    pub skip_reason: Option<String>,
    #[serde(skip)]
    pub outcome: ExitCode,
}

impl FileReport {
    pub fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            filepath: path.display().to_string(),
            status,
            file_type: None,
            confidence: None,
            lines_total: 0,
            lines_modified: 0,
            lines_unchanged: 0,
            punctuation: PunctuationCounts::default(),
            backup_path: None,
            output_path: None,
            permissions_restored: false,
            error: None,
            skip_reason: None,
            outcome: ExitCode::Success,
        }
    }

    pub fn failed(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            error: Some(format!("{error:#}")),
            outcome: ExitCode::from_error(error),
            ..Self::new(path, FileStatus::Failed)
        }
    }

    fn render(&self, out: &mut String) {
        match self.status {
            FileStatus::Processed | FileStatus::Unchanged => {
                let verb = if self.status == FileStatus::Processed { "Processed" } else { "Unchanged" };
                out.push_str(&format!("{verb}: {}\n", self.filepath));
                if let (Some(file_type), Some(confidence)) = (self.file_type, self.confidence) {
                    out.push_str(&format!("  File type: {file_type} ({:.0}% confidence)\n", confidence * 100.0));
                }
                out.push_str(&format!("  Total lines: {}\n", self.lines_total));
                out.push_str(&format!("  Lines modified: {}\n", self.lines_modified));
                out.push_str(&format!("  Lines unchanged: {}\n", self.lines_unchanged));
                let p = &self.punctuation;
                out.push_str(&format!(
                    "  Punctuation removed: {} commas, {} semicolons, {} colons, {} quotes, {} dashes\n",
                    p.commas, p.semicolons, p.colons, p.quotes, p.dashes
                ));
                if let Some(backup) = &self.backup_path {
                    out.push_str(&format!("  Backup: {backup}\n"));
                }
                if let Some(output) = &self.output_path {
                    out.push_str(&format!("  Output: {output}\n"));
                }
                if self.permissions_restored {
                    out.push_str("  Permissions: Restored to read-only\n");
                }
            }
            FileStatus::Skipped => {
                out.push_str(&format!("Skipped: {}\n", self.filepath));
                if let Some(reason) = &self.skip_reason {
                    out.push_str(&format!("  {reason}\n"));
                }
            }
            FileStatus::Failed => {
                out.push_str(&format!("Failed: {}\n", self.filepath));
                if let Some(error) = &self.error {
                    out.push_str(&format!("  Error: {error}\n"));
                }
            }
        }
    }
}

/// Summary of a processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: String,
    pub mode: String,
    pub exit_code: i32,
    pub timestamp: u64,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub punctuation_removed: PunctuationCounts,
    pub results: Vec<FileReport>,
    #[serde(skip)]
    pub outcome: ExitCode,
}

impl RunReport {
    /// The run exit code is the first non-success file outcome, in run order
    pub fn new(dry_run: bool, results: Vec<FileReport>) -> Self {
        let exit = results
            .iter()
            .map(|r| r.outcome)
            .find(|code| *code != ExitCode::Success)
            .unwrap_or(ExitCode::Success);

        let count = |status: FileStatus| results.iter().filter(|r| r.status == status).count();
        let files_processed = count(FileStatus::Processed) + count(FileStatus::Unchanged);
        let files_skipped = count(FileStatus::Skipped);
        let files_failed = count(FileStatus::Failed);

        let mut punctuation_removed = PunctuationCounts::default();
        for result in &results {
            punctuation_removed += result.punctuation;
        }

        Self {
            status: status_label(exit).to_string(),
            mode: if dry_run { "dry_run" } else { "process" }.to_string(),
            exit_code: exit.code(),
            timestamp: unix_timestamp(),
            files_processed,
            files_skipped,
            files_failed,
            punctuation_removed,
            results,
            outcome: exit,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.mode == "dry_run" {
            out.push_str("Dry run: no files were written\n\n");
        }
        for result in &self.results {
            result.render(&mut out);
            out.push('\n');
        }
        out.push_str("Summary:\n");
        out.push_str(&format!("  Successfully processed: {}\n", self.files_processed));
        out.push_str(&format!("  Skipped: {}\n", self.files_skipped));
        out.push_str(&format!("  Failed: {}\n", self.files_failed));
        out.push_str(&format!("  Punctuation removed: {}\n", self.punctuation_removed.total()));
        out
    }
}

/// A file that could not be validated at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub filepath: String,
    pub error: String,
    #[serde(skip)]
    pub outcome: ExitCode,
}

impl FileError {
    pub fn new(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            filepath: path.display().to_string(),
            error: format!("{error:#}"),
            outcome: ExitCode::from_error(error),
        }
    }
}

/// Summary of a `--validate` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRunReport {
    pub status: String,
    pub mode: String,
    pub exit_code: i32,
    pub timestamp: u64,
    pub files_validated: usize,
    pub files_processable: usize,
    pub results: Vec<ValidationReport>,
    pub errors: Vec<FileError>,
    #[serde(skip)]
    pub outcome: ExitCode,
}

impl ValidationRunReport {
    /// Read errors take precedence; otherwise any unprocessable file fails the run
    pub fn new(results: Vec<ValidationReport>, errors: Vec<FileError>) -> Self {
        let exit = match errors.first() {
            Some(error) => error.outcome,
            None if results.iter().any(|r| !r.is_processable) => ExitCode::ValidationFailed,
            None => ExitCode::Success,
        };

        Self {
            status: status_label(exit).to_string(),
            mode: "validation".to_string(),
            exit_code: exit.code(),
            timestamp: unix_timestamp(),
            files_validated: results.len(),
            files_processable: results.iter().filter(|r| r.is_processable).count(),
            results,
            errors,
            outcome: exit,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            out.push_str(&result.render());
            out.push('\n');
        }
        for error in &self.errors {
            out.push_str(&format!("Failed: {}\n  Error: {}\n\n", error.filepath, error.error));
        }
        out.push_str(&format!(
            "Validated {} file(s): {} processable, {} not processable\n",
            self.files_validated,
            self.files_processable,
            self.files_validated - self.files_processable
        ));
        out
    }
}

fn status_label(exit: ExitCode) -> &'static str {
    if exit == ExitCode::Success {
        "success"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        let codes: Vec<i32> = [
            ExitCode::Success,
            ExitCode::GeneralError,
            ExitCode::InvalidArguments,
            ExitCode::FileNotFound,
            ExitCode::InvalidFormat,
            ExitCode::ValidationFailed,
            ExitCode::PermissionDenied,
            ExitCode::UserCancelled,
        ]
        .into_iter()
        .map(ExitCode::code)
        .collect();
        assert_eq!(codes, (0..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_exit_code_from_wrapped_io_error() {
        let not_found: anyhow::Error = Err::<(), _>(std::io::Error::from(ErrorKind::NotFound))
            .context("Failed to read hamlet.txt")
            .unwrap_err();
        assert_eq!(ExitCode::from_error(&not_found), ExitCode::FileNotFound);

        let denied = anyhow::Error::new(std::io::Error::from(ErrorKind::PermissionDenied));
        assert_eq!(ExitCode::from_error(&denied), ExitCode::PermissionDenied);

        let other = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::from_error(&other), ExitCode::GeneralError);
    }

    #[test]
    fn test_run_report_counts_and_exit_code() {
        let mut processed = FileReport::new(Path::new("hamlet.txt"), FileStatus::Processed);
        processed.punctuation.commas = 4;
        let unchanged = FileReport::new(Path::new("lear.txt"), FileStatus::Unchanged);
        let skipped = FileReport {
            outcome: ExitCode::InvalidFormat,
            ..FileReport::new(Path::new("sonnets.txt"), FileStatus::Skipped)
        };
        let failed = FileReport::failed(
            Path::new("missing.txt"),
            &anyhow::Error::new(std::io::Error::from(ErrorKind::NotFound)),
        );

        let report = RunReport::new(false, vec![processed, unchanged, skipped, failed]);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.exit_code, 4);
        assert_eq!(report.status, "error");
        assert_eq!(report.punctuation_removed.commas, 4);
    }

    #[test]
    fn test_run_report_json_fields() {
        let report = RunReport::new(true, vec![FileReport::new(Path::new("a.txt"), FileStatus::Unchanged)]);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        for field in ["status", "mode", "exit_code", "timestamp", "files_processed", "files_skipped", "files_failed", "results"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["mode"], "dry_run");
        assert_eq!(json["exit_code"], 0);
        assert_eq!(json["results"][0]["status"], "unchanged");
        assert!(json["results"][0].get("outcome").is_none());
    }

    #[test]
    fn test_empty_validation_run_succeeds() {
        let report = ValidationRunReport::new(Vec::new(), Vec::new());
        assert_eq!(report.exit_code, 0);
        assert!(report.render().contains("Validated 0 file(s)"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "validation");
    }
}
