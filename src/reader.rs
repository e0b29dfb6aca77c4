// WHY: Whole-document reads; line endings must reach the line classifier untouched,
// so the file is read as one string instead of through a line iterator

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Statistics for one document read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    /// Lines terminated by `\r\n`
    pub crlf_lines: u64,
    pub duration_ms: u64,
}

/// Read a UTF-8 document, keeping every byte including `\r\n` endings
pub async fn read_document<P: AsRef<Path>>(file_path: P) -> Result<(String, ReadStats)> {
    let path = file_path.as_ref();
    let start_time = Instant::now();

    debug!("Starting read of document: {}", path.display());

    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let lines_read = crate::dialogue::split_lines(&text).count() as u64;
    let crlf_lines = text.matches("\r\n").count() as u64;
    let stats = ReadStats {
        file_path: path.display().to_string(),
        lines_read,
        bytes_read: text.len() as u64,
        crlf_lines,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        "Read {}: {} lines ({} CRLF), {} bytes in {}ms",
        path.display(),
        stats.lines_read,
        stats.crlf_lines,
        stats.bytes_read,
        stats.duration_ms
    );

    Ok((text, stats))
}
