use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Extension of documents picked up by directory discovery
pub const TEXT_EXTENSION: &str = "txt";

/// Configuration for file discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Result of file discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Discovers `*.txt` files directly inside `text_dir` (no recursion).
/// Backups end in `.bak` and are never matched.
pub fn discover_files(
    text_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let text_dir = text_dir.as_ref().to_path_buf();

    futures::stream::unfold(DiscoveryState::new(text_dir, config), |mut state| async move {
        state.next_file().await.map(|result| (result, state))
    })
}

/// Internal state for file discovery iteration
struct DiscoveryState {
    text_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(text_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            text_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        if self.glob_iter.is_none() {
            // Directory names may contain glob metacharacters
            let escaped_dir = glob::Pattern::escape(&self.text_dir.to_string_lossy());
            let pattern = format!("{escaped_dir}/*.{TEXT_EXTENSION}");
            debug!("Starting file discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => self.glob_iter = Some(paths),
                Err(e) => return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {e}"))),
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next()? {
                Ok(path) => {
                    debug!("Found file: {}", path.display());
                    return Some(self.validate_file(path).await);
                }
                Err(e) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
            }
        }
    }

    async fn validate_file(&self, path: PathBuf) -> Result<FileValidation> {
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
            Ok(_) => {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                Ok(FileValidation { path, error: Some(error) })
            }
            Err(e) => {
                let error = format!("Cannot access file {}: {}", path.display(), e);
                warn!("{}", error);
                if self.config.fail_fast {
                    Err(anyhow::anyhow!(error))
                } else {
                    Ok(FileValidation { path, error: Some(error) })
                }
            }
        }
    }
}

/// Collect all discovered files into a Vec, sorted by path
pub async fn collect_discovered_files(
    text_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(text_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let valid_count = files.iter().filter(|f| f.is_valid()).count();
    let invalid_count = files.len() - valid_count;
    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }
    info!("File discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Paths of all valid text files in `text_dir`
pub async fn find_text_files<P: AsRef<Path>>(text_dir: P) -> Result<Vec<PathBuf>> {
    let validations = collect_discovered_files(text_dir, DiscoveryConfig::default()).await?;
    Ok(validations.into_iter().filter(|v| v.is_valid()).map(|v| v.path).collect())
}
