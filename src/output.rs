// WHY: Everything that touches the filesystem on the write side: backup naming,
// output-directory remapping and permission-preserving rewrites of read-only files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Suffix appended to the full file name of a backup (`hamlet.txt` -> `hamlet.txt.bak`)
pub const BACKUP_SUFFIX: &str = "bak";

/// Backup path kept next to the source file
pub fn generate_backup_path(source_path: &Path) -> PathBuf {
    let mut backup_path = source_path.as_os_str().to_os_string();
    backup_path.push(".");
    backup_path.push(BACKUP_SUFFIX);
    PathBuf::from(backup_path)
}

/// Destination of the rewritten text: in place, or the same file name under `output_dir`
pub fn generate_output_path(source_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, source_path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => source_path.to_path_buf(),
    }
}

/// Copy the source to its backup path. The copy carries the source's permission bits,
/// so the backup of a read-only file is read-only as well.
pub async fn create_backup(source_path: &Path) -> Result<PathBuf> {
    let backup_path = generate_backup_path(source_path);

    // A read-only backup left by an earlier run cannot be opened for writing
    if fs::try_exists(&backup_path).await.unwrap_or(false) {
        fs::remove_file(&backup_path)
            .await
            .with_context(|| format!("Failed to replace old backup {}", backup_path.display()))?;
    }

    fs::copy(source_path, &backup_path)
        .await
        .with_context(|| format!("Failed to create backup {}", backup_path.display()))?;
    info!("Backup created: {}", backup_path.display());
    Ok(backup_path)
}

/// Write `content` to `path`. An existing read-only file is made writable for the
/// write and gets its original permissions back afterwards, also when the write fails.
pub async fn write_document(path: &Path, content: &str) -> Result<WriteOutcome> {
    let readonly_permissions = match fs::metadata(path).await {
        Ok(metadata) => Some(metadata.permissions()).filter(|p| p.readonly()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    };

    if let Some(permissions) = &readonly_permissions {
        debug!("Temporarily making {} writable", path.display());
        fs::set_permissions(path, writable(permissions))
            .await
            .with_context(|| format!("Cannot make {} writable", path.display()))?;
    }

    let write_result = write_all(path, content).await;

    let was_readonly = readonly_permissions.is_some();
    if let Some(permissions) = readonly_permissions {
        if let Err(e) = fs::set_permissions(path, permissions).await {
            warn!("Could not restore permissions of {}: {}", path.display(), e);
        }
    }

    write_result.with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(WriteOutcome {
        path: path.to_path_buf(),
        bytes_written: content.len() as u64,
        permissions_restored: was_readonly,
    })
}

/// What a successful write did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub bytes_written: u64,
    /// The file was read-only and has been made read-only again
    pub permissions_restored: bool,
}

async fn write_all(path: &Path, content: &str) -> std::io::Result<()> {
    let file = fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(unix)]
fn writable(permissions: &std::fs::Permissions) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    // Owner write bit only; group and other bits stay as they were
    std::fs::Permissions::from_mode(permissions.mode() | 0o200)
}

#[cfg(not(unix))]
fn writable(permissions: &std::fs::Permissions) -> std::fs::Permissions {
    let mut permissions = permissions.clone();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    permissions
}
