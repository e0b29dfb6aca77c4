// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary text directory populated with sample documents
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write a text file relative to the fixture root
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }

    /// Backup path matching the library's naming
    pub fn backup_path<P: AsRef<Path>>(&self, source_path: P) -> PathBuf {
        bardclean::generate_backup_path(source_path.as_ref())
    }

    pub fn backup_exists<P: AsRef<Path>>(&self, source_path: P) -> bool {
        self.backup_path(source_path).exists()
    }

    #[cfg(unix)]
    pub fn set_mode<P: AsRef<Path>>(&self, path: P, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("Failed to set permissions");
    }

    #[cfg(unix)]
    pub fn mode<P: AsRef<Path>>(&self, path: P) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).expect("Failed to stat file").permissions().mode() & 0o777
    }
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.split_inclusive('\n').collect();
    let expected_lines: Vec<&str> = expected.split_inclusive('\n').collect();

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {:?}\nActual:   {:?}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected_lines.len(),
            actual_lines.len()
        );
    }
}
