//! Disk I/O for the downloaded file.
//!
//! `write` ensures the parent directory exists, then creates or truncates the
//! destination and writes the whole buffer. `remove` is best-effort.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Mode for directories created on the way to the destination.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// First failure hit while persisting a file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to create file {}: {source}", .path.display())]
    CreateFile { path: PathBuf, source: io::Error },
    #[error("failed to write file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Write `data` to `path`, creating missing parent directories with `dir_mode`.
///
/// No partial-write recovery: a failure mid-write leaves the file in an
/// indeterminate state and is returned as `StorageError::Write`.
pub fn write(path: &Path, data: &[u8], dir_mode: u32) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent, dir_mode).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| StorageError::CreateFile {
            path: path.to_path_buf(),
            source,
        })?;

    file.write_all(data)
        .and_then(|()| file.flush())
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Remove the file at `path`. Errors (including "not found") are logged and dropped.
pub fn remove(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::debug!(path = %path.display(), error = %e, "remove failed, ignoring");
    }
}

#[cfg(unix)]
fn create_dir_all(dir: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(dir)
}

#[cfg(not(unix))]
fn create_dir_all(dir: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.bin");
        write(&path, b"abc", DEFAULT_DIR_MODE).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"abc");
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn write_uses_dir_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("f");
        write(&path, b"x", 0o700).unwrap();
        let mode = fs::metadata(dir.path().join("sub")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, b"a much longer previous body").unwrap();
        write(&path, b"new", DEFAULT_DIR_MODE).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        write(&path, b"", DEFAULT_DIR_MODE).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn write_parent_is_a_file_fails_with_create_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let err = write(&blocker.join("out.bin"), b"abc", DEFAULT_DIR_MODE).unwrap_err();
        assert!(matches!(err, StorageError::CreateDir { .. }), "got {err}");
    }

    #[test]
    fn write_to_directory_path_fails_with_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path(), b"abc", DEFAULT_DIR_MODE).unwrap_err();
        assert!(matches!(err, StorageError::CreateFile { .. }), "got {err}");
    }

    #[test]
    fn remove_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone");
        remove(&path);
        fs::write(&path, b"x").unwrap();
        remove(&path);
        assert!(!path.exists());
    }
}
