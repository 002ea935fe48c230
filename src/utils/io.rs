//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Suffix of the scratch file written next to the file being rewritten.
pub const TEMP_SUFFIX: &str = "-new";

/// Open a file for reading with standardized error handling.
pub fn open_file(path: &Path, operation: &str) -> Result<File> {
    File::open(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Create (or truncate) a file for writing with standardized error handling.
pub fn create_file(path: &Path, operation: &str) -> Result<File> {
    File::create(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Path of the sibling scratch file for `path` (`<path>-new`).
pub fn temp_sibling_path(path: &Path) -> Result<PathBuf> {
    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("resolve temp path".to_string()),
        )
    })?;

    let mut tmp_name = filename.to_os_string();
    tmp_name.push(TEMP_SUFFIX);
    Ok(path.with_file_name(tmp_name))
}

/// Move a fully written scratch file over `path`.
///
/// The rename is atomic on POSIX filesystems, so readers see either the
/// old content or the new content, never a partial write.
pub fn replace_atomic(tmp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp_path, path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("rename {} -> {}", tmp_path.display(), path.display())),
        )
    })
}

/// Absolute form of `path` without resolving symlinks or requiring it to exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("resolve {}", path.display())),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn open_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        assert!(open_file(temp.path(), "test open").is_ok());
    }

    #[test]
    fn open_file_returns_error_for_missing_file() {
        let result = open_file(Path::new("/nonexistent/Jenkinsfile"), "test open");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "test open");
    }

    #[test]
    fn create_file_returns_error_for_invalid_path() {
        let result = create_file(Path::new("/nonexistent/dir/file.txt"), "test create");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn temp_sibling_path_appends_suffix() {
        let tmp = temp_sibling_path(Path::new("ci/Jenkinsfile")).unwrap();
        assert_eq!(tmp, PathBuf::from("ci/Jenkinsfile-new"));
    }

    #[test]
    fn temp_sibling_path_rejects_root() {
        assert!(temp_sibling_path(Path::new("/")).is_err());
    }

    #[test]
    fn replace_atomic_moves_content_over_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Jenkinsfile");
        let tmp = dir.path().join("Jenkinsfile-new");
        fs::write(&target, "old\n").unwrap();
        fs::write(&tmp, "new\n").unwrap();

        replace_atomic(&tmp, &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new\n");
        assert!(!tmp.exists());
    }

    #[test]
    fn absolute_path_keeps_absolute_input() {
        let abs = absolute_path(Path::new("/srv/Jenkinsfile")).unwrap();
        assert_eq!(abs, PathBuf::from("/srv/Jenkinsfile"));
    }
}
