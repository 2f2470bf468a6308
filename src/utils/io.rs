//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_access(display(path), operation, e))
}

/// Read raw file bytes. Project files are not guaranteed to be UTF-8.
pub fn read_bytes(path: &Path, operation: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::file_access(display(path), operation, e))
}

/// Write content to file with standardized error handling.
pub fn write_bytes(path: &Path, content: &[u8], operation: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::file_access(display(path), operation, e))
}

/// Open a file for buffered line reading.
pub fn open_reader(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::file_access(display(path), "open", e))
}

/// Create (or truncate) a file for buffered writing.
pub fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| Error::file_access(display(path), "create", e))
}

/// Sibling temp path used while rewriting `path` (`Foo.dproj` -> `Foo.dproj.tmp`).
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let filename = path.file_name().ok_or_else(|| {
        Error::file_access(display(path), "resolve temp file for", "path has no file name")
    })?;

    Ok(path.with_file_name(format!("{}.tmp", filename.to_string_lossy())))
}

/// Replace `original` with `tmp`: remove the original, then rename.
///
/// This is the commit point for in-place rewrites. Removing first keeps the
/// behavior identical on platforms where rename refuses to overwrite.
pub fn replace_with_temp(original: &Path, tmp: &Path) -> Result<()> {
    fs::remove_file(original).map_err(|e| Error::file_access(display(original), "remove", e))?;
    fs::rename(tmp, original).map_err(|e| Error::file_access(display(tmp), "rename", e))
}

/// Write content to file atomically (write to .tmp, then replace).
pub fn write_file_atomic(path: &Path, content: &[u8], operation: &str) -> Result<()> {
    let tmp_path = temp_path_for(path)?;
    write_bytes(&tmp_path, content, operation)?;

    if path.exists() {
        replace_with_temp(path, &tmp_path)
    } else {
        fs::rename(&tmp_path, path).map_err(|e| Error::file_access(display(&tmp_path), "rename", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "file.access_failed");
    }

    #[test]
    fn temp_path_appends_suffix() {
        let tmp = temp_path_for(Path::new("/projects/App.dproj")).unwrap();
        assert_eq!(tmp, PathBuf::from("/projects/App.dproj.tmp"));
    }

    #[test]
    fn replace_with_temp_swaps_content() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("App.dproj");
        let tmp = dir.path().join("App.dproj.tmp");
        fs::write(&original, "old").unwrap();
        fs::write(&tmp, "new").unwrap();

        replace_with_temp(&original, &tmp).unwrap();

        assert_eq!(fs::read_to_string(&original).unwrap(), "new");
        assert!(!tmp.exists());
    }

    #[test]
    fn write_file_atomic_creates_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");

        write_file_atomic(&path, b"first", "test write").unwrap();
        write_file_atomic(&path, b"second", "test write").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("out.xml.tmp").exists());
    }

    #[test]
    fn open_reader_reports_missing_file() {
        let err = open_reader(Path::new("/nonexistent/App.dproj")).unwrap_err();
        assert_eq!(err.details["operation"], "open");
    }
}
