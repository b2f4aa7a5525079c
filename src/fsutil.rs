//! Small helpers for reading kernel pseudo-files with the failing path attached to every error.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Error that occurs when a pseudo-file cannot be opened or read.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to open file `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Path of the file the failed operation was performed on.
    pub fn path(&self) -> &Path {
        match self {
            FileError::Open { path, .. } | FileError::Read { path, .. } => path,
        }
    }

    /// Underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            FileError::Open { source, .. } | FileError::Read { source, .. } => source,
        }
    }
}

/// Opens a file at the given path and wraps it in a [`BufReader`].
///
/// # Errors
///
/// Returns [`FileError::Open`] if the file cannot be opened.
///
/// # Example
/// ```no_run
/// # use numa_inventory::fsutil;
/// let reader = fsutil::open_file_reader("/proc/zoneinfo")?;
/// # Ok::<(), fsutil::FileError>(())
/// ```
pub fn open_file_reader(path: impl AsRef<Path>) -> Result<BufReader<File>, FileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads the whole file into a string.
///
/// Single-line sysfs attributes such as `cpulist` are read this way; the handle
/// is closed before returning.
///
/// # Errors
///
/// Returns [`FileError::Open`] if the file cannot be opened and
/// [`FileError::Read`] if its content cannot be read as UTF-8 text.
pub fn read_file_to_string(path: impl AsRef<Path>) -> Result<String, FileError> {
    let path = path.as_ref();
    let mut reader = open_file_reader(path)?;
    let mut content = String::new();
    io::Read::read_to_string(&mut reader, &mut content).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_file_reader_success() {
        let tmp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        let reader = open_file_reader(tmp.path()).expect("should open test file");
        let metadata = reader.get_ref().metadata().unwrap();
        assert!(metadata.is_file());
    }

    #[test]
    fn test_open_file_reader_missing_file() {
        let err = open_file_reader("/definitely/does/not/exist").unwrap_err();
        assert!(matches!(err, FileError::Open { .. }));
        assert_eq!(err.path(), Path::new("/definitely/does/not/exist"));
        assert_eq!(err.io_error().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_file_to_string_keeps_content() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "0-3").unwrap();

        let content = read_file_to_string(tmp.path()).unwrap();
        assert_eq!(content, "0-3\n");
    }

    #[test]
    fn test_read_file_to_string_invalid_utf8() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = read_file_to_string(tmp.path()).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
        assert_eq!(err.io_error().kind(), io::ErrorKind::InvalidData);
    }
}
