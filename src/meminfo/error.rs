use std::num::ParseIntError;
use std::path::PathBuf;

use crate::fsutil;

/// Errors that may occur while reading a per-node `meminfo` file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    File(#[from] fsutil::FileError),
    #[error("failed to read line for file `{path}`: {source}")]
    ReadLine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value for `{field}` at line {line} of file `{path}`: `{value}`: {source}")]
    InvalidValue {
        path: PathBuf,
        field: &'static str,
        value: String,
        line: usize,
        #[source]
        source: ParseIntError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
