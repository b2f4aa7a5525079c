//! CPU range parser for sysfs `cpulist` attributes.
//!
//! A node's `cpulist` is expected to hold exactly one contiguous range such as
//! `0-31`. Comma-separated lists and single CPU IDs are rejected.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use crate::fsutil;

/// The two ends of a `<first>-<last>` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    First,
    Last,
}

impl std::fmt::Display for RangeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RangeBound::First => "first",
            RangeBound::Last => "last",
        };
        write!(f, "{name}")
    }
}

/// Errors that may occur when parsing a CPU range.
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    #[error("invalid format: {0:?}")]
    InvalidFormat(String),

    #[error("convert {bound} {value:?}: {source}")]
    Conversion {
        bound: RangeBound,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("reversed range {first}-{last} in {text:?}")]
    Reversed { first: u32, last: u32, text: String },
}

/// Errors that may occur when reading a `cpulist` file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    File(#[from] fsutil::FileError),
    #[error("failed to parse cpu range in file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: RangeError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses a single `<first>-<last>` range into the ascending list of CPU IDs it covers.
///
/// A trailing newline is ignored. `5-5` yields `[5]`.
///
/// # Errors
///
/// - [`RangeError::InvalidFormat`] if the text doesn't split into exactly two parts on `-`.
/// - [`RangeError::Conversion`] if either bound isn't an integer.
/// - [`RangeError::Reversed`] if `first` is greater than `last`.
///
/// # Example
///
/// ```
/// use numa_inventory::cpulist::parse_cpu_range;
///
/// assert_eq!(parse_cpu_range("0-3\n").unwrap(), vec![0, 1, 2, 3]);
/// ```
pub fn parse_cpu_range(text: &str) -> std::result::Result<Vec<u32>, RangeError> {
    let trimmed = text.trim_end_matches('\n');
    let mut parts = trimmed.split('-');
    let (Some(first), Some(last), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RangeError::InvalidFormat(text.to_owned()));
    };

    let first = parse_bound(first, RangeBound::First)?;
    let last = parse_bound(last, RangeBound::Last)?;
    if first > last {
        return Err(RangeError::Reversed {
            first,
            last,
            text: text.to_owned(),
        });
    }

    Ok((first..=last).collect())
}

fn parse_bound(value: &str, bound: RangeBound) -> std::result::Result<u32, RangeError> {
    value
        .parse::<u32>()
        .map_err(|source| RangeError::Conversion {
            bound,
            value: value.to_owned(),
            source,
        })
}

/// Reads a `cpulist` file and parses its single CPU range.
///
/// # Errors
///
/// - [`Error::File`] if the file can't be opened or read.
/// - [`Error::Parse`] if the content isn't a valid range.
pub fn read_cpu_list(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let content = fsutil::read_file_to_string(path)?;

    parse_cpu_range(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
