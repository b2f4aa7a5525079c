//! Low watermark aggregation from `/proc/zoneinfo`.
//!
//! Every memory zone reports its watermarks in pages:
//!
//! ```text
//! Node 0, zone   Normal
//!   pages free     1009432
//!         min      11264
//!         low      14080
//!         high     16896
//! ```
//!
//! The `low` values of all zones on all nodes are summed and converted to bytes.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::fsutil;

/// Page size assumed when the host refuses to report one.
pub const FALLBACK_PAGE_SIZE: u64 = 4096;

/// Errors that may occur while reading zone information.
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
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns the host's memory page size in bytes.
pub fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions and only reads process-wide configuration.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    match u64::try_from(size) {
        Ok(size) if size > 0 => size,
        _ => {
            log::debug!("sysconf(_SC_PAGESIZE) returned {size}, assuming {FALLBACK_PAGE_SIZE}");
            FALLBACK_PAGE_SIZE
        }
    }
}

/// Reads a `zoneinfo` file and returns the summed low watermark in bytes.
///
/// # Errors
///
/// - [`Error::File`] if the file can't be opened.
/// - [`Error::ReadLine`] if reading from the file fails.
///
/// # Example
///
/// ```no_run
/// use numa_inventory::zoneinfo::{page_size, read_watermark_low};
///
/// let low = read_watermark_low("/proc/zoneinfo", page_size()).unwrap();
/// println!("low watermark: {low} bytes");
/// ```
pub fn read_watermark_low(path: impl AsRef<Path>, page_size: u64) -> Result<u64> {
    let path = path.as_ref();
    let buf = fsutil::open_file_reader(path)?;
    let pages = watermark_low_pages_from_reader(buf, path)?;

    Ok(pages.saturating_mul(page_size))
}

/// Sums the `low` watermark pages of every zone found in the reader.
///
/// Lines whose first field starts with `low` contribute their second field.
/// A missing or non-numeric value counts as zero instead of failing the scan.
pub fn watermark_low_pages_from_reader<R: BufRead>(mut reader: R, origin: &Path) -> Result<u64> {
    let mut line = String::with_capacity(128);
    let mut pages: u64 = 0;

    while reader
        .read_line(&mut line)
        .map_err(|source| Error::ReadLine {
            path: origin.to_path_buf(),
            source,
        })?
        != 0
    {
        let mut fields = line.split_whitespace();
        if fields.next().is_some_and(|key| key.starts_with("low")) {
            let low = fields
                .next()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(0);
            pages = pages.saturating_add(low);
        }

        line.clear();
    }

    Ok(pages)
}
