//! Per-node memory counters from `/sys/devices/system/node/node<N>/meminfo`.
mod error;
mod parser;

pub use error::{Error, Result};
pub use parser::MemInfo;

use std::io::BufRead;
use std::path::Path;

use crate::fsutil;
use parser::parse_meminfo_line;

/// Reads a node `meminfo` file into a [`MemInfo`] record.
///
/// Lines that aren't shaped like `Node <N> <Field>: <value> kB`, as well as
/// fields that aren't tracked, are skipped. Counters missing from the file are
/// left at zero.
///
/// # Errors
///
/// - [`Error::File`] if the file can't be opened.
/// - [`Error::ReadLine`] if reading from the file fails.
/// - [`Error::InvalidValue`] if a tracked field doesn't hold an unsigned integer.
///
/// # Example
///
/// ```no_run
/// use numa_inventory::meminfo::parse_meminfo;
///
/// let info = parse_meminfo("/sys/devices/system/node/node0/meminfo").unwrap();
/// println!("node0 free: {} bytes", info.mem_free);
/// ```
pub fn parse_meminfo(path: impl AsRef<Path>) -> Result<MemInfo> {
    let path = path.as_ref();
    let buf = fsutil::open_file_reader(path)?;

    parse_meminfo_from_reader(buf, path)
}

/// Parses `meminfo` content from a buffered reader.
///
/// `origin` only shows up in error messages.
pub fn parse_meminfo_from_reader<R: BufRead>(mut reader: R, origin: &Path) -> Result<MemInfo> {
    let mut info = MemInfo::default();
    let mut line = String::with_capacity(64);
    let mut lineno = 0;

    while reader
        .read_line(&mut line)
        .map_err(|source| Error::ReadLine {
            path: origin.to_path_buf(),
            source,
        })?
        != 0
    {
        lineno += 1;
        if let Some(entry) = parse_meminfo_line(&line) {
            entry
                .apply(&mut info)
                .map_err(|source| Error::InvalidValue {
                    path: origin.to_path_buf(),
                    field: entry.field,
                    value: entry.value.to_owned(),
                    line: lineno,
                    source,
                })?;
        }

        line.clear();
    }

    Ok(info)
}
