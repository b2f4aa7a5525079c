use std::num::ParseIntError;
use std::path::PathBuf;

use crate::{cpulist, meminfo};

/// Errors that abort node discovery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read node directory `{path}`: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read entry in node directory `{path}`: {source}")]
    ReadDirEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid node id in `{name}`: {source}")]
    InvalidNodeId {
        name: String,
        #[source]
        source: ParseIntError,
    },
    #[error("parse meminfo of `{path}`: {source}")]
    MemInfo {
        path: PathBuf,
        #[source]
        source: meminfo::Error,
    },
    #[error("parse cpulist of `{path}`: {source}")]
    CpuList {
        path: PathBuf,
        #[source]
        source: cpulist::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }
}
