//! Locations of the kernel pseudo-files read during discovery.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use crate::error::ResultOkLogExt;
use crate::zoneinfo;

/// Directory holding one `node<N>` subdirectory per NUMA node.
pub const NODE_DIR: &str = "/sys/devices/system/node";
/// System-wide per-zone memory information.
pub const ZONEINFO_PATH: &str = "/proc/zoneinfo";

/// Environment variable pointing at a bind-mounted host root.
pub const ROOTFS_ENV: &str = "ROOTFS_MOUNT_PATH";
/// Environment variable overriding the host page size.
pub const PAGE_SIZE_ENV: &str = "NUMA_INVENTORY_PAGE_SIZE";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid page size `{value}`: {source}")]
    InvalidPageSize {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("page size must not be zero")]
    ZeroPageSize,
}

/// Paths and host parameters used by node discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory listing the NUMA nodes.
    pub node_dir: PathBuf,
    /// Zone information used for the low watermark.
    pub zoneinfo: PathBuf,
    /// Bytes per memory page.
    pub page_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_dir: PathBuf::from(NODE_DIR),
            zoneinfo: PathBuf::from(ZONEINFO_PATH),
            page_size: zoneinfo::page_size(),
        }
    }
}

impl Config {
    /// Uses the default locations re-rooted under `rootfs`.
    ///
    /// # Example
    ///
    /// ```
    /// use numa_inventory::Config;
    ///
    /// let config = Config::with_rootfs("/rootfs");
    /// assert_eq!(config.node_dir, std::path::Path::new("/rootfs/sys/devices/system/node"));
    /// ```
    pub fn with_rootfs(rootfs: impl AsRef<Path>) -> Self {
        let rootfs = rootfs.as_ref();
        Self {
            node_dir: reroot(rootfs, NODE_DIR),
            zoneinfo: reroot(rootfs, ZONEINFO_PATH),
            page_size: zoneinfo::page_size(),
        }
    }

    /// Builds the configuration from [`ROOTFS_ENV`] and [`PAGE_SIZE_ENV`].
    ///
    /// An unusable page size override is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = match std::env::var_os(ROOTFS_ENV) {
            Some(rootfs) => Self::with_rootfs(PathBuf::from(rootfs)),
            None => Self::default(),
        };
        log::debug!("Node directory: {}", config.node_dir.display());

        if let Some(page_size) = std::env::var(PAGE_SIZE_ENV)
            .ok()
            .and_then(|value| parse_page_size(&value).ok_log())
        {
            config.page_size = page_size;
        }

        config
    }
}

fn reroot(rootfs: &Path, path: &str) -> PathBuf {
    rootfs.join(path.trim_start_matches('/'))
}

/// Parses a page size override.
///
/// # Errors
///
/// - [`Error::InvalidPageSize`] if the value isn't an unsigned integer.
/// - [`Error::ZeroPageSize`] if the value is zero.
pub fn parse_page_size(value: &str) -> Result<u64, Error> {
    let value = value.trim();
    let size = value
        .parse::<u64>()
        .map_err(|source| Error::InvalidPageSize {
            value: value.to_owned(),
            source,
        })?;
    if size == 0 {
        return Err(Error::ZeroPageSize);
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_host_paths() {
        let config = Config::default();
        assert_eq!(config.node_dir, Path::new("/sys/devices/system/node"));
        assert_eq!(config.zoneinfo, Path::new("/proc/zoneinfo"));
        assert!(config.page_size > 0);
    }

    #[test]
    fn with_rootfs_reroots_paths() {
        let config = Config::with_rootfs("/rootfs");
        assert_eq!(config.node_dir, Path::new("/rootfs/sys/devices/system/node"));
        assert_eq!(config.zoneinfo, Path::new("/rootfs/proc/zoneinfo"));
    }

    #[test]
    fn parse_page_size_accepts_integers() {
        assert_eq!(parse_page_size("65536\n").unwrap(), 65536);
    }

    #[test]
    fn parse_page_size_rejects_garbage() {
        assert!(matches!(
            parse_page_size("4k"),
            Err(Error::InvalidPageSize { .. })
        ));
        assert!(matches!(parse_page_size("0"), Err(Error::ZeroPageSize)));
    }
}
