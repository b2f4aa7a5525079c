//! NUMA topology inventory for Linux hosts.
//!
//! For every NUMA node this crate reports the CPU IDs bound to it and an
//! estimate of the memory it could still hand out without swapping, read from
//! the kernel's sysfs and procfs pseudo-files.
pub mod available;
pub mod config;
pub mod cpulist;
pub mod error;
pub mod fsutil;
pub mod meminfo;
pub mod node;
pub mod zoneinfo;

pub use config::Config;
pub use error::{Error, Result};
pub use node::{Node, discover_nodes, discover_nodes_in, discover_nodes_with};

/// Discovers the NUMA nodes of the host and prints them as JSON to stdout.
///
/// The host root can be relocated with `ROOTFS_MOUNT_PATH`, see [`Config::from_env`].
///
/// # Errors
///
/// Returns an error if discovery fails or the output can't be written.
pub fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let nodes = discover_nodes_in(&config)?;
    log::debug!("Discovered {} NUMA nodes", nodes.len());

    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &nodes)?;
    println!();

    Ok(())
}
