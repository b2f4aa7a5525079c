//! NUMA node discovery.
//!
//! Walks the node directory (normally `/sys/devices/system/node`), and for every
//! `node<N>` subdirectory reads its `meminfo` and `cpulist` attributes. Entries
//! that aren't node directories (`possible`, `online`, `power`, ...) are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::available::{WatermarkSource, ZoneInfoWatermark, calculate_available_memory};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::{cpulist, meminfo};

const NODE_PREFIX: &str = "node";

/// CPU and memory snapshot of one NUMA node. Memory figures are in bytes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Node {
    pub id: u32,
    pub cpus: Vec<u32>,
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
}

impl Node {
    pub fn cpu_count(&self) -> usize {
        self.cpus.len()
    }

    pub fn has_cpus(&self) -> bool {
        !self.cpus.is_empty()
    }
}

/// Discovers all NUMA nodes of the running host.
///
/// # Example
///
/// ```no_run
/// for node in numa_inventory::discover_nodes().unwrap() {
///     println!("node{}: {} cpus, {} bytes available", node.id, node.cpu_count(), node.mem_available);
/// }
/// ```
pub fn discover_nodes() -> Result<Vec<Node>> {
    discover_nodes_in(&Config::default())
}

/// Discovers all NUMA nodes using the paths in `config`.
pub fn discover_nodes_in(config: &Config) -> Result<Vec<Node>> {
    let watermark = ZoneInfoWatermark::new(&config.zoneinfo, config.page_size);
    discover_nodes_with(&config.node_dir, &watermark)
}

/// Discovers all NUMA nodes below `node_dir`, taking the low watermark from `watermark`.
///
/// Nodes are returned sorted by directory name. Any failure aborts the whole
/// discovery; no partial result is returned.
///
/// # Errors
///
/// - [`Error::ReadDir`] / [`Error::ReadDirEntry`] if the directory can't be listed.
/// - [`Error::InvalidNodeId`] if a `node*` directory has a non-numeric suffix.
/// - [`Error::MemInfo`] if a node's `meminfo` can't be read or parsed.
/// - [`Error::CpuList`] if a node's `cpulist` can't be read or isn't a single range.
pub fn discover_nodes_with<W>(node_dir: impl AsRef<Path>, watermark: &W) -> Result<Vec<Node>>
where
    W: WatermarkSource + ?Sized,
{
    let node_dir = node_dir.as_ref();
    let mut nodes = Vec::new();

    for (name, path) in list_node_dirs(node_dir)? {
        let id = name[NODE_PREFIX.len()..]
            .parse::<u32>()
            .map_err(|source| Error::InvalidNodeId {
                name: name.clone(),
                source,
            })?;

        let node = read_node(id, &path, watermark)?;
        log::debug!(
            "Discovered node{} with {} cpus and {} bytes available",
            node.id,
            node.cpu_count(),
            node.mem_available
        );
        nodes.push(node);
    }

    Ok(nodes)
}

/// Lists the `node*` subdirectories of `node_dir`, sorted by name.
fn list_node_dirs(node_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(node_dir).map_err(|source| Error::ReadDir {
        path: node_dir.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::ReadDirEntry {
            path: node_dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| Error::ReadDirEntry {
            path: entry.path(),
            source,
        })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        if !file_type.is_dir() || !name.starts_with(NODE_PREFIX) {
            log::trace!("Skipping `{}`", entry.path().display());
            continue;
        }

        dirs.push((name, entry.path()));
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

fn read_node<W>(id: u32, path: &Path, watermark: &W) -> Result<Node>
where
    W: WatermarkSource + ?Sized,
{
    let info = meminfo::parse_meminfo(path.join("meminfo")).map_err(|source| Error::MemInfo {
        path: path.to_path_buf(),
        source,
    })?;

    let cpus = cpulist::read_cpu_list(path.join("cpulist")).map_err(|source| Error::CpuList {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Node {
        id,
        cpus,
        mem_total: info.mem_total,
        mem_free: info.mem_free,
        mem_available: calculate_available_memory(&info, watermark),
    })
}
