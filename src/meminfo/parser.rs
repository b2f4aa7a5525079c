//! Line parser for per-node `meminfo` files.
//!
//! Each line of `/sys/devices/system/node/node<N>/meminfo` looks like
//!
//! ```text
//! Node 0 MemTotal:       263777956 kB
//! ```
//!
//! Only a handful of counters are relevant for estimating available memory; all
//! others are ignored. Values are reported in kibibytes and normalized to bytes.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Multiplier from the kibibyte values in `meminfo` to bytes.
const KIB: u64 = 1024;

/// Snapshot of the per-node memory counters, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemInfo {
    /// Total usable memory of the node.
    pub mem_total: u64,
    /// Memory not used for anything.
    pub mem_free: u64,
    /// Recently used page cache.
    pub active_file: u64,
    /// Page cache that is a candidate for reclaim.
    pub inactive_file: u64,
    /// Slab memory that can be reclaimed under pressure.
    pub s_reclaimable: u64,
}

impl MemInfo {
    fn set_mem_total(&mut self, v: u64) {
        self.mem_total = v;
    }

    fn set_mem_free(&mut self, v: u64) {
        self.mem_free = v;
    }

    fn set_active_file(&mut self, v: u64) {
        self.active_file = v;
    }

    fn set_inactive_file(&mut self, v: u64) {
        self.inactive_file = v;
    }

    fn set_s_reclaimable(&mut self, v: u64) {
        self.s_reclaimable = v;
    }

    /// Total page cache, i.e. active plus inactive file-backed memory.
    pub fn page_cache(&self) -> u64 {
        self.active_file.saturating_add(self.inactive_file)
    }
}

type Setter = fn(&mut MemInfo, u64);

static SETTERS: LazyLock<HashMap<&'static str, Setter>> = LazyLock::new(|| {
    let mut m: HashMap<&'static str, Setter> = HashMap::with_capacity(5);

    m.insert("MemTotal", MemInfo::set_mem_total);
    m.insert("MemFree", MemInfo::set_mem_free);
    m.insert("Active(file)", MemInfo::set_active_file);
    m.insert("Inactive(file)", MemInfo::set_inactive_file);
    m.insert("SReclaimable", MemInfo::set_s_reclaimable);

    m
});

/// A recognized `meminfo` entry, borrowed from the input line.
#[derive(Debug)]
pub(super) struct Entry<'a> {
    pub field: &'static str,
    pub value: &'a str,
    setter: Setter,
}

impl Entry<'_> {
    /// Parses the kibibyte value and stores it, in bytes, on `info`.
    pub fn apply(&self, info: &mut MemInfo) -> Result<(), std::num::ParseIntError> {
        let kib = self.value.parse::<u64>()?;
        (self.setter)(info, kib.saturating_mul(KIB));
        Ok(())
    }
}

/// Splits a `meminfo` line into a recognized field and its raw value.
///
/// Returns `None` for lines that don't have exactly one `:`, whose label isn't
/// made of exactly three space-separated tokens, or whose field isn't tracked.
pub(super) fn parse_meminfo_line(line: &str) -> Option<Entry<'_>> {
    let mut parts = line.split(':');
    let (Some(label), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };

    let mut tokens = label.trim().split(' ');
    let (Some(_), Some(_), Some(key), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return None;
    };

    let (field, setter) = SETTERS.get_key_value(key)?;
    let value = value.trim();
    let value = value.strip_suffix(" kB").unwrap_or(value).trim_end();

    Some(Entry {
        field,
        value,
        setter: *setter,
    })
}
