//! Per-node estimate of memory available for new allocations without swapping.
//!
//! This mirrors the heuristic the kernel uses for `MemAvailable` in
//! `/proc/meminfo`, applied to a single node's counters:
//!
//! ```text
//! available = MemFree - low
//!           + pagecache - min(pagecache / 2, low)
//!           + SReclaimable - min(SReclaimable / 2, low)
//! ```
//!
//! where `low` is the summed low watermark of all zones and `pagecache` is
//! `Active(file) + Inactive(file)`. The result is clamped to zero.

use std::path::PathBuf;

use crate::meminfo::MemInfo;
use crate::zoneinfo;

/// Provides the summed low watermark, in bytes.
pub trait WatermarkSource {
    fn watermark_low(&self) -> zoneinfo::Result<u64>;
}

/// [`WatermarkSource`] backed by a `zoneinfo` file.
#[derive(Debug, Clone)]
pub struct ZoneInfoWatermark {
    path: PathBuf,
    page_size: u64,
}

impl ZoneInfoWatermark {
    pub fn new(path: impl Into<PathBuf>, page_size: u64) -> Self {
        Self {
            path: path.into(),
            page_size,
        }
    }
}

impl WatermarkSource for ZoneInfoWatermark {
    fn watermark_low(&self) -> zoneinfo::Result<u64> {
        zoneinfo::read_watermark_low(&self.path, self.page_size)
    }
}

/// Estimates the available memory of a node.
///
/// The watermark is re-read on every call. If it can't be read, the estimate
/// falls back to [`fallback_available`], which ignores the watermark reserve
/// and therefore overestimates.
pub fn calculate_available_memory<W>(info: &MemInfo, watermark: &W) -> u64
where
    W: WatermarkSource + ?Sized,
{
    match watermark.watermark_low() {
        Ok(low) => estimate_available(info, low),
        Err(err) => {
            log::debug!("Falling back to unreserved memory estimate: {err}");
            fallback_available(info)
        }
    }
}

/// Available memory given a known low watermark in bytes.
///
/// Intermediate values are signed so `MemFree - low` may dip below zero
/// before the reclaimable parts are added back; only the final sum is clamped.
pub fn estimate_available(info: &MemInfo, watermark_low: u64) -> u64 {
    let low = i128::from(watermark_low);

    let mut available = i128::from(info.mem_free) - low;

    let page_cache = i128::from(info.active_file) + i128::from(info.inactive_file);
    available += page_cache - (page_cache / 2).min(low);

    let slab = i128::from(info.s_reclaimable);
    available += slab - (slab / 2).min(low);

    u64::try_from(available.max(0)).unwrap_or(u64::MAX)
}

/// Free memory plus everything reclaimable, without any watermark reserve.
pub fn fallback_available(info: &MemInfo) -> u64 {
    info.mem_free
        .saturating_add(info.s_reclaimable)
        .saturating_add(info.page_cache())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedWatermark(u64);

    impl WatermarkSource for FixedWatermark {
        fn watermark_low(&self) -> zoneinfo::Result<u64> {
            Ok(self.0)
        }
    }

    struct UnreadableWatermark;

    impl WatermarkSource for UnreadableWatermark {
        fn watermark_low(&self) -> zoneinfo::Result<u64> {
            zoneinfo::read_watermark_low("/definitely/does/not/exist/zoneinfo", 4096)
        }
    }

    fn info(mem_free: u64, active_file: u64, inactive_file: u64, s_reclaimable: u64) -> MemInfo {
        MemInfo {
            mem_total: 1 << 40,
            mem_free,
            active_file,
            inactive_file,
            s_reclaimable,
        }
    }

    #[test]
    fn test_normal_path() {
        // 1000 - 100 + (400 - 100) + (50 - 25)
        let m = info(1000, 300, 100, 50);
        assert_eq!(estimate_available(&m, 100), 1225);
    }

    #[test]
    fn test_zero_watermark_counts_everything() {
        let m = info(1000, 300, 100, 50);
        assert_eq!(estimate_available(&m, 0), 1450);
    }

    #[test]
    fn test_half_correction_is_bounded_by_watermark() {
        // page cache loses half (200) rather than the full watermark (10_000)
        let m = info(20_000, 400, 0, 0);
        assert_eq!(estimate_available(&m, 10_000), 20_000 - 10_000 + 200);
    }

    #[test]
    fn test_negative_intermediate_is_recovered() {
        // 0 - 10 + (100 - 10)
        let m = info(0, 100, 0, 0);
        assert_eq!(estimate_available(&m, 10), 80);
    }

    #[test]
    fn test_clamped_to_zero() {
        let m = info(0, 0, 0, 0);
        assert_eq!(estimate_available(&m, 1_000_000), 0);

        let m = info(10, 4, 4, 4);
        assert_eq!(estimate_available(&m, u64::MAX), 0);
    }

    #[test]
    fn test_monotonic_in_mem_free() {
        let low = 5_000;
        let mut previous = 0;
        for free in (0..40_000).step_by(777) {
            let estimate = estimate_available(&info(free, 3_000, 1_500, 800), low);
            assert!(estimate >= previous, "{estimate} < {previous} at free={free}");
            previous = estimate;
        }
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let m = info(u64::MAX, u64::MAX, u64::MAX, u64::MAX);
        assert_eq!(estimate_available(&m, 0), u64::MAX);
        assert_eq!(fallback_available(&m), u64::MAX);
    }

    #[test]
    fn test_fallback_when_watermark_unreadable() {
        let m = info(1000, 300, 100, 50);
        assert_eq!(calculate_available_memory(&m, &UnreadableWatermark), 1450);
        assert_eq!(fallback_available(&m), 1000 + 50 + 300 + 100);
    }

    #[test]
    fn test_uses_watermark_source() {
        let m = info(1000, 300, 100, 50);
        assert_eq!(calculate_available_memory(&m, &FixedWatermark(100)), 1225);
    }

    #[test]
    fn test_zoneinfo_watermark_reads_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "        low      2\n        low      3\n").unwrap();

        let source = ZoneInfoWatermark::new(tmp.path(), 10);
        assert_eq!(source.watermark_low().unwrap(), 50);

        let m = info(1000, 0, 0, 0);
        assert_eq!(calculate_available_memory(&m, &source), 950);
    }
}
