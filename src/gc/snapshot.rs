use crate::gc::tap::{GcInfo, GcTap, PoolUsage};
use serde::{Deserialize, Serialize};

/// What one collector reported at a snapshot point: its cumulative count,
/// the timings of its most recent collection, and the eden/tenured usage
/// before and after that collection. Zeroed if the collector has not run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectorSample {
    pub count: u64,
    pub end_time: u64,
    pub elapsed: u64,
    pub eden_before: PoolUsage,
    pub eden_after: PoolUsage,
    pub tenured_before: PoolUsage,
    pub tenured_after: PoolUsage,
}

impl CollectorSample {
    fn capture(count: u64, info: Option<GcInfo>, eden_key: &str, tenured_key: &str) -> Self {
        match info {
            Some(info) => Self {
                count,
                end_time: info.end_time_ms,
                elapsed: info.duration_ms,
                eden_before: info.usage_before(eden_key),
                eden_after: info.usage_after(eden_key),
                tenured_before: info.usage_before(tenured_key),
                tenured_after: info.usage_after(tenured_key),
            },
            None => Self {
                count,
                ..Self::default()
            },
        }
    }

    pub fn start(&self) -> u64 {
        self.end_time.saturating_sub(self.elapsed)
    }
}

/// Immutable record of the heap state at one end-of-collection point.
///
/// A snapshot is a pure function of the tap at construction time and is
/// never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeapSnapshot {
    pub young: CollectorSample,
    pub old: CollectorSample,
}

impl HeapSnapshot {
    /// Reads counts and last-collection info for both collectors. No
    /// retries: if a count advances mid-construction the snapshot is still
    /// self-consistent because each collector's "last info" is a coherent
    /// record.
    pub fn from_tap(tap: &dyn GcTap) -> Self {
        let young_count = tap.young_count();
        let old_count = tap.old_count();
        let eden_key = tap.eden_key();
        let tenured_key = tap.tenured_key();

        Self {
            young: CollectorSample::capture(young_count, tap.last_young_info(), eden_key, tenured_key),
            old: CollectorSample::capture(old_count, tap.last_old_info(), eden_key, tenured_key),
        }
    }

    /// Latest collection end time seen by either collector.
    pub fn end(&self) -> u64 {
        self.young.end_time.max(self.old.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::tap::CollectorKind;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct StaticTap {
        young_count: u64,
        old_count: u64,
        young_info: Option<GcInfo>,
        old_info: Option<GcInfo>,
    }

    impl GcTap for StaticTap {
        fn kind(&self) -> CollectorKind {
            CollectorKind::ThroughputParallel
        }

        fn young_count(&self) -> u64 {
            self.young_count
        }

        fn old_count(&self) -> u64 {
            self.old_count
        }

        fn last_young_info(&self) -> Option<GcInfo> {
            self.young_info.clone()
        }

        fn last_old_info(&self) -> Option<GcInfo> {
            self.old_info.clone()
        }
    }

    fn usage_map(eden: PoolUsage, tenured: PoolUsage) -> HashMap<String, PoolUsage> {
        let mut map = HashMap::new();
        map.insert("PS Eden Space".to_string(), eden);
        map.insert("PS Old Gen".to_string(), tenured);
        map
    }

    #[test]
    fn test_snapshot_captures_both_sides() {
        let tap = StaticTap {
            young_count: 3,
            old_count: 1,
            young_info: Some(GcInfo {
                end_time_ms: 500,
                duration_ms: 12,
                before: usage_map(
                    PoolUsage::new(800_000, 1_048_576, 1_048_576),
                    PoolUsage::new(10_240, 65_536, 4_194_304),
                ),
                after: usage_map(
                    PoolUsage::new(0, 1_048_576, 1_048_576),
                    PoolUsage::new(20_480, 65_536, 4_194_304),
                ),
            }),
            old_info: Some(GcInfo {
                end_time_ms: 300,
                duration_ms: 40,
                before: usage_map(
                    PoolUsage::new(100, 1_048_576, 1_048_576),
                    PoolUsage::new(40_960, 65_536, 4_194_304),
                ),
                after: usage_map(
                    PoolUsage::new(100, 1_048_576, 1_048_576),
                    PoolUsage::new(16_384, 65_536, 4_194_304),
                ),
            }),
        };

        let snap = HeapSnapshot::from_tap(&tap);
        assert_eq!(snap.young.count, 3);
        assert_eq!(snap.old.count, 1);
        assert_eq!(snap.young.tenured_after.used, 20_480);
        assert_eq!(snap.old.tenured_after.used, 16_384);
        assert_eq!(snap.young.start(), 488);
        assert_eq!(snap.old.start(), 260);
        assert_eq!(snap.end(), 500);
    }

    #[test]
    fn test_missing_info_zero_fills() {
        // young count can be ahead of published info; the side stays zeroed
        let tap = StaticTap {
            young_count: 1,
            old_count: 0,
            young_info: None,
            old_info: None,
        };

        let snap = HeapSnapshot::from_tap(&tap);
        assert_eq!(snap.young.count, 1);
        assert_eq!(snap.young.end_time, 0);
        assert_eq!(snap.young.tenured_after, PoolUsage::default());
        assert_eq!(snap.old, CollectorSample::default());
        assert_eq!(snap.end(), 0);
    }

    #[test]
    fn test_missing_pool_entry_zero_fills() {
        let tap = StaticTap {
            young_count: 1,
            old_count: 0,
            young_info: Some(GcInfo {
                end_time_ms: 100,
                duration_ms: 10,
                before: HashMap::new(),
                after: HashMap::new(),
            }),
            old_info: None,
        };

        let snap = HeapSnapshot::from_tap(&tap);
        assert_eq!(snap.young.end_time, 100);
        assert_eq!(snap.young.elapsed, 10);
        assert_eq!(snap.young.eden_before, PoolUsage::default());
        assert_eq!(snap.young.tenured_after, PoolUsage::default());
    }
}
