use crate::error::{BalloonError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;

/// The generational collector configurations the monitor can run under.
///
/// Collectors without a clean young/old split (G1, CMS) are rejected at
/// probe time rather than modelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum CollectorKind {
    #[strum(serialize = "Parallel Scavenge")]
    ThroughputParallel,
    #[strum(serialize = "Serial")]
    SerialStopTheWorld,
}

impl CollectorKind {
    /// Probe table keyed on the (young, old) collector names published by
    /// the runtime. Unknown pairs are a fatal init error.
    pub fn detect(young: &str, old: &str) -> Result<Self> {
        match (young, old) {
            ("PS Scavenge", "PS MarkSweep") => Ok(Self::ThroughputParallel),
            ("Copy", "MarkSweepCompact") => Ok(Self::SerialStopTheWorld),
            _ => Err(BalloonError::UnsupportedCollector {
                young: young.to_string(),
                old: old.to_string(),
            }),
        }
    }

    pub fn young_collector(&self) -> &'static str {
        match self {
            Self::ThroughputParallel => "PS Scavenge",
            Self::SerialStopTheWorld => "Copy",
        }
    }

    pub fn old_collector(&self) -> &'static str {
        match self {
            Self::ThroughputParallel => "PS MarkSweep",
            Self::SerialStopTheWorld => "MarkSweepCompact",
        }
    }

    /// Key for the eden pool in `GcInfo` usage maps.
    pub fn eden_key(&self) -> &'static str {
        match self {
            Self::ThroughputParallel => "PS Eden Space",
            Self::SerialStopTheWorld => "Eden Space",
        }
    }

    /// Key for the tenured pool in `GcInfo` usage maps.
    pub fn tenured_key(&self) -> &'static str {
        match self {
            Self::ThroughputParallel => "PS Old Gen",
            Self::SerialStopTheWorld => "Tenured Gen",
        }
    }
}

/// Usage of one memory pool, in bytes.
///
/// `used <= committed <= max` whenever `max > 0`; a zeroed value means the
/// pool was not observed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolUsage {
    pub used: u64,
    pub committed: u64,
    pub max: u64,
}

impl PoolUsage {
    pub fn new(used: u64, committed: u64, max: u64) -> Self {
        Self {
            used,
            committed,
            max,
        }
    }
}

/// Record of one completed collection as published by the runtime.
///
/// Times are monotonic milliseconds since runtime start. The usage maps may
/// be missing entries; absence means "not observed".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GcInfo {
    pub end_time_ms: u64,
    pub duration_ms: u64,
    pub before: HashMap<String, PoolUsage>,
    pub after: HashMap<String, PoolUsage>,
}

impl GcInfo {
    pub fn usage_before(&self, key: &str) -> PoolUsage {
        self.before.get(key).copied().unwrap_or_default()
    }

    pub fn usage_after(&self, key: &str) -> PoolUsage {
        self.after.get(key).copied().unwrap_or_default()
    }
}

/// Read-only view of the runtime's collectors.
///
/// `last_young_info` / `last_old_info` must each return a coherent record
/// for the most recent completed collection, or `None` if that collector
/// has not run yet. Counts are cumulative and non-decreasing.
pub trait GcTap {
    fn kind(&self) -> CollectorKind;

    fn young_count(&self) -> u64;

    fn old_count(&self) -> u64;

    fn last_young_info(&self) -> Option<GcInfo>;

    fn last_old_info(&self) -> Option<GcInfo>;

    fn eden_key(&self) -> &'static str {
        self.kind().eden_key()
    }

    fn tenured_key(&self) -> &'static str {
        self.kind().tenured_key()
    }
}
