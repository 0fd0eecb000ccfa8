use crate::config::Config;
use crate::dump::{DumpRecord, Dumper, LogDumper};
use crate::error::Result;
use crate::gc::snapshot::HeapSnapshot;
use crate::gc::tap::GcTap;
use crate::metrics::tenured::TenuredStats;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// With `dump_all` off, wait at least this long between dumps triggered by
/// old collections.
pub const DUMP_INTERVAL_MIN: i64 = 20_000;

/// With `dump_all` off, dump the next collection of either kind once this
/// long has passed without a dump.
pub const DUMP_INTERVAL_MAX: i64 = 120_000;

/// Cumulative wall-time split between the collector and the mutator.
/// `gc_ms + mutator_ms == total_ms` after every event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePartition {
    pub gc_ms: u64,
    pub mutator_ms: u64,
    pub total_ms: u64,
}

/// Event-driven heap monitor. Consumes one end-of-collection notification
/// at a time, classifies it against the previous snapshot, and maintains
/// the tenured statistics, the wall-time partition, and the dump cadence.
///
/// Callers must serialize `on_gc_end` invocations and deliver events in
/// completion order; the monitor holds no locks of its own.
pub struct GcMonitor {
    tap: Box<dyn GcTap>,
    dumper: Box<dyn Dumper>,
    dump_all: bool,
    last: Option<HeapSnapshot>,
    stats: TenuredStats,
    timing: TimePartition,
    dumped_old: bool,
    /// End time of the last dumped collection. Starts one minimum interval
    /// in the past so the first old collection always dumps.
    timestamp: i64,
}

impl GcMonitor {
    /// Opens the stats log per the config and builds a monitor over it.
    /// Fails on an unopenable log; collector probing has already happened
    /// when the tap was built.
    pub fn init(tap: Box<dyn GcTap>, config: &Config) -> Result<Self> {
        let dumper = LogDumper::open(config)?;
        Ok(Self::new(tap, Box::new(dumper), config))
    }

    pub fn new(tap: Box<dyn GcTap>, dumper: Box<dyn Dumper>, config: &Config) -> Self {
        Self {
            tap,
            dumper,
            dump_all: config.dump_all,
            last: None,
            stats: TenuredStats::new(),
            timing: TimePartition::default(),
            dumped_old: false,
            timestamp: -DUMP_INTERVAL_MIN,
        }
    }

    /// Handles one end-of-collection notification. Never fails: runtime
    /// anomalies degrade to zero-filled values and sink errors are logged.
    pub fn on_gc_end(&mut self) {
        let current = HeapSnapshot::from_tap(self.tap.as_ref());
        let end = current.end();

        let is_first = self.last.is_none();
        let (is_old, skipped_young, last_end) = match &self.last {
            Some(last) => (
                current.old.count > last.old.count,
                current.young.count > last.young.count + 1,
                last.end(),
            ),
            None => (false, false, 0),
        };
        let seen_old = current.old.count > 0;

        if skipped_young {
            // the missed collections' elapsed times are unknowable, so the
            // partition briefly misattributes them to mutator time
            warn!(
                last_count = self.last.as_ref().map(|l| l.young.count).unwrap_or(0),
                current_count = current.young.count,
                "young collections skipped between events"
            );
        }

        let mut gc_plus = current.young.elapsed as i64;
        if is_old {
            gc_plus += current.old.elapsed as i64;
        }
        let total_plus = if is_first {
            end as i64
        } else if end < last_end {
            warn!(end, last_end, "non-monotonic collection end time");
            0
        } else {
            (end - last_end) as i64
        };
        let mut mutator_plus = total_plus - gc_plus;
        if mutator_plus < 0 {
            // keep the counters monotone; the excess stays attributed to GC
            gc_plus = total_plus;
            mutator_plus = 0;
        }

        // the old collector's view of the tenured pool wins whenever it ran
        let use_old = if is_first { seen_old } else { is_old };
        let side = if use_old { &current.old } else { &current.young };
        let live = side.tenured_after.used / 1024;
        let committed = side.tenured_after.committed / 1024;
        let max = side.tenured_after.max / 1024;

        self.stats
            .update(live, committed, max, last_end, end, is_first, seen_old);

        self.timing.gc_ms += gc_plus as u64;
        self.timing.mutator_ms += mutator_plus as u64;
        self.timing.total_ms += total_plus as u64;

        let dump_delta = end as i64 - self.timestamp;
        if self.dump_all
            || is_first
            || (is_old && (!self.dumped_old || dump_delta > DUMP_INTERVAL_MIN))
            || dump_delta > DUMP_INTERVAL_MAX
        {
            let record = DumpRecord {
                snapshot: &current,
                stats: &self.stats,
                timing: &self.timing,
                is_old_gc: is_old,
                live_kib: live,
                committed_kib: committed,
            };
            if let Err(err) = self.dumper.dump(&record) {
                warn!(error = %err, "failed to write stats dump");
            } else {
                debug!(end_ms = end, old_gc = is_old, "dumped gc stats");
            }
            self.timestamp = end as i64;
            self.dumped_old = is_old;
        }

        self.last = Some(current);
    }

    /// Flushes the dump sink. The monitor is passive; there is nothing else
    /// to wind down.
    pub fn terminate(&mut self) {
        if let Err(err) = self.dumper.flush() {
            warn!(error = %err, "failed to flush stats dump");
        }
    }

    pub fn stats(&self) -> &TenuredStats {
        &self.stats
    }

    pub fn timing(&self) -> &TimePartition {
        &self.timing
    }

    pub fn last_snapshot(&self) -> Option<&HeapSnapshot> {
        self.last.as_ref()
    }
}
