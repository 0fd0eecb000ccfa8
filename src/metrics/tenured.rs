use serde::{Deserialize, Serialize};

/// Number of samples folded into the windowed running averages.
pub const RUNNING_SAMPLE_COUNT: usize = 10;

/// Running statistics over tenured-pool occupancy, fed one sample per
/// observed collection. All sizes are KiB; percent fields are relative to
/// the pool maximum at the time of the sample.
///
/// `live_lo` / `committed_lo` use zero as the "not yet set" sentinel, so a
/// genuine zero-occupancy reading is indistinguishable from unset. A
/// tenured pool is never truly empty in practice, so the ambiguity is
/// tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenuredStats {
    pub live_hi: f64,
    pub live_lo: f64,
    pub live_avg: f64,
    pub live_run_avg: f64,

    pub live_hi_pct: f64,
    pub live_lo_pct: f64,
    pub live_avg_pct: f64,
    pub live_run_avg_pct: f64,

    pub committed_hi: f64,
    pub committed_lo: f64,
    pub committed_avg: f64,
    pub committed_run_avg: f64,

    pub committed_hi_pct: f64,
    pub committed_lo_pct: f64,
    pub committed_avg_pct: f64,
    pub committed_run_avg_pct: f64,

    live_ring: [u64; RUNNING_SAMPLE_COUNT],
    committed_ring: [u64; RUNNING_SAMPLE_COUNT],
    time_ring: [u64; RUNNING_SAMPLE_COUNT],
    sample_idx: usize,
}

impl TenuredStats {
    pub fn new() -> Self {
        let mut time_ring = [0u64; RUNNING_SAMPLE_COUNT];
        for (i, slot) in time_ring.iter_mut().enumerate() {
            // distinct sentinel end times keep the backward deltas non-zero
            // before the ring fills
            *slot = i as u64;
        }
        Self {
            live_hi: 0.0,
            live_lo: 0.0,
            live_avg: 0.0,
            live_run_avg: 0.0,
            live_hi_pct: 0.0,
            live_lo_pct: 0.0,
            live_avg_pct: 0.0,
            live_run_avg_pct: 0.0,
            committed_hi: 0.0,
            committed_lo: 0.0,
            committed_avg: 0.0,
            committed_run_avg: 0.0,
            committed_hi_pct: 0.0,
            committed_lo_pct: 0.0,
            committed_avg_pct: 0.0,
            committed_run_avg_pct: 0.0,
            live_ring: [0; RUNNING_SAMPLE_COUNT],
            committed_ring: [0; RUNNING_SAMPLE_COUNT],
            time_ring,
            sample_idx: RUNNING_SAMPLE_COUNT - 1,
        }
    }

    /// Folds in one sample. `live`, `committed` and `max` are KiB;
    /// `last_end` / `end` are the previous and current collection end times
    /// in milliseconds. Lo water marks stay untouched until `seen_old_gc`;
    /// the first sample seeds the lifetime averages directly and leaves the
    /// running window alone.
    pub fn update(
        &mut self,
        live: u64,
        committed: u64,
        max: u64,
        last_end: u64,
        end: u64,
        is_first: bool,
        seen_old_gc: bool,
    ) {
        let comm_pct = pct(committed as f64, max);
        let live_pct = pct(live as f64, max);

        if is_first {
            if seen_old_gc {
                self.committed_lo = committed as f64;
                self.live_lo = live as f64;
                self.committed_lo_pct = comm_pct;
                self.live_lo_pct = live_pct;
            }
            self.committed_avg = committed as f64;
            self.committed_hi = committed as f64;
            self.live_avg = live as f64;
            self.live_hi = live as f64;
            self.committed_avg_pct = comm_pct;
            self.committed_hi_pct = comm_pct;
            self.live_avg_pct = live_pct;
            self.live_hi_pct = live_pct;
            return;
        }

        if committed as f64 > self.committed_hi {
            self.committed_hi = committed as f64;
            self.committed_hi_pct = comm_pct;
        }
        if live as f64 > self.live_hi {
            self.live_hi = live as f64;
            self.live_hi_pct = live_pct;
        }
        if seen_old_gc {
            if (committed as f64) < self.committed_lo || self.committed_lo == 0.0 {
                self.committed_lo = committed as f64;
                self.committed_lo_pct = comm_pct;
            }
            if (live as f64) < self.live_lo || self.live_lo == 0.0 {
                self.live_lo = live as f64;
                self.live_lo_pct = live_pct;
            }
        }

        // lifetime averages weight each sample by the interval preceding it
        // and divide by the total lifetime; early samples are biased but the
        // formula is the monitoring contract
        if end > 0 {
            let interval = (end as i64 - last_end as i64) as f64;
            self.committed_avg =
                (self.committed_avg * last_end as f64 + committed as f64 * interval) / end as f64;
            self.committed_avg_pct = pct(self.committed_avg, max);
            self.live_avg =
                (self.live_avg * last_end as f64 + live as f64 * interval) / end as f64;
            self.live_avg_pct = pct(self.live_avg, max);
        }

        // windowed averages: walk the ring backwards from the current sample
        // accumulating value-by-interval products
        let mut current_time = end as i64;
        let mut current_committed = committed as f64;
        let mut current_live = live as f64;
        let mut committed_acc = 0.0;
        let mut live_acc = 0.0;
        let mut time_acc: i64 = 0;
        // offset keeps the index non-negative under the modulo below
        let mut last = self.sample_idx + RUNNING_SAMPLE_COUNT;
        for _ in 0..RUNNING_SAMPLE_COUNT {
            let last_wrap = last % RUNNING_SAMPLE_COUNT;
            let last_time = self.time_ring[last_wrap] as i64;
            let delta = current_time - last_time;
            committed_acc += current_committed * delta as f64;
            live_acc += current_live * delta as f64;
            time_acc += delta;
            current_time = last_time;
            current_committed = self.committed_ring[last_wrap] as f64;
            current_live = self.live_ring[last_wrap] as f64;
            last -= 1;
        }
        // all samples at the same end time: keep the previous window value
        if time_acc != 0 {
            self.committed_run_avg = committed_acc / time_acc as f64;
            self.committed_run_avg_pct = pct(self.committed_run_avg, max);
            self.live_run_avg = live_acc / time_acc as f64;
            self.live_run_avg_pct = pct(self.live_run_avg, max);
        }

        self.sample_idx = (self.sample_idx + 1) % RUNNING_SAMPLE_COUNT;
        self.live_ring[self.sample_idx] = live;
        self.committed_ring[self.sample_idx] = committed;
        self.time_ring[self.sample_idx] = end;
    }
}

impl Default for TenuredStats {
    fn default() -> Self {
        Self::new()
    }
}

fn pct(value: f64, max: u64) -> f64 {
    if max > 0 {
        100.0 * value / max as f64
    } else {
        0.0
    }
}
