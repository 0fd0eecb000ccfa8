use crate::config::Config;
use crate::error::{BalloonError, Result};
use crate::gc::snapshot::{CollectorSample, HeapSnapshot};
use crate::gc::tap::PoolUsage;
use crate::metrics::tenured::{TenuredStats, RUNNING_SAMPLE_COUNT};
use crate::monitor::TimePartition;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Everything one periodic dump needs: the snapshot that triggered it, the
/// running statistics, the wall-time partition, and the classification of
/// the triggering collection.
pub struct DumpRecord<'a> {
    pub snapshot: &'a HeapSnapshot,
    pub stats: &'a TenuredStats,
    pub timing: &'a TimePartition,
    pub is_old_gc: bool,
    pub live_kib: u64,
    pub committed_kib: u64,
}

pub trait Dumper {
    fn dump(&mut self, record: &DumpRecord<'_>) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes dump records to the balloon stats log, or to stdout when the
/// config asks for it.
pub struct LogDumper {
    out: Box<dyn Write>,
}

impl LogDumper {
    /// Opens the sink and writes the start-of-run header. A failure here is
    /// fatal to init.
    pub fn open(config: &Config) -> Result<Self> {
        let out: Box<dyn Write> = if config.use_stdout {
            Box::new(io::stdout())
        } else {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_path)
                .map_err(BalloonError::LogOpen)?;
            Box::new(file)
        };
        let mut dumper = Self { out };
        dumper.write_header().map_err(BalloonError::LogOpen)?;
        Ok(dumper)
    }

    /// Wraps an already-open sink. No header is written.
    pub fn from_writer(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    fn write_header(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "Start: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        self.out.flush()
    }

    fn write_side(
        out: &mut dyn Write,
        count_tag: &str,
        msecs_tag: &str,
        side: &CollectorSample,
    ) -> io::Result<()> {
        writeln!(out, "{}{}", count_tag, side.count)?;
        writeln!(out, "{}{}", msecs_tag, side.elapsed as f64 / 1000.0)?;
        Self::write_usage(out, "eden", &side.eden_before, &side.eden_after)?;
        Self::write_usage(out, "tenured", &side.tenured_before, &side.tenured_after)
    }

    fn write_usage(
        out: &mut dyn Write,
        tag: &str,
        before: &PoolUsage,
        after: &PoolUsage,
    ) -> io::Result<()> {
        writeln!(
            out,
            "    {}: {}KB/{}KB({}KB) --> {}KB/{}KB({}KB)",
            tag,
            before.used / 1024,
            before.committed / 1024,
            before.max / 1024,
            after.used / 1024,
            after.committed / 1024,
            after.max / 1024,
        )
    }
}

impl Dumper for LogDumper {
    fn dump(&mut self, record: &DumpRecord<'_>) -> io::Result<()> {
        let out = &mut self.out;
        let tag = if record.is_old_gc { "Old: " } else { "Young: " };
        writeln!(
            out,
            "{} timestamp: {:9.4}",
            tag,
            record.timing.total_ms as f64 / 1000.0
        )?;
        Self::write_side(out, "  young count: ", "  young msecs: ", &record.snapshot.young)?;
        Self::write_side(out, "  old count:   ", "  old msecs:   ", &record.snapshot.old)?;
        writeln!(
            out,
            "  mutator secs: {:9.4}               gc secs:      {:9.4}",
            record.timing.mutator_ms as f64 / 1000.0,
            record.timing.gc_ms as f64 / 1000.0,
        )?;
        writeln!(
            out,
            "  live:         {:9}               committed:    {:9}",
            record.live_kib, record.committed_kib,
        )?;
        let s = record.stats;
        writeln!(
            out,
            "  live hi:      {:9} ({:7.4}%)    live lo:      {:9} ({:7.4}%)",
            s.live_hi as i64, s.live_hi_pct, s.live_lo as i64, s.live_lo_pct,
        )?;
        writeln!(
            out,
            "  live avg:     {:9} ({:7.4}%)    (last {:2}):    {:9} ({:7.4}%)",
            s.live_avg as i64,
            s.live_avg_pct,
            RUNNING_SAMPLE_COUNT,
            s.live_run_avg as i64,
            s.live_run_avg_pct,
        )?;
        writeln!(
            out,
            "  commit hi:    {:9} ({:7.4}%)    commit lo:    {:9} ({:7.4}%)",
            s.committed_hi as i64, s.committed_hi_pct, s.committed_lo as i64, s.committed_lo_pct,
        )?;
        writeln!(
            out,
            "  commit avg:   {:9} ({:7.4}%)    (last {:2}):    {:9} ({:7.4}%)",
            s.committed_avg as i64,
            s.committed_avg_pct,
            RUNNING_SAMPLE_COUNT,
            s.committed_run_avg as i64,
            s.committed_run_avg_pct,
        )?;
        writeln!(out)?;
        out.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
