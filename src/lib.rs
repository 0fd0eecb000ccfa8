//! GC-event-driven monitor of tenured-generation occupancy, plus the
//! balloon registry an external controller uses to hand heap footprint back
//! to the host.
//!
//! The monitor consumes end-of-collection notifications through an abstract
//! [`gc::GcTap`], keeps hi/lo/average statistics over the tenured pool, and
//! writes periodic dumps to the balloon stats log. The registry coordinates
//! pinned 1 MiB buffers with an abstract [`balloon::BalloonDriver`],
//! retrying any operation a collection interrupted.

pub mod balloon;
pub mod config;
pub mod dump;
pub mod error;
pub mod gc;
pub mod metrics;
pub mod monitor;

pub use balloon::{BalloonDriver, BalloonRegistry, DeflateOutcome, InflateOutcome, BALLOON_SIZE};
pub use config::Config;
pub use dump::{DumpRecord, Dumper, LogDumper};
pub use error::{BalloonError, Result};
pub use gc::{CollectorKind, GcTap, HeapSnapshot};
pub use metrics::{TenuredStats, RUNNING_SAMPLE_COUNT};
pub use monitor::{GcMonitor, TimePartition, DUMP_INTERVAL_MAX, DUMP_INTERVAL_MIN};
