pub mod snapshot;
pub mod tap;

pub use snapshot::{CollectorSample, HeapSnapshot};
pub use tap::{CollectorKind, GcInfo, GcTap, PoolUsage};
