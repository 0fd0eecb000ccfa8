pub mod tenured;

pub use tenured::{TenuredStats, RUNNING_SAMPLE_COUNT};
