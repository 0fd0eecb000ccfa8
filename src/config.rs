use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dump to stdout instead of the stats log file.
    #[serde(default)]
    pub use_stdout: bool,

    /// Dump at every GC instead of at infrequent intervals.
    #[serde(default)]
    pub dump_all: bool,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_stdout: false,
            dump_all: false,
            log_path: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from(".balloonstats.log")
}
