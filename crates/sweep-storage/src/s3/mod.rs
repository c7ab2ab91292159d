//! Amazon S3 (and S3-compatible) probe.

mod config;
mod probe;

pub use config::S3ProbeConfig;
pub use probe::S3Probe;
