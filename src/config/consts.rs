use std::time::Duration;

/// Default deadline for one node's admission wait plus work (60 seconds)
pub const DEFAULT_NODE_TIMEOUT_SECS: u64 = 60;
/// Default per-node deadline as a `Duration`
pub const DEFAULT_NODE_TIMEOUT: Duration = Duration::from_secs(DEFAULT_NODE_TIMEOUT_SECS);
/// Concurrency used when the number of CPU cores cannot be determined
pub const FALLBACK_CONCURRENCY: usize = 4;
