//! Configuration and constants shared across the crate.

use std::time::Duration;

/// Default timeout for HTTP graph requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type of the flamegraph wire payload
pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Largest integer an IEEE-754 double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

// Differential graphs drop children at or below this share of the merged
// root total (in percent). Their offset is still accounted for.
pub const MIN_SAMPLES_IN_PCT: f64 = 0.1;

/// Maximum number of levels emitted by the graph builders
pub const MAX_LEVEL: usize = 1000;

/// Title of the diff graph root frame
pub const DIFF_ROOT_TITLE: &str = "all";

/// Default number of rows in the terminal summary
pub const DEFAULT_SUMMARY_ROWS: usize = 20;

/// Default number of levels printed by the tree view
pub const DEFAULT_TREE_DEPTH: usize = 12;
