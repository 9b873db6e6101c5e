//! Diagnostics for analysis runs.
//!
//! Tracks what was scanned and what the scanner skipped, across runs.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, RunLog, RunStats, SharedRunLog,
};
