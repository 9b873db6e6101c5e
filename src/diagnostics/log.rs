//! Cumulative run log.
//!
//! Counts what every analysis run processed and what the scanner had to skip,
//! so recurring clock jumps or out-of-range differences in a data set are
//! visible across runs. Counters are atomic and safe to share between
//! worker threads.

use crate::core::ScanReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Run statistics for the current session.
#[derive(Debug)]
pub struct RunLog {
    /// Number of event streams scanned
    streams_scanned: AtomicU64,
    /// Number of events across scanned streams
    events_processed: AtomicU64,
    /// Number of accepted time differences
    differences_recorded: AtomicU64,
    /// Number of anchors or pairs skipped on time jumps
    time_jumps: AtomicU64,
    /// Number of differences outside the histogram range
    differences_dropped: AtomicU64,
    /// Number of streams that failed to load or validate
    streams_failed: AtomicU64,
    /// Number of histograms exported
    histograms_exported: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl RunLog {
    /// Create a new run log.
    pub fn new() -> Self {
        Self {
            streams_scanned: AtomicU64::new(0),
            events_processed: AtomicU64::new(0),
            differences_recorded: AtomicU64::new(0),
            time_jumps: AtomicU64::new(0),
            differences_dropped: AtomicU64::new(0),
            streams_failed: AtomicU64::new(0),
            histograms_exported: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a run log that continues from stats saved at `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("could not load previous run stats: {e}");
        }

        log
    }

    /// Record a completed scan of a stream with `events` events.
    pub fn record_scan(&self, events: usize, report: &ScanReport) {
        self.streams_scanned.fetch_add(1, Ordering::Relaxed);
        self.events_processed.fetch_add(events as u64, Ordering::Relaxed);
        self.differences_recorded.fetch_add(report.differences, Ordering::Relaxed);
        self.time_jumps.fetch_add(report.time_jumps, Ordering::Relaxed);
        self.differences_dropped.fetch_add(report.dropped, Ordering::Relaxed);
    }

    /// Record a stream that could not be scanned.
    pub fn record_failure(&self) {
        self.streams_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an exported histogram.
    pub fn record_export(&self) {
        self.histograms_exported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> RunStats {
        RunStats {
            streams_scanned: self.streams_scanned.load(Ordering::Relaxed),
            events_processed: self.events_processed.load(Ordering::Relaxed),
            differences_recorded: self.differences_recorded.load(Ordering::Relaxed),
            time_jumps: self.time_jumps.load(Ordering::Relaxed),
            differences_dropped: self.differences_dropped.load(Ordering::Relaxed),
            streams_failed: self.streams_failed.load(Ordering::Relaxed),
            histograms_exported: self.histograms_exported.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Run Statistics:\n\
             - Streams scanned: {}\n\
             - Streams failed: {}\n\
             - Events processed: {}\n\
             - Differences recorded: {}\n\
             - Time jumps skipped: {}\n\
             - Differences out of range: {}\n\
             - Histograms exported: {}",
            stats.streams_scanned,
            stats.streams_failed,
            stats.events_processed,
            stats.differences_recorded,
            stats.time_jumps,
            stats.differences_dropped,
            stats.histograms_exported
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                streams_scanned: stats.streams_scanned,
                events_processed: stats.events_processed,
                differences_recorded: stats.differences_recorded,
                time_jumps: stats.time_jumps,
                differences_dropped: stats.differences_dropped,
                streams_failed: stats.streams_failed,
                histograms_exported: stats.histograms_exported,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.streams_scanned
                    .store(persisted.streams_scanned, Ordering::Relaxed);
                self.events_processed
                    .store(persisted.events_processed, Ordering::Relaxed);
                self.differences_recorded
                    .store(persisted.differences_recorded, Ordering::Relaxed);
                self.time_jumps
                    .store(persisted.time_jumps, Ordering::Relaxed);
                self.differences_dropped
                    .store(persisted.differences_dropped, Ordering::Relaxed);
                self.streams_failed
                    .store(persisted.streams_failed, Ordering::Relaxed);
                self.histograms_exported
                    .store(persisted.histograms_exported, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.streams_scanned.store(0, Ordering::Relaxed);
        self.events_processed.store(0, Ordering::Relaxed);
        self.differences_recorded.store(0, Ordering::Relaxed);
        self.time_jumps.store(0, Ordering::Relaxed);
        self.differences_dropped.store(0, Ordering::Relaxed);
        self.streams_failed.store(0, Ordering::Relaxed);
        self.histograms_exported.store(0, Ordering::Relaxed);
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub streams_scanned: u64,
    pub events_processed: u64,
    pub differences_recorded: u64,
    pub time_jumps: u64,
    pub differences_dropped: u64,
    pub streams_failed: u64,
    pub histograms_exported: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    streams_scanned: u64,
    events_processed: u64,
    differences_recorded: u64,
    time_jumps: u64,
    differences_dropped: u64,
    #[serde(default)]
    streams_failed: u64,
    histograms_exported: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared run log.
pub type SharedRunLog = Arc<RunLog>;

/// Create a new shared run log.
pub fn create_shared_log() -> SharedRunLog {
    Arc::new(RunLog::new())
}

/// Create a new shared run log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedRunLog {
    Arc::new(RunLog::with_persistence(path))
}
