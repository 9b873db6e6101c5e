//! Core analysis for Rossi-alpha time-difference histograms.
//!
//! This module contains:
//! - Coincidence policies selecting which event pairs count
//! - The sliding-window scanner and its four binning types
//! - Fixed-geometry histogram accumulation
//! - Parallel drivers, summaries and export records

pub mod export;
pub mod histogram;
pub mod parallel;
pub mod policy;
pub mod scanner;
pub mod summary;

// Re-export commonly used types
pub use export::{ExportBuilder, ExportError, ExportFormat, HistogramExport, PRODUCER_NAME};
pub use histogram::{BinGeometry, Histogram, HistogramAccumulator};
pub use parallel::{scan_each, scan_parallel, scan_streams};
pub use policy::CoincidencePolicy;
pub use scanner::{
    scan, scan_anchor_range, scan_differences, BinningType, ScanOutcome, ScanReport, ScanSettings,
};
pub use summary::{summarize_histogram, summarize_stream, HistogramSummary, StreamSummary};
