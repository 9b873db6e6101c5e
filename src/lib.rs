//! Rossi-alpha - windowed time-difference histograms for neutron noise analysis.
//!
//! This library turns streams of detection timestamps into histograms of
//! time differences between correlated events, the input to Rossi-alpha
//! decay-constant fits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         rossi-alpha                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │   Loader    │──▶│   Window    │──▶│  Histogram  │        │
//! │  │ (txt/json)  │   │   Scanner   │   │ Accumulator │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                           ▲                  │               │
//! │                    ┌─────────────┐   ┌─────────────┐        │
//! │                    │ Coincidence │   │   Export    │        │
//! │                    │   Policy    │   │ (json/csv)  │        │
//! │                    └─────────────┘   └─────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use rossi_alpha::core::{scan, ScanSettings};
//! use rossi_alpha::events::EventStream;
//!
//! let stream = EventStream::from_times(vec![0.0, 1.0, 2.0, 3.0]);
//! let outcome = scan(&stream, &ScanSettings::new(4.0, 4)).unwrap();
//! assert_eq!(outcome.histogram.counts(), &[3, 2, 1, 0]);
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod events;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use crate::core::{
    scan, scan_differences, scan_parallel, scan_streams, BinGeometry, BinningType,
    CoincidencePolicy, ExportBuilder, Histogram, HistogramExport, ScanOutcome, ScanReport,
    ScanSettings,
};
pub use diagnostics::{RunLog, RunStats, SharedRunLog};
pub use error::ScanError;
pub use events::{load_events, Event, EventStream, LoadError, LoadOptions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reference card for the binning types and coincidence policies.
pub const METHODS_GUIDE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║              ROSSI-ALPHA - BINNING TYPES AND POLICIES            ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  BINNING TYPES (--binning)                                       ║
║    type-i         every event anchors a window [t, t + reset)    ║
║                   windows overlap                                ║
║    type-ii        windows laid end to end; the next anchor is    ║
║                   the first event after the window closes        ║
║    type-iii       consecutive pairs (e0,e1), (e2,e3), ...        ║
║                   an odd trailing event is dropped               ║
║    time-interval  every consecutive interval, N-1 in total       ║
║                                                                  ║
║  COINCIDENCE POLICIES (--policy, type-i and type-ii only)        ║
║    all-pairs                    every pair counts                ║
║    cross-channel                pairs from different channels    ║
║    cross-channel-no-repeat      one partner per channel/window   ║
║    cross-channel-no-repeat-deadtime --delay <ns>                 ║
║                                 no-repeat plus a digital delay   ║
║                                 after every accepted partner     ║
║                                                                  ║
║  Bins are right-closed: (k*w, (k+1)*w], w = reset_time / bins.   ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_guide_contents() {
        assert!(METHODS_GUIDE.contains("BINNING TYPES"));
        assert!(METHODS_GUIDE.contains("cross-channel-no-repeat-deadtime"));
        assert!(METHODS_GUIDE.contains("time-interval"));
    }
}
