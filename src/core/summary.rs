//! Descriptive statistics for histograms and event streams.
//!
//! These are quick-look numbers printed after a run and stored alongside
//! exports; fitting the decay constant is left to downstream tools.

use crate::core::histogram::Histogram;
use crate::events::EventStream;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeSet;

/// Fraction of trailing bins used to estimate the uncorrelated background.
const BACKGROUND_TAIL_FRACTION: f64 = 0.25;

/// Summary of a time-difference histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Total counts
    pub total: u64,
    /// Count-weighted mean of bin centers (ns)
    pub mean_difference: f64,
    /// Count-weighted standard deviation of bin centers (ns)
    pub std_difference: f64,
    /// Index of the fullest bin
    pub peak_bin: usize,
    /// Center of the fullest bin (ns)
    pub peak_center: f64,
    /// Mean count per bin over the trailing quarter of the window
    pub background: f64,
    /// Counts above the flat background
    pub excess: f64,
}

/// Summary of an event stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    /// Number of events
    pub events: usize,
    /// Time from first to last event (ns)
    pub span_ns: f64,
    /// Mean detection rate in counts per second
    pub count_rate_per_s: f64,
    /// Distinct channels seen, if the stream is channel-tagged
    pub channels: Option<usize>,
}

/// Compute summary statistics for a histogram.
pub fn summarize_histogram(histogram: &Histogram) -> HistogramSummary {
    let total = histogram.total();
    if total == 0 {
        return HistogramSummary::default();
    }

    let counts = histogram.counts();
    let centers = histogram.bin_centers();
    let weight = total as f64;

    let mean_difference = counts
        .iter()
        .zip(centers)
        .map(|(&c, &x)| c as f64 * x)
        .sum::<f64>()
        / weight;
    let variance = counts
        .iter()
        .zip(centers)
        .map(|(&c, &x)| c as f64 * (x - mean_difference).powi(2))
        .sum::<f64>()
        / weight;

    // First maximum wins on ties.
    let (peak_bin, _) = counts
        .iter()
        .enumerate()
        .fold((0, 0), |best, (i, &c)| if c > best.1 { (i, c) } else { best });

    let background = tail_background(counts);
    let excess = (weight - background * counts.len() as f64).max(0.0);

    HistogramSummary {
        total,
        mean_difference,
        std_difference: variance.sqrt(),
        peak_bin,
        peak_center: centers[peak_bin],
        background,
        excess,
    }
}

/// Mean count over the trailing bins, where correlated pairs have died out.
fn tail_background(counts: &[u64]) -> f64 {
    let tail_len = ((counts.len() as f64 * BACKGROUND_TAIL_FRACTION).ceil() as usize).max(1);
    let tail: Vec<f64> = counts[counts.len() - tail_len..]
        .iter()
        .map(|&c| c as f64)
        .collect();
    tail.iter().mean()
}

/// Compute summary statistics for an event stream.
pub fn summarize_stream(stream: &EventStream) -> StreamSummary {
    let span_ns = stream.span();
    let count_rate_per_s = if span_ns > 0.0 {
        (stream.len().saturating_sub(1)) as f64 / (span_ns * 1e-9)
    } else {
        0.0
    };
    let channels = stream
        .channels()
        .map(|channels| channels.iter().collect::<BTreeSet<_>>().len());

    StreamSummary {
        events: stream.len(),
        span_ns,
        count_rate_per_s,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::BinGeometry;
    use crate::events::Event;

    #[test]
    fn test_empty_histogram_summary() {
        let hist = Histogram::empty(BinGeometry::new(4.0, 4).unwrap());
        assert_eq!(summarize_histogram(&hist), HistogramSummary::default());
    }

    #[test]
    fn test_histogram_moments() {
        let geometry = BinGeometry::new(4.0, 4).unwrap();
        let hist = Histogram::from_counts(geometry, vec![3, 2, 1, 0]).unwrap();
        let summary = summarize_histogram(&hist);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.peak_bin, 0);
        assert_eq!(summary.peak_center, 0.5);
        // (3*0.5 + 2*1.5 + 1*2.5) / 6
        assert!((summary.mean_difference - 7.0 / 6.0).abs() < 1e-12);
        assert_eq!(summary.background, 0.0);
        assert_eq!(summary.excess, 6.0);
    }

    #[test]
    fn test_flat_histogram_has_no_excess() {
        let geometry = BinGeometry::new(8.0, 8).unwrap();
        let hist = Histogram::from_counts(geometry, vec![5; 8]).unwrap();
        let summary = summarize_histogram(&hist);

        assert!((summary.background - 5.0).abs() < 1e-12);
        assert!(summary.excess.abs() < 1e-9);
    }

    #[test]
    fn test_stream_summary() {
        let events = vec![
            Event::on_channel(0.0, 0),
            Event::on_channel(500.0, 1),
            Event::on_channel(1000.0, 0),
        ];
        let summary = summarize_stream(&EventStream::from_events(&events));

        assert_eq!(summary.events, 3);
        assert_eq!(summary.span_ns, 1000.0);
        assert!((summary.count_rate_per_s - 2.0e6).abs() < 1e-3);
        assert_eq!(summary.channels, Some(2));
    }

    #[test]
    fn test_single_event_stream_rate() {
        let summary = summarize_stream(&EventStream::from_times(vec![42.0]));
        assert_eq!(summary.count_rate_per_s, 0.0);
        assert_eq!(summary.channels, None);
    }
}
