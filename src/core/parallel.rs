//! Parallel scan drivers.
//!
//! Independent streams always scan in parallel. A single stream is split by
//! anchor range only for Type I with an order-independent policy; every other
//! combination carries scan-order state and runs sequentially.

use crate::core::scanner::{scan, scan_anchor_range, BinningType, ScanOutcome, ScanSettings};
use crate::error::{Result, ScanError};
use crate::events::EventStream;
use rayon::prelude::*;
use std::ops::Range;

/// Split `0..len` into at most `parts` contiguous, non-empty ranges.
pub fn partition_anchors(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, len.max(1));
    let base = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        if size == 0 {
            continue;
        }
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Whether a stream scan with these settings can be split by anchor range.
pub fn can_partition(settings: &ScanSettings) -> bool {
    settings.binning == BinningType::TypeI && settings.policy.is_order_independent()
}

/// Scan one stream, splitting anchors across `partitions` tasks when safe.
///
/// The result is identical to [`scan`].
pub fn scan_parallel(
    stream: &EventStream,
    settings: &ScanSettings,
    partitions: usize,
) -> Result<ScanOutcome> {
    if partitions <= 1 || !can_partition(settings) {
        return scan(stream, settings);
    }
    settings.validate(stream)?;

    let ranges = partition_anchors(stream.len(), partitions);
    tracing::debug!(
        events = stream.len(),
        partitions = ranges.len(),
        "scanning anchor ranges in parallel"
    );

    let partials = ranges
        .into_par_iter()
        .map(|range| scan_anchor_range(stream, settings, range))
        .collect::<Result<Vec<_>>>()?;

    merge_outcomes(partials)
}

/// Scan each stream independently, in parallel, preserving input order.
pub fn scan_each(
    streams: &[EventStream],
    settings: &ScanSettings,
    partitions: usize,
) -> Vec<Result<ScanOutcome>> {
    streams
        .par_iter()
        .map(|stream| scan_parallel(stream, settings, partitions))
        .collect()
}

/// Scan every stream and merge the histograms by elementwise summation.
pub fn scan_streams(
    streams: &[EventStream],
    settings: &ScanSettings,
    partitions: usize,
) -> Result<ScanOutcome> {
    let outcomes = scan_each(streams, settings, partitions)
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
    merge_outcomes(outcomes)
}

/// Sum a set of outcomes over the same geometry.
pub fn merge_outcomes(outcomes: Vec<ScanOutcome>) -> Result<ScanOutcome> {
    let mut iter = outcomes.into_iter();
    let first = iter.next().ok_or(ScanError::NoStreams)?;
    iter.try_fold(first, |acc, next| acc.merge(&next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::CoincidencePolicy;
    use crate::events::Event;

    fn jittered_stream(len: usize) -> EventStream {
        let events: Vec<Event> = (0..len)
            .map(|i| Event::on_channel(i as f64 * 1.7 + (i % 5) as f64 * 0.3, (i % 3) as u32))
            .collect();
        EventStream::from_events(&events)
    }

    #[test]
    fn test_partition_covers_range() {
        let ranges = partition_anchors(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);

        assert_eq!(partition_anchors(2, 8), vec![0..1, 1..2]);
        assert_eq!(partition_anchors(5, 0), vec![0..5]);
        assert!(partition_anchors(0, 4).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let stream = jittered_stream(500);
        for policy in [CoincidencePolicy::AllPairs, CoincidencePolicy::CrossChannel] {
            let settings = ScanSettings::new(20.0, 40).with_policy(policy);
            let sequential = scan(&stream, &settings).unwrap();
            let parallel = scan_parallel(&stream, &settings, 4).unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn test_order_dependent_falls_back() {
        let stream = jittered_stream(200);
        let settings = ScanSettings::new(20.0, 40)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 2.0 });
        assert!(!can_partition(&settings));

        let sequential = scan(&stream, &settings).unwrap();
        let parallel = scan_parallel(&stream, &settings, 8).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_scan_streams_sums_histograms() {
        let a = EventStream::from_times(vec![0.0, 1.0, 2.0, 3.0]);
        let b = EventStream::from_times(vec![10.0, 11.0]);
        let settings = ScanSettings::new(4.0, 4);

        let merged = scan_streams(&[a.clone(), b.clone()], &settings, 1).unwrap();
        assert_eq!(merged.histogram.counts(), &[4, 2, 1, 0]);

        let reversed = scan_streams(&[b, a], &settings, 1).unwrap();
        assert_eq!(reversed.histogram, merged.histogram);
    }

    #[test]
    fn test_scan_streams_propagates_errors() {
        let streams = vec![EventStream::from_times(vec![0.0]), EventStream::default()];
        assert_eq!(
            scan_streams(&streams, &ScanSettings::new(4.0, 4), 1),
            Err(ScanError::EmptyStream)
        );
    }

    #[test]
    fn test_no_streams_is_distinct_error() {
        assert_eq!(
            scan_streams(&[], &ScanSettings::new(4.0, 4), 2),
            Err(ScanError::NoStreams)
        );
        assert_eq!(merge_outcomes(Vec::new()), Err(ScanError::NoStreams));
    }
}
