//! Sliding-window scan over sorted detection times.
//!
//! Four binning types select which time differences are produced:
//!
//! - **Type I**: every event anchors its own window; windows overlap.
//! - **Type II**: windows are laid end to end; the next anchor is the first
//!   event after the current window closes.
//! - **Type III**: consecutive events are paired positionally.
//! - **Time interval analysis**: every consecutive interval.
//!
//! Windows are half-open, `[t_anchor, t_anchor + reset_time)`, and located by
//! binary search so each anchor only walks its own window.

use crate::core::histogram::{BinGeometry, Histogram, HistogramAccumulator};
use crate::core::policy::{CoincidencePolicy, DeadtimeCursor, WindowFilter};
use crate::error::{Result, ScanError};
use crate::events::EventStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// How anchors and partners are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningType {
    /// Every event anchors a window; windows overlap
    #[default]
    TypeI,
    /// Non-overlapping windows
    TypeII,
    /// Positional pairs `(e[2k], e[2k+1])`
    TypeIII,
    /// Every consecutive interval
    TimeIntervalAnalysis,
}

impl BinningType {
    pub fn name(&self) -> &'static str {
        match self {
            BinningType::TypeI => "type-i",
            BinningType::TypeII => "type-ii",
            BinningType::TypeIII => "type-iii",
            BinningType::TimeIntervalAnalysis => "time-interval",
        }
    }

    /// Whether the coincidence policy shapes the result.
    ///
    /// Type III and interval analysis pair events purely by position.
    pub fn uses_policy(&self) -> bool {
        matches!(self, BinningType::TypeI | BinningType::TypeII)
    }
}

impl fmt::Display for BinningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinningType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "1" | "i" | "type-i" | "type1" | "type-1" | "overlapping" => Ok(BinningType::TypeI),
            "2" | "ii" | "type-ii" | "type2" | "type-2" | "resetting" => Ok(BinningType::TypeII),
            "3" | "iii" | "type-iii" | "type3" | "type-3" | "paired" | "alternating" => {
                Ok(BinningType::TypeIII)
            }
            "tia" | "time-interval" | "time-interval-analysis" => {
                Ok(BinningType::TimeIntervalAnalysis)
            }
            _ => Err(format!("unknown binning type '{s}'")),
        }
    }
}

/// Everything a scan needs besides the events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Coincidence window length in nanoseconds
    pub reset_time: f64,
    /// Number of histogram bins over the window
    pub num_bins: usize,
    /// Anchor/partner selection scheme
    pub binning: BinningType,
    /// Channel selection rule
    pub policy: CoincidencePolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            reset_time: 1000.0,
            num_bins: 100,
            binning: BinningType::TypeI,
            policy: CoincidencePolicy::AllPairs,
        }
    }
}

impl ScanSettings {
    pub fn new(reset_time: f64, num_bins: usize) -> Self {
        Self {
            reset_time,
            num_bins,
            ..Self::default()
        }
    }

    pub fn with_binning(mut self, binning: BinningType) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_policy(mut self, policy: CoincidencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Histogram geometry for these settings.
    pub fn geometry(&self) -> Result<BinGeometry> {
        BinGeometry::new(self.reset_time, self.num_bins)
    }

    /// Check settings against a stream before scanning.
    ///
    /// Configuration errors are reported before input errors.
    pub fn validate(&self, stream: &EventStream) -> Result<BinGeometry> {
        let geometry = self.geometry()?;
        self.policy.validate()?;

        if stream.is_empty() {
            return Err(ScanError::EmptyStream);
        }

        if self.policy.requires_channels() {
            match stream.channels() {
                None => return Err(ScanError::MissingChannels(self.policy.name())),
                Some(channels) if channels.len() != stream.len() => {
                    return Err(ScanError::ChannelLengthMismatch {
                        events: stream.len(),
                        channels: channels.len(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(geometry)
    }
}

/// Diagnostics gathered during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Windows opened (pairs or intervals for positional binning)
    pub anchors: u64,
    /// Anchors suppressed by dead time
    pub anchors_skipped: u64,
    /// Anchors or pairs skipped because time stepped backwards
    pub time_jumps: u64,
    /// Anchors whose next event lies beyond the window
    pub empty_windows: u64,
    /// Accepted time differences
    pub differences: u64,
    /// Accepted differences that fell outside the histogram range
    pub dropped: u64,
}

impl ScanReport {
    /// Add another report's counters to this one.
    pub fn absorb(&mut self, other: &ScanReport) {
        self.anchors += other.anchors;
        self.anchors_skipped += other.anchors_skipped;
        self.time_jumps += other.time_jumps;
        self.empty_windows += other.empty_windows;
        self.differences += other.differences;
        self.dropped += other.dropped;
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub histogram: Histogram,
    pub report: ScanReport,
}

impl ScanOutcome {
    /// Combine two outcomes over the same geometry.
    pub fn merge(&self, other: &ScanOutcome) -> Result<ScanOutcome> {
        let histogram = self.histogram.merge(&other.histogram)?;
        let mut report = self.report;
        report.absorb(&other.report);
        Ok(ScanOutcome { histogram, report })
    }
}

/// Scan a stream into a histogram.
pub fn scan(stream: &EventStream, settings: &ScanSettings) -> Result<ScanOutcome> {
    let geometry = settings.validate(stream)?;
    let outcome = accumulate(stream, settings, geometry, 0..stream.len());
    tracing::debug!(
        events = stream.len(),
        binning = %settings.binning,
        policy = %settings.policy,
        anchors = outcome.report.anchors,
        differences = outcome.report.differences,
        time_jumps = outcome.report.time_jumps,
        empty_windows = outcome.report.empty_windows,
        dropped = outcome.report.dropped,
        "scan complete"
    );
    Ok(outcome)
}

/// Scan only the anchors in `anchors` (Type I only).
///
/// Windows may extend past the end of the range. Summing the outcomes of a
/// partition of `0..len` reproduces [`scan`] for order-independent policies.
pub fn scan_anchor_range(
    stream: &EventStream,
    settings: &ScanSettings,
    anchors: Range<usize>,
) -> Result<ScanOutcome> {
    let geometry = settings.validate(stream)?;
    if settings.binning != BinningType::TypeI {
        return Err(ScanError::AnchorRangeUnsupported);
    }
    if anchors.start > anchors.end || anchors.end > stream.len() {
        return Err(ScanError::InvalidAnchorRange {
            start: anchors.start,
            end: anchors.end,
            len: stream.len(),
        });
    }
    Ok(accumulate(stream, settings, geometry, anchors))
}

/// Collect the accepted time differences without binning them.
pub fn scan_differences(stream: &EventStream, settings: &ScanSettings) -> Result<Vec<f64>> {
    settings.validate(stream)?;
    let mut differences = Vec::new();
    let mut scanner = WindowScanner::new(stream, settings);
    scanner.run(0..stream.len(), |diff| differences.push(diff));
    Ok(differences)
}

fn accumulate(
    stream: &EventStream,
    settings: &ScanSettings,
    geometry: BinGeometry,
    anchors: Range<usize>,
) -> ScanOutcome {
    let mut accumulator = HistogramAccumulator::new(geometry);
    let mut scanner = WindowScanner::new(stream, settings);
    scanner.run(anchors, |diff| {
        accumulator.record(diff);
    });

    let mut report = scanner.report;
    report.dropped = accumulator.dropped();
    ScanOutcome {
        histogram: accumulator.finish(),
        report,
    }
}

/// Scan state threaded through one pass.
struct WindowScanner<'a> {
    times: &'a [f64],
    reset_time: f64,
    binning: BinningType,
    filter: WindowFilter<'a>,
    deadtime: Option<DeadtimeCursor>,
    report: ScanReport,
}

impl<'a> WindowScanner<'a> {
    fn new(stream: &'a EventStream, settings: &ScanSettings) -> Self {
        Self {
            times: stream.times(),
            reset_time: settings.reset_time,
            binning: settings.binning,
            filter: WindowFilter::new(settings.policy, stream.channels()),
            deadtime: settings.policy.delay().map(DeadtimeCursor::new),
            report: ScanReport::default(),
        }
    }

    fn run<F: FnMut(f64)>(&mut self, anchors: Range<usize>, mut emit: F) {
        match self.binning {
            BinningType::TypeI => self.overlapping(anchors, &mut emit),
            BinningType::TypeII => self.resetting(&mut emit),
            BinningType::TypeIII => self.paired(&mut emit),
            BinningType::TimeIntervalAnalysis => self.intervals(&mut emit),
        }
    }

    fn overlapping<F: FnMut(f64)>(&mut self, anchors: Range<usize>, emit: &mut F) {
        for anchor in anchors {
            if self.anchor_is_dead(anchor) {
                self.report.anchors_skipped += 1;
                continue;
            }
            if self.steps_backwards(anchor) {
                continue;
            }
            let end = self.window_end(anchor);
            self.scan_window(anchor, end, emit);
        }
    }

    fn resetting<F: FnMut(f64)>(&mut self, emit: &mut F) {
        let mut anchor = 0;
        while anchor < self.times.len() {
            if self.anchor_is_dead(anchor) {
                self.report.anchors_skipped += 1;
                anchor += 1;
                continue;
            }
            if self.steps_backwards(anchor) {
                anchor += 1;
                continue;
            }
            let end = self.window_end(anchor);
            self.scan_window(anchor, end, emit);
            anchor = end;
        }
    }

    fn paired<F: FnMut(f64)>(&mut self, emit: &mut F) {
        for pair in self.times.chunks_exact(2) {
            self.report.anchors += 1;
            self.emit_positional(pair[0], pair[1], emit);
        }
    }

    fn intervals<F: FnMut(f64)>(&mut self, emit: &mut F) {
        for pair in self.times.windows(2) {
            self.report.anchors += 1;
            self.emit_positional(pair[0], pair[1], emit);
        }
    }

    fn emit_positional<F: FnMut(f64)>(&mut self, first: f64, second: f64, emit: &mut F) {
        let diff = second - first;
        if diff < 0.0 {
            tracing::trace!(first, second, "time went backwards, skipping pair");
            self.report.time_jumps += 1;
            return;
        }
        self.report.differences += 1;
        emit(diff);
    }

    /// Walk the partners of `anchor` up to (excluding) `end`.
    fn scan_window<F: FnMut(f64)>(&mut self, anchor: usize, end: usize, emit: &mut F) {
        self.report.anchors += 1;
        self.filter.begin_window();

        let anchor_time = self.times[anchor];
        let mut partner = anchor + 1;
        while partner < end {
            let partner_time = self.times[partner];
            if let Some(cursor) = self.deadtime.as_ref() {
                if cursor.is_dead(partner, partner_time) {
                    partner += 1;
                    continue;
                }
            }

            if self.filter.accepts(anchor, partner) {
                self.report.differences += 1;
                emit(partner_time - anchor_time);

                if let Some(cursor) = self.deadtime.as_mut() {
                    cursor.record_hit(partner, partner_time);
                    partner = cursor.skip_past(self.times, partner, end);
                    continue;
                }
            }
            partner += 1;
        }
    }

    /// First index whose time is at least `reset_time` past the anchor.
    fn window_end(&self, anchor: usize) -> usize {
        let anchor_time = self.times[anchor];
        let start = anchor + 1;
        start + self.times[start..].partition_point(|&t| t - anchor_time < self.reset_time)
    }

    /// Check the step from `anchor` to its successor.
    ///
    /// A backwards step breaks ordering: the anchor is skipped and counted as
    /// a time jump. A forward gap past the window still opens an (empty)
    /// window and is counted separately.
    fn steps_backwards(&mut self, anchor: usize) -> bool {
        let Some(&next) = self.times.get(anchor + 1) else {
            return false;
        };
        let gap = next - self.times[anchor];
        if gap < 0.0 {
            tracing::trace!(anchor, gap, "time went backwards, skipping anchor");
            self.report.time_jumps += 1;
            return true;
        }
        if gap >= self.reset_time {
            self.report.empty_windows += 1;
        }
        false
    }

    fn anchor_is_dead(&mut self, anchor: usize) -> bool {
        match self.deadtime.as_mut() {
            Some(cursor) => {
                cursor.retire_before(anchor);
                cursor.is_dead(anchor, self.times[anchor])
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;

    fn tagged(events: &[(f64, u32)]) -> EventStream {
        let events: Vec<Event> = events
            .iter()
            .map(|&(t, ch)| Event::on_channel(t, ch))
            .collect();
        EventStream::from_events(&events)
    }

    #[test]
    fn test_type_i_reference_counts() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 2.0, 3.0]);
        let outcome = scan(&stream, &ScanSettings::new(4.0, 4)).unwrap();

        assert_eq!(outcome.histogram.counts(), &[3, 2, 1, 0]);
        assert_eq!(outcome.report.differences, 6);
        assert_eq!(outcome.report.anchors, 4);
    }

    #[test]
    fn test_window_upper_bound_excluded() {
        let stream = EventStream::from_times(vec![0.0, 2.0, 4.0]);
        let diffs = scan_differences(&stream, &ScanSettings::new(4.0, 4)).unwrap();
        assert_eq!(diffs, vec![2.0, 2.0]);
    }

    #[test]
    fn test_type_ii_advances_past_window() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 2.0, 5.0, 6.0, 9.0]);
        let settings = ScanSettings::new(4.0, 4).with_binning(BinningType::TypeII);
        let diffs = scan_differences(&stream, &settings).unwrap();

        // Windows anchored at 0 and 5; 9 opens a final empty window.
        assert_eq!(diffs, vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_type_iii_drops_trailing_event() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 3.0, 7.0, 8.0]);
        let settings = ScanSettings::new(10.0, 10).with_binning(BinningType::TypeIII);
        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![1.0, 4.0]);
    }

    #[test]
    fn test_time_interval_analysis_ignores_reset_time() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 30.0, 31.0]);
        let settings = ScanSettings::new(5.0, 5).with_binning(BinningType::TimeIntervalAnalysis);

        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![1.0, 29.0, 1.0]);

        let outcome = scan(&stream, &settings).unwrap();
        assert_eq!(outcome.histogram.total(), 2);
        assert_eq!(outcome.report.dropped, 1);
    }

    #[test]
    fn test_cross_channel_excludes_same_channel() {
        let stream = tagged(&[(0.0, 1), (1.0, 1), (2.0, 2)]);
        let settings = ScanSettings::new(10.0, 10).with_policy(CoincidencePolicy::CrossChannel);
        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![2.0, 1.0]);
    }

    #[test]
    fn test_no_repeat_first_window() {
        let stream = tagged(&[(0.0, 1), (2.0, 2), (3.0, 2), (9.0, 1)]);
        let settings = ScanSettings::new(10.0, 10)
            .with_binning(BinningType::TypeII)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeat);

        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![2.0]);
    }

    #[test]
    fn test_no_repeat_type_i_all_anchors() {
        let stream = tagged(&[(0.0, 1), (2.0, 2), (3.0, 2), (9.0, 1)]);
        let settings =
            ScanSettings::new(10.0, 10).with_policy(CoincidencePolicy::CrossChannelNoRepeat);

        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![2.0, 7.0, 6.0]);
    }

    #[test]
    fn test_deadtime_skips_partners_within_delay() {
        // The hit at t=1 opens a 5 ns delay that hides the event at t=3.
        let stream = tagged(&[(0.0, 1), (1.0, 2), (3.0, 3), (8.0, 3)]);
        let settings = ScanSettings::new(20.0, 20)
            .with_binning(BinningType::TypeII)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 5.0 });

        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![1.0, 8.0]);
    }

    #[test]
    fn test_deadtime_suppresses_anchors() {
        let stream = tagged(&[(0.0, 1), (1.0, 2), (2.0, 2), (10.0, 2)]);
        let settings = ScanSettings::new(5.0, 5)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 3.0 });

        let outcome = scan(&stream, &settings).unwrap();
        // Anchor 0 accepts the hit at 1; the event at 2 is dead.
        assert_eq!(outcome.report.anchors_skipped, 1);
        assert_eq!(outcome.report.differences, 1);
    }

    #[test]
    fn test_deadtime_applies_across_channels() {
        let stream = tagged(&[(0.0, 1), (1.0, 2), (2.0, 3), (10.0, 1)]);
        let settings = ScanSettings::new(20.0, 20)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 5.0 });

        // The event at 2 follows the hit at 1 on another channel: it neither
        // anchors nor pairs with the anchor at 1.
        let diffs = scan_differences(&stream, &settings).unwrap();
        assert_eq!(diffs, vec![1.0, 9.0]);

        let outcome = scan(&stream, &settings).unwrap();
        assert_eq!(outcome.report.anchors_skipped, 1);
        assert_eq!(outcome.report.anchors, 3);
    }

    #[test]
    fn test_deadtime_suppresses_type_ii_anchors() {
        let stream = tagged(&[(0.0, 1), (1.0, 2), (2.0, 3), (2.5, 1), (30.0, 1), (31.0, 2)]);
        let settings = ScanSettings::new(1.5, 3)
            .with_binning(BinningType::TypeII)
            .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: 2.0 });

        // Events at 2 and 2.5 would open the next window but are dead after
        // the hit at 1.
        let outcome = scan(&stream, &settings).unwrap();
        assert_eq!(outcome.report.anchors_skipped, 2);
        assert_eq!(outcome.report.anchors, 2);
        assert_eq!(outcome.report.differences, 2);
        assert_eq!(
            scan_differences(&stream, &settings).unwrap(),
            vec![1.0, 1.0]
        );
    }

    #[test]
    fn test_gap_past_window_opens_empty_window() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 1000.0, 1001.0]);
        let outcome = scan(&stream, &ScanSettings::new(10.0, 10)).unwrap();

        assert_eq!(outcome.report.time_jumps, 0);
        assert_eq!(outcome.report.empty_windows, 1);
        assert_eq!(outcome.report.anchors, 4);
        assert_eq!(outcome.histogram.total(), 2);
    }

    #[test]
    fn test_sparse_stream_is_not_anomalous() {
        let times: Vec<f64> = (0..1000).map(|i| i as f64 * 100.0).collect();
        let stream = EventStream::from_times(times);
        let outcome = scan(&stream, &ScanSettings::new(50.0, 10)).unwrap();

        assert_eq!(outcome.report.anchors, 1000);
        assert_eq!(outcome.report.time_jumps, 0);
        assert_eq!(outcome.report.empty_windows, 999);
        assert_eq!(outcome.histogram.total(), 0);
    }

    #[test]
    fn test_type_i_backwards_step_skips_anchor() {
        let stream = EventStream::from_parts(vec![0.0, 5.0, 4.0, 6.0], None);
        let outcome = scan(&stream, &ScanSettings::new(10.0, 10)).unwrap();

        assert_eq!(outcome.report.time_jumps, 1);
        assert_eq!(outcome.report.anchors, 3);
        assert_eq!(outcome.report.differences, 4);
    }

    #[test]
    fn test_single_event_positional_scans() {
        let stream = EventStream::from_times(vec![42.0]);
        for binning in [BinningType::TypeIII, BinningType::TimeIntervalAnalysis] {
            let settings = ScanSettings::new(10.0, 10).with_binning(binning);
            assert!(scan_differences(&stream, &settings).unwrap().is_empty());

            let outcome = scan(&stream, &settings).unwrap();
            assert_eq!(outcome.histogram.total(), 0);
            assert_eq!(outcome.report.anchors, 0);
        }
    }

    #[test]
    fn test_backwards_step_is_recovered() {
        let stream = EventStream::from_times(vec![0.0, 5.0, 4.0, 6.0]);
        let settings = ScanSettings::new(10.0, 10).with_binning(BinningType::TimeIntervalAnalysis);
        let outcome = scan(&stream, &settings).unwrap();

        assert_eq!(outcome.report.time_jumps, 1);
        assert_eq!(outcome.report.differences, 2);
    }

    #[test]
    fn test_validation_errors() {
        let stream = EventStream::from_times(vec![0.0, 1.0]);

        assert_eq!(
            scan(&EventStream::default(), &ScanSettings::new(4.0, 4)),
            Err(ScanError::EmptyStream)
        );
        assert_eq!(
            scan(&stream, &ScanSettings::new(0.0, 4)),
            Err(ScanError::InvalidResetTime(0.0))
        );
        assert_eq!(
            scan(&stream, &ScanSettings::new(4.0, 0)),
            Err(ScanError::InvalidBinCount)
        );
        assert_eq!(
            scan(
                &stream,
                &ScanSettings::new(4.0, 4).with_policy(CoincidencePolicy::CrossChannel)
            ),
            Err(ScanError::MissingChannels("cross-channel"))
        );
        assert_eq!(
            scan(
                &stream,
                &ScanSettings::new(4.0, 4)
                    .with_policy(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay: -1.0 })
            ),
            Err(ScanError::InvalidDelay(-1.0))
        );
    }

    #[test]
    fn test_channel_length_mismatch() {
        let stream = EventStream::from_parts(vec![0.0, 1.0, 2.0], Some(vec![1, 2]));
        let settings = ScanSettings::new(4.0, 4).with_policy(CoincidencePolicy::CrossChannel);
        assert_eq!(
            scan(&stream, &settings),
            Err(ScanError::ChannelLengthMismatch {
                events: 3,
                channels: 2
            })
        );
    }

    #[test]
    fn test_anchor_range_checks() {
        let stream = EventStream::from_times(vec![0.0, 1.0, 2.0]);
        let settings = ScanSettings::new(4.0, 4);

        assert!(matches!(
            scan_anchor_range(&stream, &settings, 1..5),
            Err(ScanError::InvalidAnchorRange { .. })
        ));
        assert_eq!(
            scan_anchor_range(
                &stream,
                &settings.with_binning(BinningType::TypeII),
                0..1
            ),
            Err(ScanError::AnchorRangeUnsupported)
        );
    }

    #[test]
    fn test_binning_type_parsing() {
        assert_eq!("I".parse::<BinningType>(), Ok(BinningType::TypeI));
        assert_eq!("type_ii".parse::<BinningType>(), Ok(BinningType::TypeII));
        assert_eq!("3".parse::<BinningType>(), Ok(BinningType::TypeIII));
        assert_eq!(
            "TIA".parse::<BinningType>(),
            Ok(BinningType::TimeIntervalAnalysis)
        );
        assert!("type-iv".parse::<BinningType>().is_err());
    }
}
