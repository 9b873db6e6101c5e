//! Detection event types.
//!
//! Events carry only a timestamp (nanoseconds) and, for multi-detector
//! acquisitions, the channel that produced them.

use serde::{Deserialize, Serialize};

/// A single detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Detection time in nanoseconds
    pub time: f64,
    /// Detector channel, if the acquisition records one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
}

impl Event {
    /// Create an event without channel information.
    pub fn new(time: f64) -> Self {
        Self {
            time,
            channel: None,
        }
    }

    /// Create an event tagged with a detector channel.
    pub fn on_channel(time: f64, channel: u32) -> Self {
        Self {
            time,
            channel: Some(channel),
        }
    }
}

/// An ordered sequence of detections.
///
/// Stored as parallel arrays so the scanner can binary-search the timestamps
/// directly. Times are expected to be non-decreasing; the loader guarantees
/// this and the scanner never re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStream {
    times: Vec<f64>,
    channels: Option<Vec<u32>>,
}

impl EventStream {
    /// Build a stream from raw parts.
    ///
    /// No validation happens here. A channel vector whose length differs from
    /// `times` is accepted and rejected later by the scanner.
    pub fn from_parts(times: Vec<f64>, channels: Option<Vec<u32>>) -> Self {
        Self { times, channels }
    }

    /// Build a stream of untagged timestamps.
    pub fn from_times(times: Vec<f64>) -> Self {
        Self {
            times,
            channels: None,
        }
    }

    /// Build a stream from events.
    ///
    /// Channel data is kept only when every event carries a channel.
    pub fn from_events(events: &[Event]) -> Self {
        let times = events.iter().map(|e| e.time).collect();
        let channels = events.iter().map(|e| e.channel).collect::<Option<Vec<_>>>();
        Self {
            times,
            channels: if events.is_empty() { None } else { channels },
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn channels(&self) -> Option<&[u32]> {
        self.channels.as_deref()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Check whether timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.times.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Get the event at `index`.
    pub fn get(&self, index: usize) -> Option<Event> {
        let time = *self.times.get(index)?;
        let channel = self
            .channels
            .as_ref()
            .and_then(|channels| channels.get(index).copied());
        Some(Event { time, channel })
    }

    /// Iterate over the events in order.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Time between the first and last event.
    pub fn span(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
