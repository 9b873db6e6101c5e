//! Coincidence policies: which partner events count against an anchor.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Selection rule applied to each candidate partner inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CoincidencePolicy {
    /// Every pair counts.
    #[default]
    AllPairs,
    /// Only pairs from different channels.
    CrossChannel,
    /// Cross-channel, at most one partner per channel in each window.
    CrossChannelNoRepeat,
    /// As `CrossChannelNoRepeat`, with a digital delay (ns) applied after each
    /// accepted partner.
    CrossChannelNoRepeatDeadtime { delay: f64 },
}

impl CoincidencePolicy {
    /// Stable identifier used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            CoincidencePolicy::AllPairs => "all-pairs",
            CoincidencePolicy::CrossChannel => "cross-channel",
            CoincidencePolicy::CrossChannelNoRepeat => "cross-channel-no-repeat",
            CoincidencePolicy::CrossChannelNoRepeatDeadtime { .. } => {
                "cross-channel-no-repeat-deadtime"
            }
        }
    }

    /// Whether every event must carry a channel.
    pub fn requires_channels(&self) -> bool {
        !matches!(self, CoincidencePolicy::AllPairs)
    }

    /// Whether anchors can be processed in any order with the same result.
    ///
    /// Only these policies may be split across anchor ranges.
    pub fn is_order_independent(&self) -> bool {
        matches!(
            self,
            CoincidencePolicy::AllPairs | CoincidencePolicy::CrossChannel
        )
    }

    /// Dead-time delay, if this policy has one.
    pub fn delay(&self) -> Option<f64> {
        match self {
            CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay } => Some(*delay),
            _ => None,
        }
    }

    /// Build a policy from a name and an optional delay.
    ///
    /// A delay is required for the dead-time policy and refused otherwise.
    pub fn from_parts(name: &str, delay: Option<f64>) -> std::result::Result<Self, String> {
        let key: String = name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        let policy = match key.as_str() {
            "all-pairs" | "all" | "self" => CoincidencePolicy::AllPairs,
            "cross-channel" | "cross" | "all-cross-correlations" => {
                CoincidencePolicy::CrossChannel
            }
            "cross-channel-no-repeat" | "no-repeat" | "all-cross-correlations-no-repeat" => {
                CoincidencePolicy::CrossChannelNoRepeat
            }
            "cross-channel-no-repeat-deadtime"
            | "deadtime"
            | "dead-time"
            | "all-cross-correlations-no-repeat-dead-time" => {
                let delay = delay.ok_or_else(|| {
                    format!("policy '{name}' requires a dead-time delay")
                })?;
                return Ok(CoincidencePolicy::CrossChannelNoRepeatDeadtime { delay });
            }
            _ => return Err(format!("unknown coincidence policy '{name}'")),
        };

        if delay.is_some() {
            return Err(format!("policy '{name}' does not take a delay"));
        }
        Ok(policy)
    }

    /// Check the policy's own parameters.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.delay() {
            if !delay.is_finite() || delay <= 0.0 {
                return Err(ScanError::InvalidDelay(delay));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CoincidencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delay() {
            Some(delay) => write!(f, "{} (delay {delay} ns)", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for CoincidencePolicy {
    type Err = String;

    /// Parses `name` or `name:delay`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, delay)) => {
                let delay: f64 = delay
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid delay '{delay}'"))?;
                Self::from_parts(name, Some(delay))
            }
            None => Self::from_parts(s, None),
        }
    }
}

/// Per-window acceptance state for one scan.
///
/// Holds the channels already accepted against the current anchor; call
/// [`WindowFilter::begin_window`] before each anchor.
pub(crate) struct WindowFilter<'a> {
    policy: CoincidencePolicy,
    channels: Option<&'a [u32]>,
    seen: HashSet<u32>,
}

impl<'a> WindowFilter<'a> {
    pub(crate) fn new(policy: CoincidencePolicy, channels: Option<&'a [u32]>) -> Self {
        Self {
            policy,
            channels,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn begin_window(&mut self) {
        self.seen.clear();
    }

    /// Decide whether `partner` counts against `anchor`.
    ///
    /// Accepting a partner under a no-repeat policy marks its channel as seen.
    pub(crate) fn accepts(&mut self, anchor: usize, partner: usize) -> bool {
        let channels = match (self.policy, self.channels) {
            (CoincidencePolicy::AllPairs, _) => return true,
            (_, Some(channels)) => channels,
            // Validation guarantees channels for every other policy.
            (_, None) => return false,
        };

        let partner_channel = channels[partner];
        if partner_channel == channels[anchor] {
            return false;
        }

        match self.policy {
            CoincidencePolicy::CrossChannel => true,
            _ => self.seen.insert(partner_channel),
        }
    }
}

/// Scan cursor state for the dead-time policy.
///
/// Remembers accepted hits by event index. An event within `delay` of the
/// latest hit before it is dead: it is neither used as an anchor nor accepted
/// as a partner, whatever its channel.
pub(crate) struct DeadtimeCursor {
    delay: f64,
    hits: BTreeMap<usize, f64>,
}

impl DeadtimeCursor {
    pub(crate) fn new(delay: f64) -> Self {
        Self {
            delay,
            hits: BTreeMap::new(),
        }
    }

    pub(crate) fn record_hit(&mut self, index: usize, time: f64) {
        self.hits.insert(index, time);
    }

    /// Whether the event at `index` falls inside the dead time of an earlier hit.
    pub(crate) fn is_dead(&self, index: usize, time: f64) -> bool {
        self.hits
            .range(..index)
            .next_back()
            .is_some_and(|(_, &hit_time)| time - hit_time < self.delay)
    }

    /// Drop hits that can no longer govern any event at or after `index`.
    ///
    /// Anchors only move forward, so only the latest hit before `index` and
    /// the hits after it stay relevant.
    pub(crate) fn retire_before(&mut self, index: usize) {
        let latest = self.hits.range(..index).next_back().map(|(&i, _)| i);
        if let Some(latest) = latest {
            self.hits = self.hits.split_off(&latest);
        }
    }

    /// First index after `hit` whose time is at least `delay` past the hit, capped at `end`.
    pub(crate) fn skip_past(&self, times: &[f64], hit: usize, end: usize) -> usize {
        let hit_time = times[hit];
        let start = hit + 1;
        if start >= end {
            return end;
        }
        start + times[start..end].partition_point(|&t| t - hit_time < self.delay)
    }
}
