//! Event file loading.
//!
//! Two formats are understood:
//! - plain text, one event per line: `time [channel]`, separated by
//!   whitespace or commas, with `#` comments
//! - JSON, an array of `{ "time": .., "channel": .. }` objects
//!
//! Loaded streams are always returned sorted by time.

use crate::events::types::{Event, EventStream};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading event files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid time scale {0}: must be finite and positive")]
    InvalidTimeScale(f64),
}

/// On-disk format of an event file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    Text,
    Json,
}

impl EventFormat {
    /// Pick a format from the file extension.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => EventFormat::Json,
            _ => EventFormat::Text,
        }
    }
}

/// Options applied while loading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Multiplier converting raw file times into nanoseconds
    pub time_scale: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl LoadOptions {
    fn validate(&self) -> Result<(), LoadError> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(LoadError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Load an event file, detecting its format from the extension.
pub fn load_events(path: &Path, options: &LoadOptions) -> Result<EventStream, LoadError> {
    let content = std::fs::read_to_string(path)?;
    let stream = match EventFormat::detect(path) {
        EventFormat::Text => parse_text(&content, options)?,
        EventFormat::Json => parse_json(&content, options)?,
    };
    tracing::debug!(path = %path.display(), events = stream.len(), "loaded event file");
    Ok(stream)
}

/// Parse the plain text format.
pub fn parse_text(content: &str, options: &LoadOptions) -> Result<EventStream, LoadError> {
    options.validate()?;

    let mut events = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let data = raw.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }

        let mut fields = data
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());

        let time_field = fields.next().ok_or_else(|| LoadError::Parse {
            line,
            message: "missing time".to_string(),
        })?;
        let time: f64 = time_field.parse().map_err(|_| LoadError::Parse {
            line,
            message: format!("invalid time '{time_field}'"),
        })?;

        let channel = match fields.next() {
            Some(field) => Some(field.parse::<u32>().map_err(|_| LoadError::Parse {
                line,
                message: format!("invalid channel '{field}'"),
            })?),
            None => None,
        };

        if fields.next().is_some() {
            return Err(LoadError::Parse {
                line,
                message: "expected at most two columns".to_string(),
            });
        }

        events.push(scaled_event(time, channel, options, line)?);
    }

    Ok(finish(events))
}

/// Parse the JSON format.
pub fn parse_json(content: &str, options: &LoadOptions) -> Result<EventStream, LoadError> {
    options.validate()?;

    let raw: Vec<Event> = serde_json::from_str(content)?;
    let events = raw
        .into_iter()
        .enumerate()
        .map(|(i, e)| scaled_event(e.time, e.channel, options, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(finish(events))
}

fn scaled_event(
    time: f64,
    channel: Option<u32>,
    options: &LoadOptions,
    line: usize,
) -> Result<Event, LoadError> {
    let time = time * options.time_scale;
    if !time.is_finite() || time < 0.0 {
        return Err(LoadError::Parse {
            line,
            message: format!("time {time} must be finite and non-negative"),
        });
    }
    Ok(Event { time, channel })
}

/// Sort if needed and build the stream.
fn finish(mut events: Vec<Event>) -> EventStream {
    if events.windows(2).any(|pair| pair[0].time > pair[1].time) {
        tracing::warn!(events = events.len(), "event times out of order, sorting");
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
    EventStream::from_events(&events)
}
