//! Histogram export records for fitting and plotting tools.
//!
//! A [`HistogramExport`] bundles the counts and bin layout with the settings
//! and diagnostics that produced them, so a downstream fit can be traced back
//! to its inputs.

use crate::core::scanner::{ScanOutcome, ScanReport, ScanSettings};
use crate::core::summary::{summarize_histogram, HistogramSummary};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// The current export format version.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "rossi-alpha";

/// Errors that can occur while writing exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    pub instance_id: String,
    /// Host the analysis ran on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// A histogram ready for external fitting or plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramExport {
    pub format_version: String,
    /// When this export was computed (RFC3339)
    pub computed_at_utc: String,
    pub producer: Producer,
    /// Input files that contributed to the histogram
    pub sources: Vec<String>,
    pub settings: ScanSettings,
    pub bin_width: f64,
    pub counts: Vec<u64>,
    pub bin_edges: Vec<f64>,
    pub bin_centers: Vec<f64>,
    pub report: ScanReport,
    pub summary: HistogramSummary,
}

impl HistogramExport {
    /// Write as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Render the bins as CSV: `bin_left,bin_center,bin_right,count`.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("bin_left,bin_center,bin_right,count\n");
        for (k, count) in self.counts.iter().enumerate() {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{},{},{},{}",
                self.bin_edges[k],
                self.bin_centers[k],
                self.bin_edges[k + 1],
                count
            );
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        ensure_parent(path)?;
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }

    /// Write in the requested format.
    pub fn write(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        match format {
            ExportFormat::Json => self.write_json(path),
            ExportFormat::Csv => self.write_csv(path),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Builder for export records.
pub struct ExportBuilder {
    instance_id: Uuid,
    host: Option<String>,
}

impl ExportBuilder {
    /// Create a new builder with a unique instance ID.
    pub fn new() -> Self {
        let host = hostname::get()
            .ok()
            .map(|name| name.to_string_lossy().into_owned());
        Self {
            instance_id: Uuid::new_v4(),
            host,
        }
    }

    /// Get the instance ID.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Build an export record from a scan outcome.
    pub fn build(
        &self,
        outcome: &ScanOutcome,
        settings: &ScanSettings,
        sources: &[String],
    ) -> HistogramExport {
        let histogram = &outcome.histogram;
        HistogramExport {
            format_version: EXPORT_FORMAT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                instance_id: self.instance_id.to_string(),
                host: self.host.clone(),
            },
            sources: sources.to_vec(),
            settings: *settings,
            bin_width: histogram.bin_width(),
            counts: histogram.counts().to_vec(),
            bin_edges: histogram.bin_edges().to_vec(),
            bin_centers: histogram.bin_centers().to_vec(),
            report: outcome.report,
            summary: summarize_histogram(histogram),
        }
    }
}

impl Default for ExportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::scan;
    use crate::events::EventStream;

    fn sample_export() -> HistogramExport {
        let stream = EventStream::from_times(vec![0.0, 1.0, 2.0, 3.0]);
        let settings = ScanSettings::new(4.0, 4);
        let outcome = scan(&stream, &settings).unwrap();
        ExportBuilder::new().build(&outcome, &settings, &["run1.txt".to_string()])
    }

    #[test]
    fn test_export_contents() {
        let export = sample_export();

        assert_eq!(export.format_version, EXPORT_FORMAT_VERSION);
        assert_eq!(export.producer.name, PRODUCER_NAME);
        assert_eq!(export.counts, vec![3, 2, 1, 0]);
        assert_eq!(export.bin_edges.len(), 5);
        assert_eq!(export.bin_centers.len(), 4);
        assert_eq!(export.summary.total, 6);
        assert_eq!(export.sources, vec!["run1.txt"]);
    }

    #[test]
    fn test_csv_rows() {
        let csv = sample_export().to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "bin_left,bin_center,bin_right,count");
        assert_eq!(lines[1], "0,0.5,1,3");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_write_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("hist.json");
        let export = sample_export();
        export.write(&path, ExportFormat::Json).unwrap();

        let loaded: HistogramExport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.counts, export.counts);
        assert_eq!(loaded.settings, export.settings);
    }

    #[test]
    fn test_instance_ids_unique() {
        assert_ne!(
            ExportBuilder::new().instance_id(),
            ExportBuilder::new().instance_id()
        );
    }
}
