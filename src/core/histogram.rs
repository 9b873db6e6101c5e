//! Fixed-geometry time-difference histograms.
//!
//! Bin geometry is decided once, when a [`BinGeometry`] is built, and a
//! [`Histogram`] never changes after construction. Merging or re-binning
//! always returns a new histogram.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};

/// Largest bin count a geometry accepts.
pub const MAX_BINS: usize = 1 << 24;

/// Bin layout over `[0, reset_time]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinGeometry {
    reset_time: f64,
    num_bins: usize,
}

impl BinGeometry {
    /// Create a geometry of `num_bins` equal bins spanning `reset_time`.
    pub fn new(reset_time: f64, num_bins: usize) -> Result<Self> {
        if !reset_time.is_finite() || reset_time <= 0.0 {
            return Err(ScanError::InvalidResetTime(reset_time));
        }
        if num_bins == 0 {
            return Err(ScanError::InvalidBinCount);
        }
        if num_bins > MAX_BINS {
            return Err(ScanError::TooManyBins {
                requested: num_bins,
                max: MAX_BINS,
            });
        }
        Ok(Self {
            reset_time,
            num_bins,
        })
    }

    /// Create a geometry from a requested bin width.
    ///
    /// The bin count is rounded to the nearest integer (at least one), and the
    /// effective width is then `reset_time / num_bins`. Counts past [`MAX_BINS`]
    /// are rejected.
    pub fn from_bin_width(reset_time: f64, bin_width: f64) -> Result<Self> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(ScanError::InvalidBinWidth(bin_width));
        }
        if !reset_time.is_finite() || reset_time <= 0.0 {
            return Err(ScanError::InvalidResetTime(reset_time));
        }
        let num_bins = ((reset_time / bin_width).round() as usize).max(1);
        Self::new(reset_time, num_bins)
    }

    pub fn reset_time(&self) -> f64 {
        self.reset_time
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn bin_width(&self) -> f64 {
        self.reset_time / self.num_bins as f64
    }

    /// Bin holding a difference, or `None` outside `[0, reset_time]`.
    ///
    /// Bins are right-closed: bin `k` holds `(k * w, (k + 1) * w]`, and a zero
    /// difference lands in bin 0.
    pub fn bin_index(&self, diff: f64) -> Option<usize> {
        if !(0.0..=self.reset_time).contains(&diff) {
            return None;
        }
        let scaled = (diff / self.bin_width()).ceil() as usize;
        Some(scaled.saturating_sub(1).min(self.num_bins - 1))
    }

    fn check_same(&self, other: &BinGeometry) -> Result<()> {
        if self.num_bins != other.num_bins || self.reset_time != other.reset_time {
            return Err(ScanError::GeometryMismatch(format!(
                "{} bins over {} ns vs {} bins over {} ns",
                self.num_bins, self.reset_time, other.num_bins, other.reset_time
            )));
        }
        Ok(())
    }
}

/// Direct-index accumulator owned by a single scan.
#[derive(Debug, Clone)]
pub struct HistogramAccumulator {
    geometry: BinGeometry,
    counts: Vec<u64>,
    dropped: u64,
}

impl HistogramAccumulator {
    pub fn new(geometry: BinGeometry) -> Self {
        Self {
            geometry,
            counts: vec![0; geometry.num_bins],
            dropped: 0,
        }
    }

    /// Count one difference. Returns false if it fell outside the histogram.
    pub fn record(&mut self, diff: f64) -> bool {
        match self.geometry.bin_index(diff) {
            Some(index) => {
                self.counts[index] += 1;
                true
            }
            None => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Differences rejected as out of range so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn finish(self) -> Histogram {
        Histogram::build(self.geometry, self.counts)
    }
}

/// A finished histogram of time differences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    geometry: BinGeometry,
    counts: Vec<u64>,
    bin_edges: Vec<f64>,
    bin_centers: Vec<f64>,
}

impl Histogram {
    /// Histogram with every bin empty.
    pub fn empty(geometry: BinGeometry) -> Self {
        Self::build(geometry, vec![0; geometry.num_bins])
    }

    /// Wrap existing counts. Their length must match the geometry.
    pub fn from_counts(geometry: BinGeometry, counts: Vec<u64>) -> Result<Self> {
        if counts.len() != geometry.num_bins {
            return Err(ScanError::GeometryMismatch(format!(
                "{} counts for {} bins",
                counts.len(),
                geometry.num_bins
            )));
        }
        Ok(Self::build(geometry, counts))
    }

    fn build(geometry: BinGeometry, counts: Vec<u64>) -> Self {
        let width = geometry.bin_width();
        let bin_edges: Vec<f64> = (0..=geometry.num_bins).map(|k| k as f64 * width).collect();
        let bin_centers = bin_edges[..geometry.num_bins]
            .iter()
            .map(|edge| edge + width / 2.0)
            .collect();
        Self {
            geometry,
            counts,
            bin_edges,
            bin_centers,
        }
    }

    pub fn geometry(&self) -> BinGeometry {
        self.geometry
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    pub fn bin_centers(&self) -> &[f64] {
        &self.bin_centers
    }

    pub fn bin_width(&self) -> f64 {
        self.geometry.bin_width()
    }

    pub fn num_bins(&self) -> usize {
        self.geometry.num_bins
    }

    pub fn reset_time(&self) -> f64 {
        self.geometry.reset_time
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Elementwise sum with another histogram of identical geometry.
    pub fn merge(&self, other: &Histogram) -> Result<Histogram> {
        self.geometry.check_same(&other.geometry)?;
        let counts = self
            .counts
            .iter()
            .zip(&other.counts)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self::build(self.geometry, counts))
    }

    /// Combine every `factor` adjacent bins into one.
    ///
    /// `factor` must divide the bin count.
    pub fn rebin(&self, factor: usize) -> Result<Histogram> {
        let num_bins = self.geometry.num_bins;
        if factor == 0 || num_bins % factor != 0 {
            return Err(ScanError::InvalidRebinFactor { factor, num_bins });
        }
        let geometry = BinGeometry::new(self.geometry.reset_time, num_bins / factor)?;
        let counts = self
            .counts
            .chunks_exact(factor)
            .map(|chunk| chunk.iter().sum())
            .collect();
        Ok(Self::build(geometry, counts))
    }
}
