use serde::{Deserialize, Serialize};

use super::error::SpectrumError;

/// A single centroided signal: mass-to-charge ratio and intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl Point {
    /// Create a new point
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

impl From<(f64, f64)> for Point {
    fn from((mz, intensity): (f64, f64)) -> Self {
        Self { mz, intensity }
    }
}

/// A point tagged with the position of the spectrum it was taken from.
///
/// Only the consensus merger uses this, to keep two signals of the same
/// source spectrum out of one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
    /// Index of the originating source spectrum (0..N-1)
    pub source_index: usize,
}

impl IndexedPoint {
    /// Tag a point with its source index
    pub fn new(point: Point, source_index: usize) -> Self {
        Self {
            mz: point.mz,
            intensity: point.intensity,
            source_index,
        }
    }
}

/// A mass spectrum: signals plus acquisition metadata.
///
/// Points are not required to be sorted by m/z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Signals of this spectrum
    pub points: Vec<Point>,
    /// MS level (1 for precursor scans, 2+ for fragment scans)
    pub ms_level: u8,
    /// Retention time in minutes
    pub retention_time: Option<f32>,
    /// Precursor m/z (MS2+)
    pub precursor_mz: Option<f64>,
    /// Precursor charge state
    pub precursor_charge: Option<i32>,
    /// Ion mobility (1/K0 for TIMS data)
    pub mobility: Option<f64>,
    /// Collision cross-section in square angstrom
    pub ccs: Option<f32>,
}

impl Spectrum {
    /// Create an MS1 spectrum without metadata
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            ms_level: 1,
            retention_time: None,
            precursor_mz: None,
            precursor_charge: None,
            mobility: None,
            ccs: None,
        }
    }

    /// Create a spectrum from parallel m/z and intensity arrays
    pub fn from_arrays(mzs: &[f64], intensities: &[f64]) -> Result<Self, SpectrumError> {
        if mzs.len() != intensities.len() {
            return Err(SpectrumError::LengthMismatch {
                mz_len: mzs.len(),
                intensity_len: intensities.len(),
            });
        }
        let points = mzs
            .iter()
            .zip(intensities)
            .map(|(&mz, &intensity)| Point::new(mz, intensity))
            .collect();
        Ok(Self::new(points))
    }

    /// Number of signals
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the spectrum has no signals
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// m/z values in stored order
    pub fn mzs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mz).collect()
    }

    /// Intensity values in stored order
    pub fn intensities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.intensity).collect()
    }

    /// Sum of all intensities
    pub fn total_ion_current(&self) -> f64 {
        self.points.iter().map(|p| p.intensity).sum()
    }

    /// Most intense signal, if any
    pub fn base_peak(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }

    /// Check that the optional metadata values are finite
    pub fn validate_metadata(&self) -> Result<(), SpectrumError> {
        super::validate_metadata("retention time", self.retention_time.map(f64::from))?;
        super::validate_metadata("precursor m/z", self.precursor_mz)?;
        super::validate_metadata("mobility", self.mobility)?;
        super::validate_metadata("CCS", self.ccs.map(f64::from))
    }

    /// Sort signals by ascending m/z
    pub fn sort_by_mz(&mut self) {
        self.points.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    }

    /// Check the numeric contract of every signal
    pub fn validate(&self) -> Result<(), SpectrumError> {
        super::validate_points(&self.points)
    }
}

/// Builder for [`Spectrum`]
#[derive(Debug, Clone)]
pub struct SpectrumBuilder {
    spectrum: Spectrum,
}

impl SpectrumBuilder {
    /// Start an MS1 spectrum without signals
    pub fn new() -> Self {
        Self {
            spectrum: Spectrum::new(Vec::new()),
        }
    }

    /// Set the MS level (1 for MS1, 2 for MS/MS, etc.)
    pub fn ms_level(mut self, level: u8) -> Self {
        self.spectrum.ms_level = level;
        self
    }

    /// Set the retention time in minutes
    pub fn retention_time(mut self, rt: f32) -> Self {
        self.spectrum.retention_time = Some(rt);
        self
    }

    /// Set precursor m/z and optional charge
    pub fn precursor(mut self, mz: f64, charge: Option<i32>) -> Self {
        self.spectrum.precursor_mz = Some(mz);
        self.spectrum.precursor_charge = charge;
        self
    }

    /// Set the ion mobility
    pub fn mobility(mut self, mobility: f64) -> Self {
        self.spectrum.mobility = Some(mobility);
        self
    }

    /// Set the collision cross-section
    pub fn ccs(mut self, ccs: f32) -> Self {
        self.spectrum.ccs = Some(ccs);
        self
    }

    /// Add a single signal
    pub fn add_point(mut self, mz: f64, intensity: f64) -> Self {
        self.spectrum.points.push(Point::new(mz, intensity));
        self
    }

    /// Add multiple signals
    pub fn add_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.spectrum.points.extend(points);
        self
    }

    /// Build the spectrum
    pub fn build(self) -> Spectrum {
        self.spectrum
    }
}

impl Default for SpectrumBuilder {
    fn default() -> Self {
        Self::new()
    }
}
