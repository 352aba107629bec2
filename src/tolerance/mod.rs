//! # Tolerances
//!
//! m/z, retention time and relative (percent) tolerances used by both the
//! consensus merger and the library matcher, plus [`MzRange`], the interval
//! type the merger partitions the m/z axis with.

mod range;


use serde::{Deserialize, Serialize};

pub use range::{BoundType, MzRange};

/// Invalid tolerance parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// Tolerance is NaN or infinite
    #[error("{name} tolerance must be finite, got {value}")]
    NonFinite {
        /// Which tolerance component was invalid
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// Tolerance is below zero
    #[error("{name} tolerance must not be negative, got {value}")]
    Negative {
        /// Which tolerance component was invalid
        name: &'static str,
        /// The offending value
        value: f64,
    },
}

fn check_component(name: &'static str, value: f64) -> Result<(), ToleranceError> {
    if !value.is_finite() {
        return Err(ToleranceError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ToleranceError::Negative { name, value });
    }
    Ok(())
}

/// Symmetric m/z tolerance: the larger of an absolute and a relative window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzTolerance {
    /// Absolute half-width in Da
    #[serde(default)]
    pub absolute: f64,
    /// Relative half-width in parts per million
    #[serde(default)]
    pub ppm: f64,
}

impl MzTolerance {
    /// Create a tolerance, rejecting negative or non-finite components
    pub fn new(absolute: f64, ppm: f64) -> Result<Self, ToleranceError> {
        let tolerance = Self { absolute, ppm };
        tolerance.validate()?;
        Ok(tolerance)
    }

    /// Absolute-only tolerance
    pub fn absolute(absolute: f64) -> Result<Self, ToleranceError> {
        Self::new(absolute, 0.0)
    }

    /// Check both components
    pub fn validate(&self) -> Result<(), ToleranceError> {
        check_component("absolute m/z", self.absolute)?;
        check_component("ppm", self.ppm)
    }

    /// Half-width of the window around `mz`
    pub fn tolerance_at(&self, mz: f64) -> f64 {
        self.absolute.max(mz.abs() * self.ppm * 1e-6)
    }

    /// Closed window around `mz`
    pub fn tolerance_range(&self, mz: f64) -> MzRange {
        let tol = self.tolerance_at(mz);
        MzRange::closed(mz - tol, mz + tol)
    }

    /// True if `other` lies in the window around `reference`
    pub fn check_within_tolerance(&self, reference: f64, other: f64) -> bool {
        self.tolerance_range(reference).contains(other)
    }
}

impl Default for MzTolerance {
    fn default() -> Self {
        Self {
            absolute: 0.005,
            ppm: 15.0,
        }
    }
}

/// Retention time tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RtTolerance {
    /// Absolute window in minutes
    Absolute(f32),
    /// Relative window in percent of the reference RT
    Relative(f32),
}

impl RtTolerance {
    /// Check the tolerance value
    pub fn validate(&self) -> Result<(), ToleranceError> {
        match *self {
            RtTolerance::Absolute(v) => check_component("absolute RT", v as f64),
            RtTolerance::Relative(v) => check_component("relative RT", v as f64),
        }
    }

    /// True if `other` lies in the window around `reference`
    pub fn check_within_tolerance(&self, reference: f32, other: f32) -> bool {
        let tol = match *self {
            RtTolerance::Absolute(v) => v,
            RtTolerance::Relative(percent) => reference.abs() * percent / 100.0,
        };
        (reference - other).abs() <= tol
    }
}

/// Relative tolerance, expressed as a fraction (0.05 = 5 %)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentTolerance(pub f64);

impl PercentTolerance {
    /// Check the tolerance value
    pub fn validate(&self) -> Result<(), ToleranceError> {
        check_component("percent", self.0)
    }

    /// True if `measured` deviates from `reference` by at most the tolerance.
    ///
    /// Missing values on either side pass.
    pub fn matches(&self, measured: Option<f32>, reference: Option<f32>) -> bool {
        match relative_error(measured, reference) {
            Some(error) => (error.abs() as f64) <= self.0,
            None => match (measured, reference) {
                (Some(m), Some(r)) => m == r,
                _ => true,
            },
        }
    }
}

/// `(measured - reference) / reference`, or `None` if either value is
/// missing or the reference is zero
pub fn relative_error(measured: Option<f32>, reference: Option<f32>) -> Option<f32> {
    match (measured, reference) {
        (Some(m), Some(r)) if r != 0.0 => Some((m - r) / r),
        _ => None,
    }
}
