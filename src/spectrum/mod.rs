//! # Spectrum data model
//!
//! Read-only signal containers shared by the merger and the matcher, plus the
//! numeric contract checks applied at their boundaries.
//!
//! Every m/z and intensity handed to this crate must be finite, and
//! intensities must not be negative. Violations are rejected with a
//! [`SpectrumError`] and never coerced.

mod error;
mod types;


pub use error::SpectrumError;
pub use types::{IndexedPoint, Point, Spectrum, SpectrumBuilder};

/// Check that every point is finite with a non-negative intensity
pub fn validate_points(points: &[Point]) -> Result<(), SpectrumError> {
    for (index, p) in points.iter().enumerate() {
        if !p.mz.is_finite() {
            return Err(SpectrumError::NonFiniteValue {
                field: "mz",
                index,
                value: p.mz,
            });
        }
        if !p.intensity.is_finite() {
            return Err(SpectrumError::NonFiniteValue {
                field: "intensity",
                index,
                value: p.intensity,
            });
        }
        if p.intensity < 0.0 {
            return Err(SpectrumError::NegativeIntensity {
                index,
                value: p.intensity,
            });
        }
    }
    Ok(())
}

/// Check that an optional metadata value is finite when present
pub fn validate_metadata(field: &'static str, value: Option<f64>) -> Result<(), SpectrumError> {
    match value {
        Some(value) if !value.is_finite() => Err(SpectrumError::NonFiniteMetadata { field, value }),
        _ => Ok(()),
    }
}

/// Keep only points with an intensity strictly above the noise level
pub fn filter_above_noise(points: &[Point], noise_level: f64) -> Vec<Point> {
    points
        .iter()
        .filter(|p| p.intensity > noise_level)
        .copied()
        .collect()
}

/// Sum of intensities above the noise level
pub fn total_ion_current_above(points: &[Point], noise_level: f64) -> f64 {
    points
        .iter()
        .filter(|p| p.intensity > noise_level)
        .map(|p| p.intensity)
        .sum()
}

/// Sort points by ascending m/z, in place
pub fn sort_by_mz(points: &mut [Point]) {
    points.sort_by(|a, b| a.mz.total_cmp(&b.mz));
}
