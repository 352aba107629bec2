//! # Spectral similarity
//!
//! Signal alignment and the closed set of similarity functions used by the
//! match engine. Every function shares one entry point,
//! [`SimilarityFunction::score`], and is selected through configuration.
//!
//! ## Example
//!
//! ```
//! use mzmatch::similarity::{SimilarityFunction, SpectrumView};
//! use mzmatch::spectrum::Point;
//! use mzmatch::tolerance::MzTolerance;
//!
//! let library = [Point::new(100.0, 10.0), Point::new(200.0, 20.0)];
//! let query = [Point::new(100.001, 12.0), Point::new(200.002, 18.0)];
//! let tolerance = MzTolerance::absolute(0.01).unwrap();
//!
//! let result = SimilarityFunction::default()
//!     .score(SpectrumView::new(&library), SpectrumView::new(&query), &tolerance, 2)
//!     .unwrap();
//! assert_eq!(result.overlap, 2);
//! assert!(result.score > 0.99);
//! ```

mod alignment;
mod functions;
mod types;

#[cfg(test)]
mod tests;

pub use alignment::{align_signals, crop_to_overlap, remove_precursor};
pub use functions::SimilarityFunction;
pub use types::{AlignedPair, SimilarityKind, SimilarityResult, SpectrumView, UnmatchedSignals, WeightsPreset};
