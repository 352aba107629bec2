//! # Isotopes
//!
//! Two small pieces of isotope handling used by the match engine:
//! corroborating a match by isotope spacings among its aligned library
//! signals, and stripping 13C isotope signals before comparison.

mod deisotoper;
mod pattern;


pub use deisotoper::{filter_isotopes, DeisotoperConfig, C13_DELTA};
pub use pattern::{check_for_isotope_pattern, DELTA_ISOTOPES};
