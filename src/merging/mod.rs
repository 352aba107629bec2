//! # Peak Consensus Merger
//!
//! Collapses the signals of many source spectra (for example the mobility
//! sub-scans of one PASEF precursor) into one deduplicated consensus list.
//!
//! ## Algorithm
//!
//! 1. Signals above the noise level are tagged with their source index.
//! 2. They are visited by descending intensity, so the most intense signal of
//!    a neighborhood defines its tolerance window.
//! 3. A disjoint range map routes each signal to a cluster. A new window is
//!    clipped against its neighbors so ranges never overlap. A signal whose
//!    source already contributes to the covering cluster splits that range
//!    instead of joining it: one cluster never holds two signals of the same
//!    source spectrum. Members on the split-off side follow the new range.
//! 4. Each cluster becomes one point (center function for m/z, merging type
//!    for intensity), emitted in ascending range order. Every member lies in
//!    its cluster's range, so this is also ascending m/z order.

mod config;
mod error;
mod merger;
mod pasef;
mod range_map;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{CenterFunction, CenterMeasure, MergeConfig, MergingType, Weighting};
pub use error::MergeError;
pub use merger::{calculate_merged_mzs_and_intensities, merge_spectra, MergedPoints, SpectraMerger};
pub use pasef::{merge_pasef_msms, MergedMsMsSpectrum, MobilityFrame, MobilityScan, PasefMsMsInfo};
pub use stats::MergeStats;
