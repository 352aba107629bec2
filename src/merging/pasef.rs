//! Merging of PASEF MS/MS events.
//!
//! A PASEF precursor is fragmented across a contiguous block of mobility
//! scans of one frame. The sub-scans are merged into a single MS/MS
//! spectrum that carries the precursor metadata of the event.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::spectrum::{Point, Spectrum};
use crate::tolerance::MzTolerance;

use super::config::{CenterFunction, CenterMeasure, MergingType, Weighting};
use super::error::MergeError;
use super::merger::calculate_merged_mzs_and_intensities;

/// One mobility-resolved sub-scan of a TIMS frame
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityScan {
    /// Mobility scan number within the frame
    pub mobility_scan_number: u32,
    /// Ion mobility (1/K0)
    pub mobility: f64,
    /// Signals of this sub-scan
    pub points: Vec<Point>,
}

/// A TIMS frame with its mobility scans
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityFrame {
    /// Frame number in the run
    pub frame_number: u32,
    /// MS level of the frame
    pub ms_level: u8,
    /// Retention time in minutes
    pub retention_time: Option<f32>,
    /// Mobility scans of the frame
    pub mobility_scans: Vec<MobilityScan>,
}

/// Precursor selection of one PASEF MS/MS event
#[derive(Debug, Clone, PartialEq)]
pub struct PasefMsMsInfo {
    /// Mobility scan numbers the precursor was fragmented in
    pub spectrum_number_range: RangeInclusive<u32>,
    /// Collision energy in eV
    pub collision_energy: Option<f32>,
    /// m/z of the largest peak of the isolated precursor
    pub largest_peak_mz: f64,
    /// Precursor charge, if determined
    pub precursor_charge: Option<i32>,
}

/// MS/MS spectrum merged from mobility scans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedMsMsSpectrum {
    /// Merged signals and precursor metadata
    pub spectrum: Spectrum,
    /// Collision energy of the event
    pub collision_energy: Option<f32>,
    /// Frame the event was acquired in
    pub frame_number: u32,
    /// Mobility scan numbers that contributed
    pub source_scan_numbers: Vec<u32>,
    /// Intensity aggregation used
    pub merging_type: MergingType,
    /// m/z center function used
    pub center_function: CenterFunction,
}

/// Merge the mobility scans of one PASEF MS/MS event.
///
/// Returns `Ok(None)` if no mobility scan of the frame falls into the
/// event's spectrum-number range. The merged spectrum takes its mobility
/// from the contributing scan with the highest mobility.
pub fn merge_pasef_msms(
    info: &PasefMsMsInfo,
    frame: &MobilityFrame,
    noise_level: f64,
    tolerance: &MzTolerance,
    merging_type: MergingType,
) -> Result<Option<MergedMsMsSpectrum>, MergeError> {
    let scans: Vec<&MobilityScan> = frame
        .mobility_scans
        .iter()
        .filter(|s| info.spectrum_number_range.contains(&s.mobility_scan_number))
        .collect();
    if scans.is_empty() {
        return Ok(None);
    }

    let center = CenterFunction::new(CenterMeasure::Avg, Weighting::Linear);
    let point_lists: Vec<&[Point]> = scans.iter().map(|s| s.points.as_slice()).collect();
    let merged =
        calculate_merged_mzs_and_intensities(&point_lists, noise_level, tolerance, merging_type, &center)?;

    let mobility = scans
        .iter()
        .map(|s| s.mobility)
        .filter(|m| m.is_finite())
        .max_by(|a, b| a.total_cmp(b));

    let spectrum = Spectrum {
        points: merged.into_points(),
        ms_level: frame.ms_level,
        retention_time: frame.retention_time,
        precursor_mz: Some(info.largest_peak_mz),
        precursor_charge: info.precursor_charge,
        mobility,
        ccs: None,
    };

    Ok(Some(MergedMsMsSpectrum {
        spectrum,
        collision_energy: info.collision_energy,
        frame_number: frame.frame_number,
        source_scan_numbers: scans.iter().map(|s| s.mobility_scan_number).collect(),
        merging_type,
        center_function: center,
    }))
}
