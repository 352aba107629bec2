use log::debug;

use crate::spectrum::{validate_points, IndexedPoint, Point, Spectrum};
use crate::tolerance::MzTolerance;

use super::config::{CenterFunction, MergeConfig, MergingType};
use super::error::MergeError;
use super::range_map::ClusterMap;
use super::stats::MergeStats;

/// Parallel arrays of merged m/z and intensity values, in ascending m/z order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedPoints {
    /// Merged m/z values
    pub mzs: Vec<f64>,
    /// Merged intensities
    pub intensities: Vec<f64>,
}

impl MergedPoints {
    /// Number of consensus clusters
    pub fn len(&self) -> usize {
        self.mzs.len()
    }

    /// True if no cluster was produced
    pub fn is_empty(&self) -> bool {
        self.mzs.is_empty()
    }

    /// Convert into a list of points
    pub fn into_points(self) -> Vec<Point> {
        self.mzs
            .into_iter()
            .zip(self.intensities)
            .map(|(mz, intensity)| Point::new(mz, intensity))
            .collect()
    }
}

/// Merge the signals of several spectra into one consensus point list.
///
/// Signals at or below `noise_level` are dropped. The remaining signals are
/// grouped by m/z tolerance, most intense first, such that no cluster ever
/// holds two signals of the same source spectrum. Each cluster yields one
/// point: m/z from `center`, intensity from `merging_type`.
pub fn calculate_merged_mzs_and_intensities<S: AsRef<[Point]>>(
    sources: &[S],
    noise_level: f64,
    tolerance: &MzTolerance,
    merging_type: MergingType,
    center: &CenterFunction,
) -> Result<MergedPoints, MergeError> {
    let (merged, _) = merge_with_stats(sources, noise_level, tolerance, merging_type, center)?;
    Ok(merged)
}

/// Merge source spectra into one consensus [`Spectrum`].
///
/// The result is an MS1-level spectrum without metadata; callers copy over
/// whatever acquisition metadata applies to the merged event.
pub fn merge_spectra(
    sources: &[Spectrum],
    noise_level: f64,
    tolerance: &MzTolerance,
    merging_type: MergingType,
    center: &CenterFunction,
) -> Result<Spectrum, MergeError> {
    let point_lists: Vec<&[Point]> = sources.iter().map(|s| s.points.as_slice()).collect();
    let merged =
        calculate_merged_mzs_and_intensities(&point_lists, noise_level, tolerance, merging_type, center)?;
    Ok(Spectrum::new(merged.into_points()))
}

pub(super) fn merge_with_stats<S: AsRef<[Point]>>(
    sources: &[S],
    noise_level: f64,
    tolerance: &MzTolerance,
    merging_type: MergingType,
    center: &CenterFunction,
) -> Result<(MergedPoints, MergeStats), MergeError> {
    tolerance.validate()?;
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(MergeError::InvalidNoiseLevel(noise_level));
    }

    let mut stats = MergeStats {
        source_spectra: sources.len(),
        ..Default::default()
    };

    let mut points: Vec<IndexedPoint> = Vec::new();
    for (source_index, source) in sources.iter().enumerate() {
        let source = source.as_ref();
        validate_points(source).map_err(|error| MergeError::InvalidInput {
            source_index,
            error,
        })?;
        stats.input_points += source.len();
        points.extend(
            source
                .iter()
                .filter(|p| p.intensity > noise_level)
                .map(|&p| IndexedPoint::new(p, source_index)),
        );
    }
    stats.points_above_noise = points.len();

    // stable: equal intensities keep source order
    points.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));

    let mut map = ClusterMap::new();
    for point in points {
        map.insert(point, tolerance);
    }
    stats.detached_clusters = map.detached_count();

    // routed members never leave their range, so range order is m/z order;
    // detached clusters are placed at their m/z
    let mut consensus: Vec<Point> = map
        .into_clusters()
        .iter()
        .map(|cluster| {
            let mzs: Vec<f64> = cluster.members.values().map(|p| p.mz).collect();
            let intensities: Vec<f64> = cluster.members.values().map(|p| p.intensity).collect();
            Point::new(
                center.calc_center(&mzs, &intensities),
                merging_type.aggregate(&intensities),
            )
        })
        .collect();
    consensus.sort_by(|a, b| a.mz.total_cmp(&b.mz).then(a.intensity.total_cmp(&b.intensity)));

    let merged = MergedPoints {
        mzs: consensus.iter().map(|p| p.mz).collect(),
        intensities: consensus.iter().map(|p| p.intensity).collect(),
    };
    stats.clusters = merged.len();

    debug!("{}", stats);
    Ok((merged, stats))
}

/// Consensus merger bound to one [`MergeConfig`]
#[derive(Debug, Clone)]
pub struct SpectraMerger {
    config: MergeConfig,
}

impl SpectraMerger {
    /// Create a merger, validating the configuration
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge spectra with the configured settings
    pub fn merge(&self, sources: &[Spectrum]) -> Result<Spectrum, MergeError> {
        self.merge_with_stats(sources).map(|(spectrum, _)| spectrum)
    }

    /// Merge spectra and report what happened
    pub fn merge_with_stats(&self, sources: &[Spectrum]) -> Result<(Spectrum, MergeStats), MergeError> {
        let point_lists: Vec<&[Point]> = sources.iter().map(|s| s.points.as_slice()).collect();
        let (merged, stats) = merge_with_stats(
            &point_lists,
            self.config.noise_level,
            &self.config.tolerance,
            self.config.merging_type,
            &self.config.center_function,
        )?;
        Ok((Spectrum::new(merged.into_points()), stats))
    }
}
