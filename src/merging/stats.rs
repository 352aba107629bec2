use std::fmt;

/// Statistics from one merge operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of source spectra
    pub source_spectra: usize,
    /// Total number of input signals
    pub input_points: usize,
    /// Signals above the noise level
    pub points_above_noise: usize,
    /// Consensus clusters produced
    pub clusters: usize,
    /// Clusters that received a single-point range because their window
    /// could not be split further
    pub detached_clusters: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} of {} signals from {} spectra into {} clusters",
            self.points_above_noise, self.input_points, self.source_spectra, self.clusters
        )
    }
}
