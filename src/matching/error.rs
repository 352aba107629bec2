use crate::spectrum::SpectrumError;
use crate::tolerance::ToleranceError;

/// Invalid match settings. Raised before any comparison starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// MS level must be at least 1
    #[error("Invalid MS level: {0}")]
    InvalidMsLevel(u8),

    /// Precursor filtering at MS level > 1 needs a precursor tolerance
    #[error("MS level {ms_level} requires a precursor m/z tolerance")]
    MissingPrecursorTolerance {
        /// Level the settings were checked for
        ms_level: u8,
    },

    /// A tolerance is negative or not finite
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(#[from] ToleranceError),

    /// The noise level is negative or not finite
    #[error("Invalid noise level: {0}")]
    InvalidNoiseLevel(f64),

    /// At least one aligned signal has to be required
    #[error("Minimum match count must be at least 1")]
    InvalidMinMatch,

    /// Minimum score of the similarity function outside [0, 1]
    #[error("Invalid minimum similarity score: {0}")]
    InvalidMinScore(f64),

    /// Isotope corroboration must require at least one spacing
    #[error("Minimum matched isotope signals must be at least 1")]
    InvalidIsotopeMinimum,

    /// Deisotoping must search at least charge 1
    #[error("Deisotoping maximum charge must be at least 1")]
    InvalidMaximumCharge,

    /// Precursor m/z override is not positive and finite
    #[error("Invalid precursor m/z override: {0}")]
    InvalidScanPrecursorMz(f64),

    /// A library entry violates the numeric contract
    #[error("Invalid library entry {index}: {error}")]
    InvalidLibraryEntry {
        /// Position in the combined entry list
        index: usize,
        /// What was wrong with it
        #[source]
        error: SpectrumError,
    },

    /// Settings could not be parsed
    #[error("Failed to parse match configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A problem with one query unit. The batch skips the unit and continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The scan has no centroided mass list
    #[error("No mass list in scan #{scan_number}")]
    MissingMassList {
        /// Scan without a mass list
        scan_number: u32,
    },

    /// The row has no scan that qualifies for matching
    #[error("No candidate scans for row {row_id}")]
    NoCandidateScans {
        /// Row without candidates
        row_id: u32,
    },

    /// MS/MS scan without precursor m/z and no override
    #[error("No precursor m/z for MS/MS scan #{scan_number}")]
    MissingPrecursorMz {
        /// Scan without precursor
        scan_number: u32,
    },

    /// A mass list or scan metadata violates the numeric contract
    #[error("Invalid data in scan #{scan_number}: {error}")]
    InvalidData {
        /// Offending scan
        scan_number: u32,
        /// What was wrong with it
        #[source]
        error: SpectrumError,
    },

    /// Row averages violate the numeric contract
    #[error("Invalid data in row {row_id}: {error}")]
    InvalidRowData {
        /// Offending row
        row_id: u32,
        /// What was wrong with it
        #[source]
        error: SpectrumError,
    },

    /// The scan reports MS level 0
    #[error("Invalid MS level 0 in scan #{scan_number}")]
    InvalidMsLevel {
        /// Offending scan
        scan_number: u32,
    },
}

/// Errors from a single-query match
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Invalid settings
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The query could not be matched
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}
