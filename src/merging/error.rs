use crate::spectrum::SpectrumError;
use crate::tolerance::ToleranceError;

/// Errors that can occur while merging spectra
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A source spectrum violates the numeric contract
    #[error("Invalid input in source spectrum {source_index}: {error}")]
    InvalidInput {
        /// Position of the offending spectrum in the input
        source_index: usize,
        /// What was wrong with it
        #[source]
        error: SpectrumError,
    },

    /// The m/z tolerance is negative or not finite
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(#[from] ToleranceError),

    /// The noise level is negative or not finite
    #[error("Invalid noise level: {0}")]
    InvalidNoiseLevel(f64),

    /// Merge settings could not be parsed
    #[error("Failed to parse merge configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
