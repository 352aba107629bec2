/// Numeric contract violations in spectrum data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    /// An m/z or intensity value is NaN or infinite
    #[error("Non-finite {field} at point {index}: {value}")]
    NonFiniteValue {
        /// Which value was invalid ("mz" or "intensity")
        field: &'static str,
        /// Position of the point in its spectrum
        index: usize,
        /// The offending value
        value: f64,
    },

    /// A metadata value such as precursor m/z or retention time is NaN or infinite
    #[error("Non-finite {field}: {value}")]
    NonFiniteMetadata {
        /// Which value was invalid
        field: &'static str,
        /// The offending value
        value: f64,
    },

    /// An intensity is below zero
    #[error("Negative intensity at point {index}: {value}")]
    NegativeIntensity {
        /// Position of the point in its spectrum
        index: usize,
        /// The offending value
        value: f64,
    },

    /// m/z and intensity arrays differ in length
    #[error("Array length mismatch: {mz_len} m/z values, {intensity_len} intensities")]
    LengthMismatch {
        /// Number of m/z values
        mz_len: usize,
        /// Number of intensity values
        intensity_len: usize,
    },
}
