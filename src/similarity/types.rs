use serde::{Deserialize, Serialize};

use crate::spectrum::Point;

/// Borrowed view of the signals that enter one comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumView<'a> {
    /// Signals, in any order
    pub points: &'a [Point],
    /// Precursor m/z, used by the modified cosine
    pub precursor_mz: Option<f64>,
}

impl<'a> SpectrumView<'a> {
    /// View without precursor information
    pub fn new(points: &'a [Point]) -> Self {
        Self {
            points,
            precursor_mz: None,
        }
    }

    /// Attach a precursor m/z
    pub fn with_precursor(mut self, precursor_mz: Option<f64>) -> Self {
        self.precursor_mz = precursor_mz;
        self
    }
}

/// One row of an alignment. At least one side is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// Library signal, if any
    pub library: Option<Point>,
    /// Query signal, if any
    pub query: Option<Point>,
}

impl AlignedPair {
    /// True if both sides are present
    pub fn is_matched(&self) -> bool {
        self.library.is_some() && self.query.is_some()
    }

    /// m/z used to order the alignment
    pub fn mz(&self) -> f64 {
        self.library
            .or(self.query)
            .map(|p| p.mz)
            .unwrap_or(f64::NAN)
    }
}

/// Which similarity function produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    /// Weighted cosine
    WeightedCosine,
    /// Squared dot product
    DotProduct,
    /// Precursor-shift aware cosine
    ModifiedCosine,
}

/// Outcome of a successful comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Function that produced the score
    pub function: SimilarityKind,
    /// Similarity score in [0, 1]
    pub score: f64,
    /// Number of signals aligned on both sides
    pub overlap: usize,
    /// Full alignment in ascending m/z order
    pub aligned: Vec<AlignedPair>,
}

impl SimilarityResult {
    /// Pairs aligned on both sides, as (library, query)
    pub fn matched_pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.aligned.iter().filter_map(|p| match (p.library, p.query) {
            (Some(l), Some(q)) => Some((l, q)),
            _ => None,
        })
    }
}

/// Exponents of the signal weight `mz^a * intensity^b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightsPreset {
    /// MassBank: mz^2 * I^0.5
    #[default]
    MassBank,
    /// NIST11: mz^1.3 * I^0.53
    Nist11,
    /// NIST GC: mz^3 * I^0.6
    NistGc,
    /// I^0.5
    Sqrt,
    /// Raw intensity
    None,
}

impl WeightsPreset {
    /// (m/z exponent, intensity exponent)
    pub fn exponents(&self) -> (f64, f64) {
        match self {
            WeightsPreset::MassBank => (2.0, 0.5),
            WeightsPreset::Nist11 => (1.3, 0.53),
            WeightsPreset::NistGc => (3.0, 0.6),
            WeightsPreset::Sqrt => (0.0, 0.5),
            WeightsPreset::None => (0.0, 1.0),
        }
    }

    /// Weight of one signal
    pub fn weight(&self, point: &Point) -> f64 {
        let (mz_exp, intensity_exp) = self.exponents();
        let mz_part = if mz_exp == 0.0 { 1.0 } else { point.mz.powf(mz_exp) };
        mz_part * point.intensity.powf(intensity_exp)
    }
}

/// Which one-sided signals take part in the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedSignals {
    /// Every signal counts
    #[default]
    KeepAll,
    /// Only matched pairs count
    RemoveAll,
    /// Matched pairs and library-only signals
    KeepLibrary,
    /// Matched pairs and query-only signals
    KeepQuery,
}

impl UnmatchedSignals {
    /// Whether a pair enters the score under this policy
    pub fn keeps(&self, pair: &AlignedPair) -> bool {
        match (self, pair.library.is_some(), pair.query.is_some()) {
            (_, true, true) => true,
            (UnmatchedSignals::KeepAll, _, _) => true,
            (UnmatchedSignals::KeepLibrary, true, false) => true,
            (UnmatchedSignals::KeepQuery, false, true) => true,
            _ => false,
        }
    }
}
