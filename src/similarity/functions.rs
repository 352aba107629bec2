use serde::{Deserialize, Serialize};

use crate::spectrum::Point;
use crate::tolerance::MzTolerance;

use super::alignment::{align_signals, window_indices};
use super::types::{AlignedPair, SimilarityKind, SimilarityResult, SpectrumView, UnmatchedSignals, WeightsPreset};

fn default_min_score() -> f64 {
    0.65
}

/// Similarity functions available to the match engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimilarityFunction {
    /// Cosine of weighted signal vectors
    WeightedCosine {
        /// Signal weighting
        #[serde(default)]
        weights: WeightsPreset,
        /// Minimum accepted score
        #[serde(default = "default_min_score")]
        min_score: f64,
        /// One-sided signal handling
        #[serde(default)]
        unmatched: UnmatchedSignals,
    },
    /// Squared cosine of square-root intensities over all signals
    DotProduct {
        /// Minimum accepted score
        #[serde(default = "default_min_score")]
        min_score: f64,
    },
    /// Cosine that also aligns signals shifted by the precursor m/z difference
    ModifiedCosine {
        /// Signal weighting
        #[serde(default)]
        weights: WeightsPreset,
        /// Minimum accepted score
        #[serde(default = "default_min_score")]
        min_score: f64,
    },
}

impl Default for SimilarityFunction {
    fn default() -> Self {
        SimilarityFunction::WeightedCosine {
            weights: WeightsPreset::MassBank,
            min_score: default_min_score(),
            unmatched: UnmatchedSignals::KeepAll,
        }
    }
}

impl SimilarityFunction {
    /// Identifier of this function
    pub fn kind(&self) -> SimilarityKind {
        match self {
            SimilarityFunction::WeightedCosine { .. } => SimilarityKind::WeightedCosine,
            SimilarityFunction::DotProduct { .. } => SimilarityKind::DotProduct,
            SimilarityFunction::ModifiedCosine { .. } => SimilarityKind::ModifiedCosine,
        }
    }

    /// Minimum accepted score
    pub fn min_score(&self) -> f64 {
        match *self {
            SimilarityFunction::WeightedCosine { min_score, .. }
            | SimilarityFunction::DotProduct { min_score }
            | SimilarityFunction::ModifiedCosine { min_score, .. } => min_score,
        }
    }

    /// Compare a library spectrum with a query spectrum.
    ///
    /// Returns `None` if fewer than `min_match` signals align or the score
    /// stays below the function's minimum.
    pub fn score(
        &self,
        library: SpectrumView<'_>,
        query: SpectrumView<'_>,
        tolerance: &MzTolerance,
        min_match: usize,
    ) -> Option<SimilarityResult> {
        let (score, aligned) = match *self {
            SimilarityFunction::WeightedCosine { weights, unmatched, .. } => {
                let aligned = align_signals(library.points, query.points, tolerance);
                let score = weighted_cosine(&aligned, |p| weights.weight(p), |pair| unmatched.keeps(pair));
                (score, aligned)
            }
            SimilarityFunction::DotProduct { .. } => {
                let aligned = align_signals(library.points, query.points, tolerance);
                let cosine = weighted_cosine(&aligned, |p| WeightsPreset::Sqrt.weight(p), |_| true);
                (cosine * cosine, aligned)
            }
            SimilarityFunction::ModifiedCosine { weights, .. } => {
                modified_cosine(library, query, tolerance, weights)
            }
        };

        let overlap = aligned.iter().filter(|p| p.is_matched()).count();
        if overlap < min_match || score < self.min_score() {
            return None;
        }
        Some(SimilarityResult {
            function: self.kind(),
            score,
            overlap,
            aligned,
        })
    }

    /// Check that the minimum score is a fraction in [0, 1]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.min_score())
    }
}

fn cosine(dot: f64, norm_library: f64, norm_query: f64) -> f64 {
    let denominator = norm_library.sqrt() * norm_query.sqrt();
    if denominator > 1e-12 {
        (dot / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn weighted_cosine(
    aligned: &[AlignedPair],
    weight: impl Fn(&Point) -> f64,
    keep: impl Fn(&AlignedPair) -> bool,
) -> f64 {
    let (mut dot, mut norm_library, mut norm_query) = (0.0, 0.0, 0.0);
    for pair in aligned.iter().filter(|p| keep(p)) {
        let wl = pair.library.as_ref().map(&weight).unwrap_or(0.0);
        let wq = pair.query.as_ref().map(&weight).unwrap_or(0.0);
        dot += wl * wq;
        norm_library += wl * wl;
        norm_query += wq * wq;
    }
    cosine(dot, norm_library, norm_query)
}

/// Greedy assignment over direct and precursor-shifted candidate pairs,
/// highest weight product first
fn modified_cosine(
    library: SpectrumView<'_>,
    query: SpectrumView<'_>,
    tolerance: &MzTolerance,
    weights: WeightsPreset,
) -> (f64, Vec<AlignedPair>) {
    let mut lib_points = library.points.to_vec();
    lib_points.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    let lib_weights: Vec<f64> = lib_points.iter().map(|p| weights.weight(p)).collect();
    let query_weights: Vec<f64> = query.points.iter().map(|p| weights.weight(p)).collect();

    let shift = match (library.precursor_mz, query.precursor_mz) {
        (Some(l), Some(q)) => Some(q - l),
        _ => None,
    };

    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for (qi, q) in query.points.iter().enumerate() {
        let mut push = |li: usize| candidates.push((lib_weights[li] * query_weights[qi], li, qi));
        let direct = window_indices(&lib_points, q.mz, tolerance);
        direct.clone().for_each(&mut push);
        if let Some(shift) = shift.filter(|s| s.abs() > tolerance.tolerance_at(q.mz)) {
            window_indices(&lib_points, q.mz - shift, tolerance)
                .filter(|li| !direct.contains(li))
                .for_each(&mut push);
        }
    }
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut lib_taken = vec![false; lib_points.len()];
    let mut query_taken = vec![false; query.points.len()];
    let mut aligned = Vec::new();
    let mut dot = 0.0;
    for (product, li, qi) in candidates {
        if lib_taken[li] || query_taken[qi] {
            continue;
        }
        lib_taken[li] = true;
        query_taken[qi] = true;
        dot += product;
        aligned.push(AlignedPair {
            library: Some(lib_points[li]),
            query: Some(query.points[qi]),
        });
    }

    aligned.extend(
        lib_points
            .iter()
            .zip(&lib_taken)
            .filter(|(_, &t)| !t)
            .map(|(l, _)| AlignedPair {
                library: Some(*l),
                query: None,
            }),
    );
    aligned.extend(
        query
            .points
            .iter()
            .zip(&query_taken)
            .filter(|(_, &t)| !t)
            .map(|(q, _)| AlignedPair {
                library: None,
                query: Some(*q),
            }),
    );
    aligned.sort_by(|a, b| a.mz().total_cmp(&b.mz()));

    let norm_library = lib_weights.iter().map(|w| w * w).sum();
    let norm_query = query_weights.iter().map(|w| w * w).sum();
    (cosine(dot, norm_library, norm_query), aligned)
}
