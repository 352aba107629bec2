use crate::similarity::SimilarityResult;
use crate::tolerance::MzTolerance;

/// Mass differences accepted as isotope or adduct evidence:
/// 13C, H, 2H and Cl
pub const DELTA_ISOTOPES: [f64; 4] = [1.0034, 1.0078, 2.0157, 1.9970];

/// Look for isotope spacings among the library signals of a match.
///
/// Only library signals that aligned with a query signal are considered.
/// For every signal and every delta, the first higher signal at that
/// distance (within `tolerance`) counts once. Succeeds as soon as
/// `min_matched_signals` spacings were found.
pub fn check_for_isotope_pattern(
    similarity: &SimilarityResult,
    tolerance: &MzTolerance,
    min_matched_signals: usize,
) -> bool {
    let library: Vec<f64> = similarity.matched_pairs().map(|(lib, _)| lib.mz).collect();

    let mut matches = 0;
    for (i, &a) in library.iter().enumerate() {
        for &delta in &DELTA_ISOTOPES {
            let found = library[i + 1..]
                .iter()
                .any(|&b| tolerance.check_within_tolerance(delta, (a - b).abs()));
            if found {
                matches += 1;
                if matches >= min_matched_signals {
                    return true;
                }
            }
        }
    }
    false
}
