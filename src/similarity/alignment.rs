use crate::spectrum::Point;
use crate::tolerance::MzTolerance;

use super::types::AlignedPair;

fn sorted_by_mz(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    sorted
}

/// Index range of `sorted` whose m/z lies within the tolerance window of `mz`
pub(crate) fn window_indices(sorted: &[Point], mz: f64, tolerance: &MzTolerance) -> std::ops::Range<usize> {
    let range = tolerance.tolerance_range(mz);
    let start = sorted.partition_point(|p| p.mz < range.lower);
    let end = sorted.partition_point(|p| p.mz <= range.upper);
    start..end.max(start)
}

/// Greedy alignment of two signal lists.
///
/// Query signals are visited by descending intensity; each takes the
/// closest library signal within tolerance that is still free. Leftover
/// signals become one-sided pairs. The result is ordered by m/z.
pub fn align_signals(library: &[Point], query: &[Point], tolerance: &MzTolerance) -> Vec<AlignedPair> {
    let library = sorted_by_mz(library);
    let mut query = query.to_vec();
    query.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));

    let mut taken = vec![false; library.len()];
    let mut aligned = Vec::with_capacity(library.len() + query.len());

    for q in &query {
        let best = window_indices(&library, q.mz, tolerance)
            .filter(|&i| !taken[i])
            .min_by(|&a, &b| {
                (library[a].mz - q.mz)
                    .abs()
                    .total_cmp(&(library[b].mz - q.mz).abs())
            });
        match best {
            Some(i) => {
                taken[i] = true;
                aligned.push(AlignedPair {
                    library: Some(library[i]),
                    query: Some(*q),
                });
            }
            None => aligned.push(AlignedPair {
                library: None,
                query: Some(*q),
            }),
        }
    }

    aligned.extend(
        library
            .iter()
            .zip(&taken)
            .filter(|(_, &t)| !t)
            .map(|(l, _)| AlignedPair {
                library: Some(*l),
                query: None,
            }),
    );
    aligned.sort_by(|a, b| a.mz().total_cmp(&b.mz()));
    aligned
}

/// Restrict both lists to the m/z span they share, widened by the tolerance.
///
/// Returns two empty lists if either side is empty or the spans do not meet.
pub fn crop_to_overlap(tolerance: &MzTolerance, library: &[Point], query: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let span = |points: &[Point]| {
        points.iter().fold(None, |acc: Option<(f64, f64)>, p| match acc {
            None => Some((p.mz, p.mz)),
            Some((lo, hi)) => Some((lo.min(p.mz), hi.max(p.mz))),
        })
    };
    let (Some((lib_lo, lib_hi)), Some((query_lo, query_hi))) = (span(library), span(query)) else {
        return (Vec::new(), Vec::new());
    };

    let lower = lib_lo.max(query_lo);
    let upper = lib_hi.min(query_hi);
    let lower = lower - tolerance.tolerance_at(lower);
    let upper = upper + tolerance.tolerance_at(upper);
    if lower > upper {
        return (Vec::new(), Vec::new());
    }

    let keep = |points: &[Point]| {
        points
            .iter()
            .filter(|p| p.mz >= lower && p.mz <= upper)
            .copied()
            .collect::<Vec<_>>()
    };
    (keep(library), keep(query))
}

/// Drop every signal within tolerance of the precursor m/z
pub fn remove_precursor(points: &[Point], precursor_mz: f64, tolerance: &MzTolerance) -> Vec<Point> {
    let window = tolerance.tolerance_range(precursor_mz);
    points
        .iter()
        .filter(|p| !window.contains(p.mz))
        .copied()
        .collect()
}
