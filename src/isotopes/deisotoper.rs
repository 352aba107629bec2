use serde::{Deserialize, Serialize};

use crate::spectrum::Point;
use crate::tolerance::{MzTolerance, ToleranceError};

/// Mass difference between 12C and 13C
pub const C13_DELTA: f64 = 1.003354835;

fn default_maximum_charge() -> u8 {
    1
}

fn default_monotonic_shape() -> bool {
    true
}

fn default_deisotoping_tolerance() -> MzTolerance {
    MzTolerance {
        absolute: 0.001,
        ppm: 10.0,
    }
}

/// Settings for removing 13C isotope signals from a signal list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeisotoperConfig {
    /// Window around each expected isotope position
    #[serde(default = "default_deisotoping_tolerance")]
    pub mz_tolerance: MzTolerance,
    /// Require intensities to decrease along an isotope series
    #[serde(default = "default_monotonic_shape")]
    pub monotonic_shape: bool,
    /// Highest charge state searched
    #[serde(default = "default_maximum_charge")]
    pub maximum_charge: u8,
}

impl Default for DeisotoperConfig {
    fn default() -> Self {
        Self {
            mz_tolerance: default_deisotoping_tolerance(),
            monotonic_shape: default_monotonic_shape(),
            maximum_charge: default_maximum_charge(),
        }
    }
}

impl DeisotoperConfig {
    /// Check the tolerance
    pub fn validate(&self) -> Result<(), ToleranceError> {
        self.mz_tolerance.validate()
    }
}

/// Remove 13C isotope signals.
///
/// Signals are visited by descending intensity. Every signal that survives
/// to its turn is kept and strips its isotope series at `1.0034 / z` for
/// each charge up to the maximum. With `monotonic_shape` a series stops at
/// the first signal more intense than its predecessor. The result is sorted
/// by m/z.
pub fn filter_isotopes(points: &[Point], config: &DeisotoperConfig) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.mz.total_cmp(&b.mz));

    let mut order: Vec<usize> = (0..sorted.len()).collect();
    order.sort_by(|&a, &b| sorted[b].intensity.total_cmp(&sorted[a].intensity));

    let mut removed = vec![false; sorted.len()];
    let mut anchored = vec![false; sorted.len()];

    for &anchor in &order {
        if removed[anchor] {
            continue;
        }
        anchored[anchor] = true;

        for charge in 1..=config.maximum_charge.max(1) {
            let step = C13_DELTA / charge as f64;
            let mut previous = sorted[anchor];
            loop {
                let expected = previous.mz + step;
                let window = config.mz_tolerance.tolerance_range(expected);
                let start = sorted.partition_point(|p| p.mz < window.lower);
                let candidate = (start..sorted.len())
                    .take_while(|&i| sorted[i].mz <= window.upper)
                    .filter(|&i| !removed[i] && !anchored[i])
                    .min_by(|&a, &b| {
                        (sorted[a].mz - expected)
                            .abs()
                            .total_cmp(&(sorted[b].mz - expected).abs())
                    });

                let Some(next) = candidate else { break };
                if config.monotonic_shape && sorted[next].intensity > previous.intensity {
                    break;
                }
                removed[next] = true;
                previous = sorted[next];
            }
        }
    }

    sorted
        .into_iter()
        .zip(removed)
        .filter(|(_, r)| !r)
        .map(|(p, _)| p)
        .collect()
}
