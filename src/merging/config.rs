use serde::{Deserialize, Serialize};

use crate::tolerance::MzTolerance;

use super::error::MergeError;

/// How the intensities of one consensus cluster are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergingType {
    /// Sum of all contributing intensities
    #[default]
    Summed,
    /// Largest contributing intensity
    Maximum,
    /// Mean of the contributing intensities
    Average,
}

impl MergingType {
    /// Combine the intensities of one cluster. Returns 0 for an empty slice.
    pub fn aggregate(&self, intensities: &[f64]) -> f64 {
        if intensities.is_empty() {
            return 0.0;
        }
        match self {
            MergingType::Summed => intensities.iter().sum(),
            MergingType::Maximum => intensities.iter().copied().fold(f64::MIN, f64::max),
            MergingType::Average => intensities.iter().sum::<f64>() / intensities.len() as f64,
        }
    }
}

/// Central tendency used for the merged m/z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterMeasure {
    /// Weighted mean
    #[default]
    Avg,
    /// Weighted median
    Median,
}

/// Transform applied to intensities before they are used as weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// All points weigh the same
    None,
    /// Intensity as weight
    #[default]
    Linear,
    /// log10(1 + intensity)
    Log10,
    /// Square root of intensity
    Sqrt,
}

impl Weighting {
    /// Weight of one intensity
    pub fn weight(&self, intensity: f64) -> f64 {
        let intensity = intensity.max(0.0);
        match self {
            Weighting::None => 1.0,
            Weighting::Linear => intensity,
            Weighting::Log10 => (1.0 + intensity).log10(),
            Weighting::Sqrt => intensity.sqrt(),
        }
    }
}

/// Computes the center m/z of a group of signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CenterFunction {
    /// Mean or median
    #[serde(default)]
    pub measure: CenterMeasure,
    /// Intensity weighting
    #[serde(default)]
    pub weighting: Weighting,
}

impl CenterFunction {
    /// Create a center function
    pub fn new(measure: CenterMeasure, weighting: Weighting) -> Self {
        Self { measure, weighting }
    }

    /// Center of `values` weighted by `intensities` (parallel slices).
    ///
    /// Returns NaN for empty input. A single value is returned unchanged.
    pub fn calc_center(&self, values: &[f64], intensities: &[f64]) -> f64 {
        match values.len() {
            0 => return f64::NAN,
            1 => return values[0],
            _ => {}
        }

        let mut weights: Vec<f64> = intensities
            .iter()
            .map(|&i| self.weighting.weight(i))
            .collect();
        if weights.iter().sum::<f64>() <= 0.0 {
            // all weights vanished (e.g. zero intensities): fall back to equal weights
            weights.iter_mut().for_each(|w| *w = 1.0);
        }

        match self.measure {
            CenterMeasure::Avg => weighted_mean(values, &weights),
            CenterMeasure::Median => weighted_median(values, &weights),
        }
    }
}

fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / total
}

fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let half = pairs.iter().map(|(_, w)| w).sum::<f64>() / 2.0;
    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= half {
            return *value;
        }
    }
    pairs[pairs.len() - 1].0
}

/// Reusable merge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Signals at or below this intensity are ignored
    #[serde(default)]
    pub noise_level: f64,
    /// m/z window used to group signals
    #[serde(default)]
    pub tolerance: MzTolerance,
    /// Intensity aggregation
    #[serde(default)]
    pub merging_type: MergingType,
    /// m/z center computation
    #[serde(default)]
    pub center_function: CenterFunction,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            noise_level: 0.0,
            tolerance: MzTolerance::default(),
            merging_type: MergingType::Summed,
            center_function: CenterFunction::default(),
        }
    }
}

impl MergeConfig {
    /// Parse settings from a TOML string and validate them
    pub fn from_toml_str(content: &str) -> Result<Self, MergeError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check tolerance and noise level
    pub fn validate(&self) -> Result<(), MergeError> {
        self.tolerance.validate()?;
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(MergeError::InvalidNoiseLevel(self.noise_level));
        }
        Ok(())
    }
}
